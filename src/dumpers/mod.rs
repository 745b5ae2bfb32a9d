pub mod dumper;
pub mod mongodump;

pub use dumper::{dump_path, DumpError, Dumper};
pub use mongodump::MongodumpDumper;
