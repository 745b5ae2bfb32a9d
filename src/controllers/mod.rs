pub mod backups;

pub use backups::{now_ts, BackupController};
