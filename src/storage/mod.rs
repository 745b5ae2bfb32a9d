pub mod backend;
pub mod factory;
pub mod filesystem;
pub mod gcs;
pub mod s3;

pub use backend::{object_key, StorageBackend, StorageKind};
pub use factory::create_storage_from_kind;
