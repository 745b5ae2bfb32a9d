pub mod models;

pub use models::{parse_targets, V1BackupResult, V1BackupStatus, V1BackupTarget, V1ValidTarget};
