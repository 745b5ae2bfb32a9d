use async_trait::async_trait;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Gcs,
    S3,
    Filesystem,
}

impl std::str::FromStr for StorageKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gcs" => Ok(Self::Gcs),
            "s3" => Ok(Self::S3),
            "filesystem" | "fs" => Ok(Self::Filesystem),
            _ => Err(anyhow::anyhow!("Unknown storage backend: {}", s)),
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageKind::Gcs => write!(f, "gcs"),
            StorageKind::S3 => write!(f, "s3"),
            StorageKind::Filesystem => write!(f, "filesystem"),
        }
    }
}

/// Destination for finished archives.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Upload the file at `path` as `key` in `bucket` and return its location URL.
    async fn upload_file(&self, bucket: &str, key: &str, path: &Path) -> anyhow::Result<String>;

    fn kind(&self) -> StorageKind;
}

/// `backups/<name>/mongodump-<ts>.gz`
pub fn object_key(name: &str, timestamp: &str) -> String {
    format!("backups/{}/mongodump-{}.gz", name, timestamp)
}
