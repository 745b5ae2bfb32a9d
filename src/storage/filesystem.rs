use super::backend::{StorageBackend, StorageKind};
use anyhow::Context;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Copies archives under `<root>/<bucket>/<key>`.
pub struct FilesystemBackend {
    root: PathBuf,
}

impl FilesystemBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl StorageBackend for FilesystemBackend {
    async fn upload_file(&self, bucket: &str, key: &str, path: &Path) -> anyhow::Result<String> {
        let dest = self.root.join(bucket).join(key);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        fs::copy(path, &dest)
            .await
            .with_context(|| format!("Failed to copy archive to {}", dest.display()))?;

        let absolute = fs::canonicalize(&dest).await?;
        Ok(format!("file://{}", absolute.display()))
    }

    fn kind(&self) -> StorageKind {
        StorageKind::Filesystem
    }
}
