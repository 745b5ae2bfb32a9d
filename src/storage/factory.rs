use super::backend::{StorageBackend, StorageKind};
use super::{filesystem::FilesystemBackend, gcs::GcsBackend, s3::S3Backend};
use crate::config::Config;
use std::sync::Arc;

pub async fn create_storage_from_kind(config: &Config) -> anyhow::Result<Arc<dyn StorageBackend>> {
    let kind: StorageKind = config.storage_backend.parse()?;
    tracing::debug!(kind = %kind, "Creating storage backend");

    match kind {
        StorageKind::Gcs => Ok(Arc::new(GcsBackend::new(
            config.gcs_endpoint.clone(),
            config.gcs_access_token.clone(),
            config.gce_metadata_host.clone(),
        )?)),
        StorageKind::S3 => Ok(Arc::new(S3Backend::new(
            config.s3_region.clone(),
            config.s3_endpoint.clone(),
        )
        .await)),
        StorageKind::Filesystem => Ok(Arc::new(FilesystemBackend::new(
            config.storage_path.clone(),
        ))),
    }
}
