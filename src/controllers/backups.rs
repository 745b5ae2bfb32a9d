use crate::dumpers::{dump_path, Dumper};
use crate::resources::v1::backups::{V1BackupResult, V1BackupTarget, V1ValidTarget};
use crate::storage::{object_key, StorageBackend};
use crate::{backup_error_with_fields, backup_info_with_fields, storage_info_with_fields};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{span, warn, Instrument, Level};

/// UTC timestamp used in archive names, e.g. `20240102030405`.
pub fn now_ts() -> String {
    format_ts(Utc::now())
}

pub fn format_ts(at: DateTime<Utc>) -> String {
    at.format("%Y%m%d%H%M%S").to_string()
}

/// Dumps each target and ships the archive to storage.
pub struct BackupController {
    dumper: Arc<dyn Dumper>,
    storage: Arc<dyn StorageBackend>,
    dump_dir: PathBuf,
}

impl BackupController {
    pub fn new(
        dumper: Arc<dyn Dumper>,
        storage: Arc<dyn StorageBackend>,
        dump_dir: PathBuf,
    ) -> Self {
        Self {
            dumper,
            storage,
            dump_dir,
        }
    }

    /// Back up every target, in order, under one shared timestamp.
    ///
    /// Never fails as a whole: each target gets its own result entry.
    pub async fn run_all(
        &self,
        targets: &[V1BackupTarget],
        bucket: &str,
        timestamp: &str,
    ) -> Vec<V1BackupResult> {
        let span = span!(Level::INFO, "BackupController", timestamp = %timestamp);

        async {
            backup_info_with_fields!(targets = targets.len(), bucket = bucket; "Starting backup run");
            let mut results = Vec::with_capacity(targets.len());

            for target in targets {
                let result = match target.validate() {
                    Ok(valid) => self.backup_one(&valid, bucket, timestamp).await,
                    Err(reason) => {
                        warn!(name = %target.display_name(), reason, "Skipping backup target");
                        V1BackupResult::skipped(target.display_name(), reason)
                    }
                };
                results.push(result);
            }

            backup_info_with_fields!(targets = results.len(); "Finished backup run");
            results
        }
        .instrument(span)
        .await
    }

    async fn backup_one(
        &self,
        target: &V1ValidTarget,
        bucket: &str,
        timestamp: &str,
    ) -> V1BackupResult {
        let archive = dump_path(&self.dump_dir, &target.name, timestamp);
        let result = self.dump_and_upload(target, bucket, timestamp, &archive).await;

        // The archive goes away whatever happened above.
        if archive.exists() {
            if let Err(e) = tokio::fs::remove_file(&archive).await {
                warn!(archive = %archive.display(), error = %e, "Failed to remove local archive");
            }
        }

        result
    }

    async fn dump_and_upload(
        &self,
        target: &V1ValidTarget,
        bucket: &str,
        timestamp: &str,
        archive: &std::path::Path,
    ) -> V1BackupResult {
        backup_info_with_fields!(name = target.name.as_str(); "Running mongodump");
        if let Err(e) = self.dumper.dump(&target.uri, archive).await {
            backup_error_with_fields!(name = target.name.as_str(), error = tracing::field::display(&e); "mongodump failed");
            return V1BackupResult::error(&target.name, format!("mongodump failed: {}", e));
        }

        let key = object_key(&target.name, timestamp);
        match self.storage.upload_file(bucket, &key, archive).await {
            Ok(location) => {
                storage_info_with_fields!(
                    name = target.name.as_str(),
                    location = location.as_str();
                    "Uploaded backup"
                );
                V1BackupResult::ok(&target.name, location)
            }
            Err(e) => {
                backup_error_with_fields!(name = target.name.as_str(), error = tracing::field::display(&e); "Upload failed");
                V1BackupResult::error(&target.name, format!("{:#}", e))
            }
        }
    }
}
