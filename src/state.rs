use crate::config::Config;
use crate::controllers::{now_ts, BackupController};
use crate::dumpers::{Dumper, MongodumpDumper};
use crate::error::RequestError;
use crate::resources::v1::backups::{parse_targets, V1BackupResult};
use crate::storage::{create_storage_from_kind, StorageBackend};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub controller: Arc<BackupController>,
}

impl AppState {
    pub fn new(config: Config, dumper: Arc<dyn Dumper>, storage: Arc<dyn StorageBackend>) -> Self {
        let controller = BackupController::new(dumper, storage, config.dump_dir.clone());
        Self {
            config: Arc::new(config),
            controller: Arc::new(controller),
        }
    }

    /// Resolve bucket and targets from config, then back everything up.
    ///
    /// Configuration errors abort before any target is touched.
    pub async fn run_backup(&self) -> Result<Vec<V1BackupResult>, RequestError> {
        let bucket = self.config.bucket()?;
        let raw = self.config.mongo_list_raw()?;
        let targets = parse_targets(&raw)?;

        Ok(self.controller.run_all(&targets, bucket, &now_ts()).await)
    }
}

/// Wire the real `mongodump` runner and the configured storage backend.
pub async fn create_app_state(config: Config) -> anyhow::Result<AppState> {
    let dumper = MongodumpDumper::new(config.mongodump_path.clone(), config.dump_timeout)
        .with_args(config.mongodump_args.clone());
    let storage = create_storage_from_kind(&config).await?;
    Ok(AppState::new(config, Arc::new(dumper), storage))
}
