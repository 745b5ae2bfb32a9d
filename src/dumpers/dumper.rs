use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DumpError {
    #[error("could not start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("exited with status {status}")]
    Failed { status: String },

    #[error("terminated by signal")]
    Killed,

    #[error("timed out after {secs} seconds")]
    TimedOut { secs: u64 },
}

/// Produces a gzip archive of one MongoDB deployment.
#[async_trait]
pub trait Dumper: Send + Sync {
    async fn dump(&self, uri: &str, archive: &Path) -> Result<(), DumpError>;
}

/// `<dir>/<name>-mongodump-<ts>.gz`
pub fn dump_path(dir: &Path, name: &str, timestamp: &str) -> PathBuf {
    dir.join(format!("{}-mongodump-{}.gz", name, timestamp))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dump_path_layout() {
        let path = dump_path(Path::new("/tmp"), "orders", "20240102030405");
        assert_eq!(path, PathBuf::from("/tmp/orders-mongodump-20240102030405.gz"));
    }

    #[test]
    fn errors_never_mention_the_uri() {
        let err = DumpError::Failed {
            status: "1".to_string(),
        };
        assert_eq!(err.to_string(), "exited with status 1");
        let err = DumpError::TimedOut { secs: 3600 };
        assert_eq!(err.to_string(), "timed out after 3600 seconds");
    }
}
