use crate::error::RequestError;
use anyhow::Context;
use dotenv::dotenv;
use serde::Serialize;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DUMP_TIMEOUT_SECS: u64 = 60 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub bucket: Option<String>,
    pub mongo_list: Option<String>,
    pub mongo_list_file: Option<PathBuf>,
    pub storage_backend: String,
    pub storage_path: PathBuf,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub gcs_access_token: Option<String>,
    pub gcs_endpoint: Option<String>,
    pub gce_metadata_host: Option<String>,
    pub mongodump_path: String,
    pub mongodump_args: Vec<String>,
    pub dump_dir: PathBuf,
    pub dump_timeout: Duration,
}

/// Printable view of [`Config`]. Never carries connection strings or tokens.
#[derive(Debug, Serialize)]
pub struct RedactedConfig {
    pub host: String,
    pub port: u16,
    pub bucket: Option<String>,
    pub mongo_list_source: String,
    pub storage_backend: String,
    pub storage_path: String,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub gcs_access_token: Option<String>,
    pub gcs_endpoint: Option<String>,
    pub mongodump_path: String,
    pub mongodump_args: Vec<String>,
    pub dump_dir: String,
    pub dump_timeout_secs: u64,
}

impl Config {
    /// Load `.env` (if any) and read the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number, got '{}'", raw))?,
            None => DEFAULT_PORT,
        };

        let dump_timeout_secs = match get("DUMP_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().with_context(|| {
                format!("DUMP_TIMEOUT_SECS must be a whole number of seconds, got '{}'", raw)
            })?,
            None => DEFAULT_DUMP_TIMEOUT_SECS,
        };
        if dump_timeout_secs == 0 {
            anyhow::bail!("DUMP_TIMEOUT_SECS must be greater than zero");
        }

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            bucket: get("GCS_BUCKET"),
            // Whitespace-only is still a value here; it fails as invalid JSON.
            mongo_list: lookup("MONGO_LIST").filter(|v| !v.is_empty()),
            mongo_list_file: get("MONGO_LIST_FILE").map(PathBuf::from),
            storage_backend: get("STORAGE_BACKEND").unwrap_or_else(|| "gcs".to_string()),
            storage_path: get("STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./backups-store")),
            s3_region: get("S3_REGION"),
            s3_endpoint: get("S3_ENDPOINT"),
            gcs_access_token: get("GCS_ACCESS_TOKEN"),
            gcs_endpoint: get("GCS_ENDPOINT"),
            gce_metadata_host: get("GCE_METADATA_HOST"),
            mongodump_path: get("MONGODUMP_PATH").unwrap_or_else(|| "mongodump".to_string()),
            mongodump_args: get("MONGODUMP_ARGS")
                .map(|raw| raw.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),
            dump_dir: get("DUMP_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(env::temp_dir),
            dump_timeout: Duration::from_secs(dump_timeout_secs),
        })
    }

    /// The destination bucket, required for every backup run.
    pub fn bucket(&self) -> Result<&str, RequestError> {
        self.bucket.as_deref().ok_or(RequestError::MissingBucket)
    }

    /// Raw target list JSON. `MONGO_LIST` wins; `MONGO_LIST_FILE` is re-read on
    /// every call so a rotated secret mount is picked up without a restart.
    pub fn mongo_list_raw(&self) -> Result<String, RequestError> {
        if let Some(raw) = &self.mongo_list {
            return Ok(raw.clone());
        }

        let path = self
            .mongo_list_file
            .as_ref()
            .ok_or(RequestError::MissingMongoList)?;

        let raw = fs::read_to_string(path)
            .map_err(|e| RequestError::UnreadableMongoList(format!("{}: {}", path.display(), e)))?;

        if raw.trim().is_empty() {
            return Err(RequestError::MissingMongoList);
        }
        Ok(raw)
    }

    pub fn redacted(&self) -> RedactedConfig {
        let mongo_list_source = if self.mongo_list.is_some() {
            "MONGO_LIST (env)".to_string()
        } else if let Some(path) = &self.mongo_list_file {
            format!("MONGO_LIST_FILE ({})", path.display())
        } else {
            "<unset>".to_string()
        };

        RedactedConfig {
            host: self.host.clone(),
            port: self.port,
            bucket: self.bucket.clone(),
            mongo_list_source,
            storage_backend: self.storage_backend.clone(),
            storage_path: self.storage_path.display().to_string(),
            s3_region: self.s3_region.clone(),
            s3_endpoint: self.s3_endpoint.clone(),
            gcs_access_token: self
                .gcs_access_token
                .as_ref()
                .map(|_| "<redacted>".to_string()),
            gcs_endpoint: self.gcs_endpoint.clone(),
            mongodump_path: self.mongodump_path.clone(),
            mongodump_args: self.mongodump_args.clone(),
            dump_dir: self.dump_dir.display().to_string(),
            dump_timeout_secs: self.dump_timeout.as_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.storage_backend, "gcs");
        assert_eq!(config.mongodump_path, "mongodump");
        assert!(config.mongodump_args.is_empty());
        assert_eq!(config.dump_timeout, Duration::from_secs(3600));
        assert_eq!(config.bucket(), Err(RequestError::MissingBucket));
        assert_eq!(config.mongo_list_raw(), Err(RequestError::MissingMongoList));
    }

    #[test]
    fn empty_values_count_as_unset() {
        let config = config_from(&[("GCS_BUCKET", ""), ("MONGO_LIST", ""), ("PORT", " ")]).unwrap();
        assert_eq!(config.bucket(), Err(RequestError::MissingBucket));
        assert_eq!(config.mongo_list_raw(), Err(RequestError::MissingMongoList));
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn blank_mongo_list_is_present_but_invalid() {
        let config = config_from(&[("MONGO_LIST", "  ")]).unwrap();
        let raw = config.mongo_list_raw().unwrap();
        assert!(matches!(
            crate::resources::v1::backups::parse_targets(&raw),
            Err(RequestError::InvalidMongoList(_))
        ));
    }

    #[test]
    fn mongodump_args_are_split_on_whitespace() {
        let config = config_from(&[("MONGODUMP_ARGS", "--readPreference=secondary  --quiet")]).unwrap();
        assert_eq!(
            config.mongodump_args,
            vec!["--readPreference=secondary".to_string(), "--quiet".to_string()]
        );
    }

    #[test]
    fn rejects_malformed_port() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn rejects_zero_or_malformed_dump_timeout() {
        let err = config_from(&[("DUMP_TIMEOUT_SECS", "0")]).unwrap_err();
        assert!(err.to_string().contains("greater than zero"));

        let err = config_from(&[("DUMP_TIMEOUT_SECS", "1h")]).unwrap_err();
        assert!(err.to_string().contains("DUMP_TIMEOUT_SECS"));

        let config = config_from(&[("DUMP_TIMEOUT_SECS", "90")]).unwrap();
        assert_eq!(config.dump_timeout, Duration::from_secs(90));
    }

    #[test]
    fn mongo_list_env_takes_precedence_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("targets.json");
        fs::write(&file, r#"[{"name":"file"}]"#).unwrap();

        let config = config_from(&[
            ("MONGO_LIST", r#"[{"name":"env"}]"#),
            ("MONGO_LIST_FILE", file.to_str().unwrap()),
        ])
        .unwrap();
        assert_eq!(config.mongo_list_raw().unwrap(), r#"[{"name":"env"}]"#);
    }

    #[test]
    fn mongo_list_file_is_read_when_env_is_unset() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("targets.json");
        fs::write(&file, r#"[{"name":"file"}]"#).unwrap();

        let config = config_from(&[("MONGO_LIST_FILE", file.to_str().unwrap())]).unwrap();
        assert_eq!(config.mongo_list_raw().unwrap(), r#"[{"name":"file"}]"#);
    }

    #[test]
    fn missing_mongo_list_file_is_reported() {
        let config = config_from(&[("MONGO_LIST_FILE", "/definitely/not/here.json")]).unwrap();
        assert!(matches!(
            config.mongo_list_raw(),
            Err(RequestError::UnreadableMongoList(_))
        ));
    }

    #[test]
    fn redacted_view_hides_secrets() {
        let config = config_from(&[
            ("MONGO_LIST", r#"[{"name":"a","uri":"mongodb://user:pw@host"}]"#),
            ("GCS_ACCESS_TOKEN", "ya29.secret"),
        ])
        .unwrap();
        let yaml = serde_yaml::to_string(&config.redacted()).unwrap();
        assert!(!yaml.contains("pw@host"));
        assert!(!yaml.contains("ya29.secret"));
        assert!(yaml.contains("<redacted>"));
    }
}
