use super::backend::{StorageBackend, StorageKind};
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use std::path::Path;

/// Amazon S3 (or S3-compatible) backend. Credentials come from the usual AWS
/// provider chain.
pub struct S3Backend {
    client: Client,
}

impl S3Backend {
    /// `endpoint` points the client at an S3-compatible service (MinIO and
    /// similar), which also switches to path-style addressing.
    pub async fn new(region: Option<String>, endpoint: Option<String>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        let sdk_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }
        Self::from_client(Client::from_conf(builder.build()))
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StorageBackend for S3Backend {
    async fn upload_file(&self, bucket: &str, key: &str, path: &Path) -> anyhow::Result<String> {
        let body = ByteStream::from_path(path)
            .await
            .with_context(|| format!("Failed to open archive {}", path.display()))?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type("application/gzip")
            .body(body)
            .send()
            .await
            .map_err(|e| anyhow!("S3 upload failed: {}", aws_sdk_s3::error::DisplayErrorContext(e)))?;

        Ok(format!("s3://{}/{}", bucket, key))
    }

    fn kind(&self) -> StorageKind {
        StorageKind::S3
    }
}
