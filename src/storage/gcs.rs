//! Google Cloud Storage backend.
//!
//! Archives are sent with a single media upload to the JSON API. The bearer
//! token is either supplied up front (`GCS_ACCESS_TOKEN`) or fetched from the
//! GCE metadata server, which is what Cloud Run and GKE workloads get by default.

use super::backend::{StorageBackend, StorageKind};
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio_util::io::ReaderStream;
use tracing::debug;

pub const DEFAULT_ENDPOINT: &str = "https://storage.googleapis.com";
pub const DEFAULT_METADATA_HOST: &str = "metadata.google.internal";

const TOKEN_PATH: &str = "/computeMetadata/v1/instance/service-accounts/default/token";
// Refresh a little before the server-side expiry.
const TOKEN_EXPIRY_SLACK: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct MetadataToken {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

enum TokenSource {
    Static(String),
    Metadata {
        host: String,
        cached: Mutex<Option<CachedToken>>,
    },
}

pub struct GcsBackend {
    client: reqwest::Client,
    endpoint: String,
    tokens: TokenSource,
}

impl GcsBackend {
    pub fn new(
        endpoint: Option<String>,
        token: Option<String>,
        metadata_host: Option<String>,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let tokens = match token {
            Some(token) => TokenSource::Static(token),
            None => TokenSource::Metadata {
                host: metadata_host.unwrap_or_else(|| DEFAULT_METADATA_HOST.to_string()),
                cached: Mutex::new(None),
            },
        };

        Ok(Self {
            client,
            endpoint: endpoint
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
                .trim_end_matches('/')
                .to_string(),
            tokens,
        })
    }

    fn upload_url(&self, bucket: &str, key: &str) -> String {
        format!(
            "{}/upload/storage/v1/b/{}/o?uploadType=media&name={}",
            self.endpoint,
            urlencoding::encode(bucket),
            urlencoding::encode(key)
        )
    }

    async fn access_token(&self) -> anyhow::Result<String> {
        let (host, cached) = match &self.tokens {
            TokenSource::Static(token) => return Ok(token.clone()),
            TokenSource::Metadata { host, cached } => (host, cached),
        };

        let mut cached = cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        let url = format!("http://{}{}", host, TOKEN_PATH);
        debug!(url = %url, "Fetching access token from metadata server");
        let response = self
            .client
            .get(&url)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .context("Failed to reach metadata server for an access token")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "Metadata server returned {} for access token: {}",
                status,
                body
            ));
        }

        let token: MetadataToken = response
            .json()
            .await
            .context("Malformed access token response from metadata server")?;

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_SLACK);
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        Ok(token.access_token)
    }
}

#[async_trait]
impl StorageBackend for GcsBackend {
    async fn upload_file(&self, bucket: &str, key: &str, path: &Path) -> anyhow::Result<String> {
        let token = self.access_token().await?;

        let file = tokio::fs::File::open(path)
            .await
            .with_context(|| format!("Failed to open archive {}", path.display()))?;
        let length = file.metadata().await?.len();
        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));

        let response = self
            .client
            .post(self.upload_url(bucket, key))
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, "application/gzip")
            .header(reqwest::header::CONTENT_LENGTH, length)
            .body(body)
            .send()
            .await
            .context("GCS upload failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("GCS upload failed with status {}: {}", status, body));
        }

        Ok(format!("gs://{}/{}", bucket, key))
    }

    fn kind(&self) -> StorageKind {
        StorageKind::Gcs
    }
}
