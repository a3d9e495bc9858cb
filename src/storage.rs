//! Object storage boundary used by admin content editing.
//!
//! Uploads go to an external object store over HTTP; retrieval URLs are
//! stable and public. Unlike the auth path, failures here propagate to the
//! caller as typed errors, since an upload is something the operator can
//! retry or report.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::StorageConfig;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Object storage is not configured")]
    NotConfigured,

    #[error("Upload transport failed: {0}")]
    Transport(String),

    #[error("Object store rejected upload: {0}")]
    Rejected(String),
}

/// A stored object and where to fetch it from.
#[derive(Debug, Clone, Serialize)]
pub struct StoredObject {
    pub key: String,
    pub url: String,
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store binary content under `key` and return its public URL.
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, StorageError>;

    /// Resolve a key to its retrieval URL. Keys that are already URLs
    /// resolve without a network call.
    async fn get(&self, key: &str) -> Result<StoredObject, StorageError>;
}

/// Pass-through adapter for an HTTP object store.
pub struct HttpObjectStorage {
    client: reqwest::Client,
    config: StorageConfig,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: Option<String>,
}

impl HttpObjectStorage {
    pub fn new(config: StorageConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_seconds))
            .user_agent("InfinityX/1.0")
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build storage HTTP client: {e}"))?;

        Ok(Self { client, config })
    }

    fn public_url(&self, key: &str) -> String {
        format!(
            "{}/{}",
            self.config.public_base_url.trim_end_matches('/'),
            key.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl ObjectStorage for HttpObjectStorage {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, StorageError> {
        if self.config.upload_url.is_empty() {
            return Err(StorageError::NotConfigured);
        }

        let url = format!(
            "{}/{}",
            self.config.upload_url.trim_end_matches('/'),
            key.trim_start_matches('/')
        );

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.config.api_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| StorageError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StorageError::Rejected(format!(
                "upload returned {}",
                response.status()
            )));
        }

        // The store may hand back a canonical URL; otherwise derive one
        // from the configured public base.
        let reported = response.json::<UploadResponse>().await.ok().and_then(|r| r.url);
        let url = reported.unwrap_or_else(|| self.public_url(key));

        Ok(StoredObject {
            key: key.to_string(),
            url,
        })
    }

    async fn get(&self, key: &str) -> Result<StoredObject, StorageError> {
        if key.starts_with("http://") || key.starts_with("https://") {
            return Ok(StoredObject {
                key: key.to_string(),
                url: key.to_string(),
            });
        }

        Ok(StoredObject {
            key: key.to_string(),
            url: self.public_url(key),
        })
    }
}
