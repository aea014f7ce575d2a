//! HTTP object store client.

use crate::errors::{CertificateError, Result};
use crate::traits::ObjectStore;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Client for an external blob store exposing `PUT /{name}` and answering
/// with the blob's stable public URL
pub struct HttpObjectStore {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct PutBlobResponse {
    url: String,
}

impl HttpObjectStore {
    /// Create a client for the store at `base_url`
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| CertificateError::ExternalService(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn put_blob(&self, bytes: Vec<u8>, suggested_name: &str) -> Result<String> {
        let url = format!("{}/{}", self.base_url, suggested_name);

        let response = self
            .client
            .put(&url)
            .header("Content-Type", "application/octet-stream")
            .body(bytes)
            .send()
            .await
            .map_err(|e| CertificateError::ExternalService(format!("blob upload failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(CertificateError::ExternalService(format!(
                "blob store answered {}",
                response.status()
            )));
        }

        let body: PutBlobResponse = response
            .json()
            .await
            .map_err(|e| CertificateError::ExternalService(format!("blob store response: {}", e)))?;

        debug!("Stored blob {} at {}", suggested_name, body.url);
        Ok(body.url)
    }
}
