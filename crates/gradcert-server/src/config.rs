use anyhow::Result;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the server to
    pub bind_address: SocketAddr,

    /// Path to the RocksDB database
    pub database_path: PathBuf,

    /// Origin baked into certificate URLs and their QR artifacts
    pub site_origin: String,

    /// Base URL of the external object store (photos, artifacts)
    pub object_store_url: String,

    /// Base URL of the external identity provider
    pub identity_provider_url: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let bind_address = std::env::var("BIND_ADDRESS")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()?;

        let database_path = std::env::var("DATABASE_PATH")
            .unwrap_or_else(|_| "./data/gradcert.db".to_string())
            .into();

        // Must match the deployed site for already-printed QR codes to keep
        // resolving; regeneration exists for when it changes.
        let site_origin = std::env::var("SITE_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        let object_store_url = std::env::var("OBJECT_STORE_URL")
            .unwrap_or_else(|_| "http://localhost:9000/blobs".to_string());

        let identity_provider_url = std::env::var("IDENTITY_PROVIDER_URL")
            .unwrap_or_else(|_| "http://localhost:9100".to_string());

        Ok(Config {
            bind_address,
            database_path,
            site_origin,
            object_store_url,
            identity_provider_url,
        })
    }
}
