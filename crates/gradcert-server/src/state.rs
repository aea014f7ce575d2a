use anyhow::Result;
use gradcert_auth::HttpIdentityProvider;
use gradcert_certificates::{CertificateService, HttpObjectStore, QrRenderer};
use gradcert_registry::RegistryService;
use gradcert_storage::RocksDbStorage;
use std::sync::Arc;

use crate::config::Config;

/// Registry over the production storage backend
pub type Registry = RegistryService<RocksDbStorage>;

/// Certificate service over the production registry and collaborators
pub type Certificates = CertificateService<Registry, QrRenderer, HttpObjectStore>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub certificates: Arc<Certificates>,
    pub object_store: Arc<HttpObjectStore>,
    pub identity: Arc<HttpIdentityProvider>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let storage = Arc::new(RocksDbStorage::open(&config.database_path)?);
        let registry = Arc::new(RegistryService::new(storage));

        let object_store = Arc::new(HttpObjectStore::new(config.object_store_url.as_str())?);
        let certificates = Arc::new(CertificateService::new(
            registry.clone(),
            Arc::new(QrRenderer),
            object_store.clone(),
            config.site_origin.clone(),
        ));

        let identity = Arc::new(HttpIdentityProvider::new(
            config.identity_provider_url.as_str(),
        )?);

        Ok(AppState {
            registry,
            certificates,
            object_store,
            identity,
        })
    }
}
