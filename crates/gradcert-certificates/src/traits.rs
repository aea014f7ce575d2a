//! Capability trait definitions for external collaborators.

use crate::errors::Result;
use crate::render::RenderOptions;
use async_trait::async_trait;

/// Renderer turning a text payload into a scannable image
///
/// The certificate service only ever feeds it the public certificate URL;
/// the trait keeps the rendering backend swappable and mockable.
#[async_trait]
pub trait CodeRenderer: Send + Sync {
    /// Render `text` into PNG bytes
    async fn render(&self, text: &str, options: &RenderOptions) -> Result<Vec<u8>>;
}

/// External object store returning stable public URLs
///
/// Used for student photos and rendered verification artifacts. The core
/// keeps only the returned URL, never the bytes.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Persist a blob and return its public URL
    async fn put_blob(&self, bytes: Vec<u8>, suggested_name: &str) -> Result<String>;
}

#[cfg(test)]
pub mod mocks {
    use super::*;
    use crate::errors::CertificateError;
    use std::sync::Mutex;

    /// Renderer that records what it was asked to render
    #[derive(Default)]
    pub struct MockRenderer {
        pub rendered: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CodeRenderer for MockRenderer {
        async fn render(&self, text: &str, _options: &RenderOptions) -> Result<Vec<u8>> {
            self.rendered.lock().unwrap().push(text.to_string());
            Ok(text.as_bytes().to_vec())
        }
    }

    /// Renderer that always fails, for partial-failure tests
    pub struct FailingRenderer;

    #[async_trait]
    impl CodeRenderer for FailingRenderer {
        async fn render(&self, _text: &str, _options: &RenderOptions) -> Result<Vec<u8>> {
            Err(CertificateError::ExternalService(
                "renderer unavailable".to_string(),
            ))
        }
    }

    /// Object store that fabricates stable URLs from the suggested name
    #[derive(Default)]
    pub struct MockObjectStore {
        pub stored: Mutex<Vec<(String, Vec<u8>)>>,
    }

    #[async_trait]
    impl ObjectStore for MockObjectStore {
        async fn put_blob(&self, bytes: Vec<u8>, suggested_name: &str) -> Result<String> {
            self.stored
                .lock()
                .unwrap()
                .push((suggested_name.to_string(), bytes));
            Ok(format!("https://blobs.example/{}", suggested_name))
        }
    }
}
