//! Certificate service error types.

use thiserror::Error;
use uuid::Uuid;

/// Certificate service errors
#[derive(Debug, Error)]
pub enum CertificateError {
    /// Student not found
    #[error("Student not found: {0}")]
    NotFound(Uuid),

    /// Artifact issuance failed after the student row was committed
    ///
    /// Never rolls back the student; the record stays re-issuable with a
    /// null artifact reference.
    #[error("Artifact issuance failed: {0}")]
    ArtifactIssuance(String),

    /// External collaborator (object store, renderer backend) unavailable
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Registry error
    #[error("Registry error: {0}")]
    Registry(#[from] gradcert_registry::RegistryError),
}

/// Result type for certificate operations
pub type Result<T> = std::result::Result<T, CertificateError>;
