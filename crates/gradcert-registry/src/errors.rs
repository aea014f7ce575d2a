//! Registry error types.
//!
//! Storage-level errors are translated into this taxonomy at the registry
//! boundary; no raw store error type crosses into server code.

use thiserror::Error;
use uuid::Uuid;

/// Registry errors
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Uniqueness violation (external code, raced course number, hard
    /// re-insert of an enrollment pair)
    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// Missing or malformed required field
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Operation references a row that does not exist or would leave
    /// dependents inconsistent
    #[error("Referential integrity: {0}")]
    Referential(String),

    /// Lookup miss
    #[error("Not found: {0}")]
    NotFound(Uuid),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] gradcert_storage::StorageError),
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;
