//! Authentication error types.

use thiserror::Error;

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email/password pair rejected by the identity provider
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Session token missing, unknown, or expired
    #[error("Session expired or invalid")]
    SessionExpired,

    /// Identity provider unreachable or answering with a server error;
    /// retryable, never fatal to the core's consistency
    #[error("Identity provider error: {0}")]
    Provider(String),
}

/// Result type for authentication operations
pub type Result<T> = std::result::Result<T, AuthError>;
