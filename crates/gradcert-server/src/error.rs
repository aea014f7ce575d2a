use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gradcert_auth::AuthError;
use gradcert_certificates::CertificateError;
use gradcert_registry::RegistryError;
use serde::Serialize;

/// API error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Referential integrity: {0}")]
    Referential(String),

    #[error("Artifact issuance failed: {0}")]
    ArtifactIssuance(String),

    #[error("External service unavailable: {0}")]
    ExternalService(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Missing or invalid session".to_string(),
            ),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Email or password is incorrect".to_string(),
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "DUPLICATE", msg),
            ApiError::Referential(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "REFERENTIAL", msg)
            }
            ApiError::ArtifactIssuance(msg) => {
                (StatusCode::BAD_GATEWAY, "ARTIFACT_ISSUANCE_FAILED", msg)
            }
            ApiError::ExternalService(msg) => {
                tracing::warn!("External service unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "EXTERNAL_SERVICE_UNAVAILABLE",
                    "An external service is temporarily unavailable".to_string(),
                )
            }
            ApiError::Internal(err) => {
                tracing::error!("Internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: ErrorDetails {
                code: code.to_string(),
                message,
            },
        });

        (status, body).into_response()
    }
}

impl From<RegistryError> for ApiError {
    fn from(error: RegistryError) -> Self {
        match error {
            RegistryError::Validation(msg) => ApiError::InvalidRequest(msg),
            RegistryError::Duplicate(msg) => ApiError::Conflict(msg),
            RegistryError::Referential(msg) => ApiError::Referential(msg),
            RegistryError::NotFound(id) => ApiError::NotFound(format!("no record for {}", id)),
            RegistryError::Storage(e) => ApiError::Internal(anyhow::anyhow!(e)),
        }
    }
}

impl From<CertificateError> for ApiError {
    fn from(error: CertificateError) -> Self {
        match error {
            CertificateError::NotFound(id) => {
                ApiError::NotFound(format!("no certificate for {}", id))
            }
            CertificateError::ArtifactIssuance(msg) => ApiError::ArtifactIssuance(msg),
            CertificateError::ExternalService(msg) => ApiError::ExternalService(msg),
            CertificateError::Registry(e) => e.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::InvalidCredentials => ApiError::InvalidCredentials,
            AuthError::SessionExpired => ApiError::Unauthorized,
            AuthError::Provider(msg) => ApiError::ExternalService(msg),
        }
    }
}
