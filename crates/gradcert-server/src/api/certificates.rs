use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use gradcert_certificates::CertificateError;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::state::AppState;

/// GET /certificate/:student_id
///
/// The public, unauthenticated read path. Anything that is not a clean hit
/// collapses to a generic not-found or unavailability body; internal error
/// detail never leaves this handler.
pub async fn resolve(
    State(state): State<Arc<AppState>>,
    Path(student_id): Path<String>,
) -> Response {
    // A malformed id can't belong to any certificate; same answer as a miss.
    let student_id = match Uuid::parse_str(&student_id) {
        Ok(id) => id,
        Err(_) => return not_found(),
    };

    match state.certificates.resolve(student_id).await {
        Ok(view) => Json(view).into_response(),
        Err(CertificateError::NotFound(_)) => not_found(),
        Err(e) => {
            tracing::error!("Certificate resolution failed for {}: {}", student_id, e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "error": {
                        "code": "UNAVAILABLE",
                        "message": "The certificate service is temporarily unavailable"
                    }
                })),
            )
                .into_response()
        }
    }
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": {
                "code": "NOT_FOUND",
                "message": "The certificate you're looking for doesn't exist"
            }
        })),
    )
        .into_response()
}
