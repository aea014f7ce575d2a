use axum::{extract::State, response::Json};
use gradcert_auth::IdentityProvider;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{error::ApiError, extractors::AuthenticatedStaff, state::AppState};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub email: String,
    pub expires_at: u64,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// POST /v1/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let session = state.identity.authenticate(&req.email, &req.password).await?;

    Ok(Json(LoginResponse {
        token: session.token,
        email: session.email,
        expires_at: session.expires_at,
    }))
}

/// POST /v1/auth/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    staff: AuthenticatedStaff,
) -> Result<Json<LogoutResponse>, ApiError> {
    state.identity.end_session(&staff.session.token).await?;

    Ok(Json(LogoutResponse { success: true }))
}
