use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use gradcert_auth::{IdentityProvider, StaffSession};
use std::sync::Arc;

use crate::{error::ApiError, state::AppState};

/// Extractor gating staff-only routes
///
/// Pulls the bearer token and validates it against the external identity
/// provider. A valid session is all the authorization there is; there are
/// no roles. The public certificate route never uses this extractor.
pub struct AuthenticatedStaff {
    pub session: StaffSession,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthenticatedStaff {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized)?;

        let session = state.identity.validate(token).await.map_err(|e| {
            tracing::warn!("Session validation failed: {}", e);
            match e {
                gradcert_auth::AuthError::Provider(msg) => ApiError::ExternalService(msg),
                _ => ApiError::Unauthorized,
            }
        })?;

        Ok(AuthenticatedStaff { session })
    }
}
