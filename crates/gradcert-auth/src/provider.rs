//! HTTP identity provider client.

use crate::{
    errors::{AuthError, Result},
    traits::IdentityProvider,
    types::StaffSession,
};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::warn;

/// Client for an external identity provider exposing
/// `POST /token`, `GET /session`, and `DELETE /session`
pub struct HttpIdentityProvider {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    email: &'a str,
    password: &'a str,
}

impl HttpIdentityProvider {
    /// Create a client for the provider at `base_url`
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn authenticate(&self, email: &str, password: &str) -> Result<StaffSession> {
        let response = self
            .client
            .post(format!("{}/token", self.base_url))
            .json(&TokenRequest { email, password })
            .send()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        match response.status() {
            s if s.is_success() => response
                .json()
                .await
                .map_err(|e| AuthError::Provider(e.to_string())),
            s if s == reqwest::StatusCode::UNAUTHORIZED => Err(AuthError::InvalidCredentials),
            s => {
                warn!("Identity provider answered {} to authenticate", s);
                Err(AuthError::Provider(format!("provider answered {}", s)))
            }
        }
    }

    async fn validate(&self, token: &str) -> Result<StaffSession> {
        let response = self
            .client
            .get(format!("{}/session", self.base_url))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        match response.status() {
            s if s.is_success() => response
                .json()
                .await
                .map_err(|e| AuthError::Provider(e.to_string())),
            s if s == reqwest::StatusCode::UNAUTHORIZED => Err(AuthError::SessionExpired),
            s => Err(AuthError::Provider(format!("provider answered {}", s))),
        }
    }

    async fn end_session(&self, token: &str) -> Result<()> {
        let response = self
            .client
            .delete(format!("{}/session", self.base_url))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        // An already-dead token ends the session just as well.
        if response.status().is_success() || response.status() == reqwest::StatusCode::UNAUTHORIZED
        {
            Ok(())
        } else {
            Err(AuthError::Provider(format!(
                "provider answered {}",
                response.status()
            )))
        }
    }
}
