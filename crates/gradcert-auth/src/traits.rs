//! Identity provider trait definition.

use crate::{errors::Result, types::StaffSession};
use async_trait::async_trait;

/// External identity provider
///
/// The server treats a session returned by `validate` as a boolean gate for
/// staff-only operations; the public certificate resolver never consults it.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange staff credentials for a session
    async fn authenticate(&self, email: &str, password: &str) -> Result<StaffSession>;

    /// Validate a bearer token, returning the session it belongs to
    async fn validate(&self, token: &str) -> Result<StaffSession>;

    /// End a session; a token already invalid is not an error
    async fn end_session(&self, token: &str) -> Result<()>;
}
