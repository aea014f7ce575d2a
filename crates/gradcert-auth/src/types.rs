//! Session types.

use serde::{Deserialize, Serialize};

/// A staff session issued by the external identity provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StaffSession {
    /// Opaque bearer token; the provider owns its format and lifetime
    pub token: String,
    /// Email the session was issued for
    pub email: String,
    /// Unix seconds after which the provider will stop validating the token
    pub expires_at: u64,
}
