//! # gradcert-auth
//!
//! Staff authentication gate.
//!
//! Authentication is delegated to an external identity provider; this crate
//! defines the capability trait the server is written against and the HTTP
//! client implementation. A valid session is a boolean gate for staff
//! operations; there are no roles or scopes.

#![warn(clippy::all)]

pub mod errors;
pub mod provider;
pub mod traits;
pub mod types;

pub use errors::{AuthError, Result};
pub use provider::HttpIdentityProvider;
pub use traits::IdentityProvider;
pub use types::StaffSession;
