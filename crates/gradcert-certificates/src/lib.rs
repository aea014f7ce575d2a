//! # gradcert-certificates
//!
//! Verification Token Service and Certificate Resolver.
//!
//! The token service derives a public certificate URL from a student's
//! immutable id, renders it into a scannable image, and stores a reference
//! to the artifact on the student row. The resolver is the unauthenticated
//! read path that reconstructs a student's certificate view.

#![warn(clippy::all)]

pub mod errors;
pub mod object_store;
pub mod render;
pub mod service;
pub mod traits;
pub mod types;

pub use errors::{CertificateError, Result};
pub use object_store::HttpObjectStore;
pub use render::{QrRenderer, RenderOptions};
pub use service::CertificateService;
pub use traits::{CodeRenderer, ObjectStore};
pub use types::{CertificateCourse, CertificateView};
