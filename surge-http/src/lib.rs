//! HTTP client functionality for surge
//!
//! [`CloudApi`] wraps a shared `reqwest` client bound to the service base
//! URL. Every backend operation the load-test phases drive is a method on
//! it, grouped by area under [`actions`].

pub mod actions;
pub mod auth;
pub mod client;
pub mod errors;
pub mod types;

pub use actions::connections::short_did;
pub use actions::revocation::PublishOutcome;
pub use actions::verification::CredentialSelection;
pub use auth::{AuthHeaders, AuthMode};
pub use client::{tenant_headers, ApiResponse, CloudApi};
pub use errors::{HttpError, HttpResult};
pub use types::*;
