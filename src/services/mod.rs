//! Service layer for business logic
//!
//! The link lifecycle lives here; the HTTP boundary in `api` only decodes
//! requests and maps errors.

mod cleanup;
mod expiration;
mod link_service;

pub use cleanup::CleanupRetry;
pub use expiration::{DEFAULT_MIN_TTL, ExpirationPolicy, MAX_EXPIRATION};
pub use link_service::*;
