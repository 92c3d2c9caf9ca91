//! HTTP boundary
//!
//! Decodes requests, applies the token guard and preview-mode gate, calls
//! [`LinkService`](crate::services::LinkService), and maps its errors to
//! status codes.

pub mod auth;
pub mod error_code;
pub mod helpers;
pub mod links;
pub mod routes;
pub mod types;

pub use error_code::ErrorCode;
pub use routes::{api_config, link_routes};
pub use types::{ApiResponse, ApiSettings, LinkEnvelope};
