//! Bearer token guard for the link API

use actix_web::Error;
use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Next;
use actix_web::web;
use subtle::ConstantTimeEq;
use tracing::{info, trace};

use super::helpers::error_from_sluglink;
use super::types::ApiSettings;
use crate::errors::SluglinkError;

/// 从 Authorization header 提取 Bearer token
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.trim().to_string())
}

/// Rejects requests without the configured token; open when none is set.
pub async fn require_token(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let expected = req
        .app_data::<web::Data<ApiSettings>>()
        .and_then(|settings| settings.token.clone());

    if let Some(expected) = expected {
        let authorized = extract_bearer_token(&req)
            .is_some_and(|provided| bool::from(provided.as_bytes().ct_eq(expected.as_bytes())));

        if !authorized {
            info!("API authentication failed for {}", req.path());
            let response =
                error_from_sluglink(&SluglinkError::unauthorized("Invalid or missing token"));
            return Ok(req.into_response(response));
        }
        trace!("Bearer token accepted");
    }

    Ok(next.call(req).await?.map_into_boxed_body())
}
