//! Link endpoints: create, edit, query

use actix_web::{HttpResponse, web};
use tracing::{info, trace};

use super::helpers::{created_response, decode_body, error_from_sluglink, success_response};
use super::types::{ApiSettings, LinkEnvelope, QueryLinkParams};
use crate::errors::SluglinkError;
use crate::services::{EditLinkRequest, LinkPayload, LinkService};

/// POST /link/create
pub async fn create_link(service: web::Data<LinkService>, body: web::Bytes) -> HttpResponse {
    let payload: LinkPayload = match decode_body(&body) {
        Ok(payload) => payload,
        Err(e) => return error_from_sluglink(&e),
    };
    trace!("API: create request for {:?}", payload.slug);

    match service.create(payload).await {
        Ok(link) => created_response(LinkEnvelope { link }),
        Err(e) => error_from_sluglink(&e),
    }
}

/// PUT /link/edit
pub async fn edit_link(
    service: web::Data<LinkService>,
    settings: web::Data<ApiSettings>,
    body: web::Bytes,
) -> HttpResponse {
    if settings.preview_mode {
        info!("API: edit refused in preview mode");
        return error_from_sluglink(&SluglinkError::forbidden("Preview mode cannot edit links."));
    }

    let request: EditLinkRequest = match decode_body(&body) {
        Ok(request) => request,
        Err(e) => return error_from_sluglink(&e),
    };

    match service.edit(request).await {
        Ok(link) => created_response(LinkEnvelope { link }),
        Err(e) => error_from_sluglink(&e),
    }
}

/// GET /link/query?slug=
pub async fn query_link(
    service: web::Data<LinkService>,
    query: web::Query<QueryLinkParams>,
) -> HttpResponse {
    let Some(slug) = query.slug.as_deref().filter(|s| !s.trim().is_empty()) else {
        return error_from_sluglink(&SluglinkError::validation("Query parameter 'slug' is required"));
    };

    match service.fetch(slug).await {
        Ok(link) => success_response(LinkEnvelope { link }),
        Err(e) => error_from_sluglink(&e),
    }
}
