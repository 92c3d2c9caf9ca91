//! API 路由配置

use actix_web::middleware::from_fn;
use actix_web::web;

use super::auth::require_token;
use super::links::{create_link, edit_link, query_link};

/// 链接路由 `/link`
///
/// - POST /link/create - 创建链接
/// - PUT /link/edit - 编辑 / 迁移链接
/// - GET /link/query?slug= - 查询链接
pub fn link_routes() -> actix_web::Scope {
    web::scope("/link")
        .route("/create", web::post().to(create_link))
        .route("/edit", web::put().to(edit_link))
        .route("/query", web::get().to(query_link))
}

/// Mount the API under `prefix`, behind the token guard.
///
/// ```ignore
/// App::new().configure(api_config("/api"))
/// ```
pub fn api_config(prefix: &str) -> impl FnOnce(&mut web::ServiceConfig) {
    let prefix = prefix.to_string();
    move |cfg| {
        cfg.service(
            web::scope(&prefix)
                .wrap(from_fn(require_token))
                .service(link_routes()),
        );
    }
}
