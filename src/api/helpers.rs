//! API 帮助函数

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error_code::ErrorCode;
use super::types::ApiResponse;
use crate::errors::SluglinkError;

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

pub fn created_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::CREATED, ErrorCode::Success, "Created", Some(data))
}

/// 从 SluglinkError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
pub fn error_from_sluglink(err: &SluglinkError) -> HttpResponse {
    json_response::<()>(err.http_status(), ErrorCode::from(err), err.message(), None)
}

/// Decode a JSON request body, reporting failures as validation errors
pub fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, SluglinkError> {
    serde_json::from_slice(body)
        .map_err(|e| SluglinkError::validation(format!("Invalid request body: {}", e)))
}
