//! API 帮助函数
//!
//! `HandbookError` 到 HTTP 响应的映射只在这里发生一次。

use actix_web::error::{InternalError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse};
use serde::Serialize;
use tracing::debug;
use ts_rs::TS;

use crate::errors::HandbookError;
use crate::services::TS_EXPORT_PATH;

/// 5xx 响应统一返回的文案，内部细节只写日志
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// `{ success, message }` 响应体
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// 构建 `{ success, message }` JSON 响应
pub fn message_response(status: StatusCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(MessageResponse {
        success: status.is_success(),
        message: message.into(),
    })
}

/// 构建成功响应
pub fn success_message(message: impl Into<String>) -> HttpResponse {
    message_response(StatusCode::OK, message)
}

/// 从 HandbookError 构建错误响应
///
/// 校验错误原样返回消息（400），其它一律 500 + 通用文案。
pub fn error_from_handbook(err: &HandbookError) -> HttpResponse {
    let status = err.http_status();
    if err.is_client_error() {
        message_response(status, err.message())
    } else {
        message_response(status, INTERNAL_ERROR_MESSAGE)
    }
}

/// 统一 Result → HttpResponse 转换：成功时 200 + JSON 数据
pub fn api_result<T: Serialize>(result: Result<T, HandbookError>) -> HttpResponse {
    match result {
        Ok(data) => HttpResponse::Ok().json(data),
        Err(e) => error_from_handbook(&e),
    }
}

/// 查询参数解析失败 → 400，响应体与其它错误一致
pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("Rejected query string for {}: {}", req.path(), err);
    let response = message_response(
        StatusCode::BAD_REQUEST,
        format!("Invalid query string: {}", err),
    );
    InternalError::from_response(err, response).into()
}
