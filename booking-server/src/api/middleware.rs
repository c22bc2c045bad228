//! 请求上下文中间件
//!
//! 每个请求一个 request id (沿用 `x-request-id` 或生成 UUID)：
//! - 记录请求日志 (方法、路径、状态码、延迟)
//! - 错误响应信封注入 `requestId` 并回传 `x-request-id` 头

use axum::{
    Json,
    extract::{MatchedPath, Request},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::Instant;
use tracing::{info, warn};

use shared::{ApiResponse, AppError, ErrorCode};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request context middleware
pub async fn request_context_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();

    // 沿用调用方的 request id，否则生成
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let method = req.method().clone();
    let uri = req.uri().clone();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    let tenant = req
        .headers()
        .get("x-tenant-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let mut response = next.run(req).await;

    // 错误信封：IntoResponse 把 AppError 放进 response extensions，
    // 这里补上 request id 重建 body
    if let Some(err) = response.extensions().get::<AppError>().cloned() {
        let status = err.http_status();
        let body = ApiResponse::<()>::error(&err, &request_id);
        response = (status, Json(body)).into_response();
    } else if response.status().is_client_error() || response.status().is_server_error() {
        // 超时层和 extractor rejection 直接产出裸 body；统一包进信封，
        // 保留原状态码
        let status = response.status();
        let body = ApiResponse::<()>::error(&envelope_for_status(status), &request_id);
        response = (status, Json(body)).into_response();
    }

    if let Ok(header_value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(REQUEST_ID_HEADER, header_value);
    }

    let status = response.status();
    let latency_ms = start.elapsed().as_millis();

    if status.is_server_error() {
        warn!(
            request_id = %request_id,
            method = %method,
            path = %path,
            tenant = %tenant,
            status = %status.as_u16(),
            latency_ms = %latency_ms,
            "request failed"
        );
    } else {
        info!(
            request_id = %request_id,
            method = %method,
            path = %path,
            tenant = %tenant,
            status = %status.as_u16(),
            latency_ms = %latency_ms,
            "request"
        );
    }

    response
}

/// Closest error code for a response that carries no [`AppError`]
///
/// Constructed directly (not via the logging constructors): the request
/// log below already records the status.
fn envelope_for_status(status: StatusCode) -> AppError {
    let message = status.canonical_reason().unwrap_or("Request failed");
    if status == StatusCode::NOT_FOUND {
        AppError::with_message(ErrorCode::NotFound, message)
    } else if status.is_client_error() {
        AppError::with_message(ErrorCode::ValidationError, message)
    } else {
        AppError::with_message(ErrorCode::InternalError, message)
    }
}
