//! HTTP API 模块
//!
//! # 路由结构
//!
//! | 路径 | 说明 | 租户 |
//! |------|------|------|
//! | GET /health | 健康检查 | 无 |
//! | POST /api/tables | 桌台目录 (含计算状态) | 必需 |
//! | POST /api/reservations/availability | 可用性排序 | 必需 |
//! | POST /api/reservations/hold | 创建 Hold | 必需 |
//! | POST /api/reservations/confirm | 幂等确认 | 必需 |
//! | POST /api/reservations/list | 当日预订列表 | 必需 |
//! | POST /api/reservations/update | 部分更新 | 必需 |
//!
//! 所有 `/api` 路由经过租户解析中间件；所有响应统一
//! `{data}` / `{error:{code,message,requestId}}` 信封。

pub mod convert;
pub mod health;
pub mod middleware;
pub mod reservations;
pub mod tables;

use std::time::Duration;

use axum::Router;
use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;

use crate::auth::tenant_middleware;
use crate::core::{Config, ServerState};

/// Assemble the full application router
pub fn router(state: ServerState) -> Router {
    let tenant_routes = Router::new()
        .merge(tables::router())
        .merge(reservations::router())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            tenant_middleware,
        ));

    // The context middleware sits outside the timeout so its 408 passes
    // through the envelope/logging path like any other response
    Router::new()
        .merge(health::router())
        .merge(tenant_routes)
        .layer(TimeoutLayer::new(Duration::from_millis(
            state.config.request_timeout_ms,
        )))
        .layer(axum::middleware::from_fn(
            middleware::request_context_middleware,
        ))
        .layer(cors_layer(&state.config))
        .with_state(state)
}

/// Boundary-layer CORS configuration, built once from [`Config`]
///
/// 所有 handler 统一使用；不允许按端点散落 CORS 分支。
fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    if config.cors_allowed_origins.trim() == "*" {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}
