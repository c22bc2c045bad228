//! Tenant resolution middleware
//!
//! 从 `x-tenant-id` 请求头解析租户；所有 `/api` 路由都经过此层。
//! 缺失 → AUTH_REQUIRED (401)，未知租户 → TENANT_NOT_FOUND (404)。

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::core::ServerState;
use shared::AppError;

pub const TENANT_HEADER: &str = "x-tenant-id";

/// Resolve the tenant and stash the context in request extensions
pub async fn tenant_middleware(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(tenant_id) = req
        .headers()
        .get(TENANT_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
    else {
        return AppError::auth_required().into_response();
    };

    match state.tenants.resolve(&tenant_id).await {
        Ok(ctx) => {
            req.extensions_mut().insert(ctx);
            next.run(req).await
        }
        Err(err) => err.into_response(),
    }
}
