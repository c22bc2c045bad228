//! TenantContext extractor
//!
//! Pulls the resolved tenant out of request extensions. Only routes
//! behind [`super::tenant_middleware`] can extract it; elsewhere the
//! extractor fails with AUTH_REQUIRED rather than panicking.

use axum::{extract::FromRequestParts, http::request::Parts};

use super::resolver::TenantContext;
use shared::AppError;

impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TenantContext>()
            .cloned()
            .ok_or_else(AppError::auth_required)
    }
}
