//! Tenant resolution interface
//!
//! The platform's auth service owns tenants; the booking engine only
//! needs "which tenant is this request for, and does it exist". The
//! trait is the seam where the real resolver plugs in.

use async_trait::async_trait;
use std::collections::HashMap;

use shared::{AppError, AppResult};

/// Resolved tenant for the current request
///
/// Inserted into request extensions by the tenant middleware; handlers
/// receive it through the extractor.
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub tenant_id: String,
    pub display_name: String,
}

/// Tenant resolution seam (external collaborator)
#[async_trait]
pub trait TenantResolver: Send + Sync {
    /// Resolve a tenant id to its context, or fail with
    /// `TENANT_NOT_FOUND`
    async fn resolve(&self, tenant_id: &str) -> AppResult<TenantContext>;
}

/// Config-backed resolver for development and tests
///
/// Parses the `TENANTS` spec: comma-separated `id:display name` entries.
pub struct StaticTenantResolver {
    tenants: HashMap<String, String>,
}

impl StaticTenantResolver {
    pub fn from_spec(spec: &str) -> Self {
        let tenants = spec
            .split(',')
            .filter_map(|entry| {
                let (id, name) = entry.split_once(':')?;
                let id = id.trim();
                if id.is_empty() {
                    return None;
                }
                Some((id.to_string(), name.trim().to_string()))
            })
            .collect();
        Self { tenants }
    }
}

#[async_trait]
impl TenantResolver for StaticTenantResolver {
    async fn resolve(&self, tenant_id: &str) -> AppResult<TenantContext> {
        match self.tenants.get(tenant_id) {
            Some(name) => Ok(TenantContext {
                tenant_id: tenant_id.to_string(),
                display_name: name.clone(),
            }),
            None => Err(AppError::tenant_not_found(tenant_id)),
        }
    }
}
