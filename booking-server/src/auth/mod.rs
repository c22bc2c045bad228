//! 租户解析模块
//!
//! 认证/授权和多租户解析是外部协作者；本模块只定义接口和请求边界：
//!
//! - [`TenantResolver`] - 解析接口 (生产部署注入真实实现)
//! - [`StaticTenantResolver`] - 配置驱动的开发/测试实现
//! - [`tenant_middleware`] - 从 `x-tenant-id` 解析并注入 [`TenantContext`]

pub mod extractor;
pub mod middleware;
pub mod resolver;

pub use middleware::tenant_middleware;
pub use resolver::{StaticTenantResolver, TenantContext, TenantResolver};
