use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::{StaticTenantResolver, TenantResolver};
use crate::booking::{HoldManager, TableLocks};
use crate::core::error::{Result, ServerError};
use crate::core::Config;
use crate::db::DbService;
use crate::services::{BookingEvent, BookingEventKind, EventBus};
use shared::booking::BookingView;

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是预订引擎的核心数据结构，持有所有服务的共享引用。
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | holds | Arc<HoldManager> | 内存 Hold 存储 (非持久) |
/// | table_locks | Arc<TableLocks> | (租户, 桌台) 写锁 |
/// | events | EventBus | Booking 事件广播 |
/// | tenants | Arc<dyn TenantResolver> | 租户解析 (外部协作者接口) |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// Hold 管理器 (进程内，进程重启即失效)
    pub holds: Arc<HoldManager>,
    /// 桌台写锁 (进程内; 单进程部署下写路径的串行化点)
    pub table_locks: Arc<TableLocks>,
    /// Booking 事件总线
    pub events: EventBus,
    /// 租户解析服务
    pub tenants: Arc<dyn TenantResolver>,
}

impl ServerState {
    /// 初始化服务器状态 (生产路径: RocksDB 持久存储)
    pub async fn initialize(config: &Config) -> Result<Self> {
        std::fs::create_dir_all(&config.work_dir)
            .map_err(|e| ServerError::Config(format!("cannot create work dir: {e}")))?;

        let db = DbService::new(&config.db_path())
            .await
            .map_err(|e| ServerError::Database(e.to_string()))?;

        Ok(Self::with_db(config.clone(), db.db))
    }

    /// 用已有数据库构造状态 (测试使用 kv-mem)
    pub fn with_db(config: Config, db: Surreal<Db>) -> Self {
        let holds = Arc::new(HoldManager::new(config.hold_ttl_minutes));
        let tenants: Arc<dyn TenantResolver> =
            Arc::new(StaticTenantResolver::from_spec(&config.tenants));

        Self {
            config,
            db,
            holds,
            table_locks: Arc::new(TableLocks::new()),
            events: EventBus::new(),
            tenants,
        }
    }

    /// 覆盖租户解析器 (接入真实租户服务时使用)
    pub fn with_tenant_resolver(mut self, resolver: Arc<dyn TenantResolver>) -> Self {
        self.tenants = resolver;
        self
    }

    /// 广播 Booking 事件
    ///
    /// UI 层和自动化订阅者通过 [`EventBus::subscribe`] 接收；
    /// 没有订阅者时静默丢弃。
    pub fn publish_booking_event(&self, kind: BookingEventKind, booking: &BookingView) {
        self.events.publish(BookingEvent {
            tenant_id: booking.tenant_id.clone(),
            kind,
            booking: booking.clone(),
        });
    }
}
