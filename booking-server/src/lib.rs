//! Heron Booking Server - 多租户餐厅预订引擎
//!
//! # 架构概述
//!
//! 本模块是预订引擎的主入口，提供以下核心功能：
//!
//! - **预订核心** (`booking`): 冲突检测、可用性排序、Hold、幂等确认
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储 + 仓库层
//! - **租户解析** (`auth`): 外部协作者接口 (x-tenant-id)
//! - **HTTP API** (`api`): RESTful API 接口
//! - **事件通知** (`services/event_bus`): Booking 创建/更新广播
//!
//! # 模块结构
//!
//! ```text
//! booking-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # 租户解析与提取
//! ├── booking/       # 预订领域核心
//! ├── db/            # 数据库层 (models + repository)
//! ├── api/           # HTTP 路由和处理器
//! ├── services/      # 事件总线
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod auth;
pub mod booking;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{TenantContext, TenantResolver};
pub use booking::{AvailabilityRanker, ConfirmationFinalizer, ConflictDetector, HoldManager};
pub use core::{Config, Server, ServerState};
pub use services::{BookingEvent, EventBus};

// Re-export unified error types from shared
pub use shared::{ApiResponse, AppError, AppResult, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    __  __
   / / / /__  _________  ____
  / /_/ / _ \/ ___/ __ \/ __ \
 / __  /  __/ /  / /_/ / / / /
/_/ /_/\___/_/   \____/_/ /_/
    ____              __   _
   / __ )____  ____  / /__(_)___  ____ _
  / __  / __ \/ __ \/ //_/ / __ \/ __ `/
 / /_/ / /_/ / /_/ / ,< / / / / / /_/ /
/_____/\____/\____/_/|_/_/_/ /_/\__, /
                               /____/
    "#
    );
}
