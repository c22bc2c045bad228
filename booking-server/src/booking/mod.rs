//! 预订领域核心
//!
//! # 模块结构
//!
//! - [`conflict`] - 半开区间重叠规则、冲突检测
//! - [`availability`] - 可用性排序 (fit score)
//! - [`hold`] - 内存 Hold 管理 (非持久、被动过期)
//! - [`locks`] - (租户, 桌台) 级写串行化
//! - [`confirm`] - 幂等确认终结器 (事务写入)
//! - [`validation`] - 输入验证

pub mod availability;
pub mod confirm;
pub mod conflict;
pub mod hold;
pub mod locks;
pub mod validation;

pub use availability::{AvailabilityRanker, RankedTable, fit_score};
pub use confirm::{ConfirmOutcome, ConfirmationFinalizer};
pub use conflict::{ConflictDetector, windows_overlap};
pub use hold::{Hold, HoldManager};
pub use locks::TableLocks;

use crate::db::repository::RepoError;
use shared::AppError;

/// Map a repository error onto the wire taxonomy
///
/// `DuplicateKey` deliberately maps to an internal error: every caller
/// that can hit it resolves it to an idempotent replay first, so one
/// reaching this function is a logic bug.
pub fn repo_err(err: RepoError) -> AppError {
    match err {
        RepoError::NotFound(msg) => AppError::not_found(msg),
        RepoError::Conflict(_) => AppError::conflict(),
        RepoError::Validation(msg) => AppError::validation(msg),
        RepoError::DuplicateKey(msg) => AppError::internal(msg),
        RepoError::TxRetry(msg) | RepoError::Database(msg) => AppError::database(msg),
    }
}
