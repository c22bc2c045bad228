//! Per-table write serialization
//!
//! 同一 (租户, 桌台) 的确认/改期写入串行执行。嵌入式单进程部署下，
//! 这把锁让 "冲突检查 + 插入" 成为临界区；事务内的重叠谓词仍然保留，
//! 作为存储层的最后一道防线。

use std::sync::Arc;

use dashmap::DashMap;
use surrealdb::RecordId;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Async write lock per (tenant, table) pair
///
/// The map grows with the number of distinct tables written to, which is
/// bounded by the tenant catalogs. Guards are dropped at the end of the
/// write path; nothing holds a lock across requests.
pub struct TableLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl TableLocks {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Acquire the write lock for a tenant's table
    pub async fn acquire(&self, tenant_id: &str, table: &RecordId) -> OwnedMutexGuard<()> {
        let key = format!("{}:{}", tenant_id, table);
        let lock = self.locks.entry(key).or_default().clone();
        lock.lock_owned().await
    }
}

impl Default for TableLocks {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_table_is_exclusive() {
        let locks = TableLocks::new();
        let table: RecordId = "dining_table:a".parse().unwrap();

        let guard = locks.acquire("t1", &table).await;
        let blocked =
            tokio::time::timeout(Duration::from_millis(50), locks.acquire("t1", &table)).await;
        assert!(blocked.is_err());

        drop(guard);
        let reacquired =
            tokio::time::timeout(Duration::from_millis(50), locks.acquire("t1", &table)).await;
        assert!(reacquired.is_ok());
    }

    #[tokio::test]
    async fn test_other_tables_are_independent() {
        let locks = TableLocks::new();
        let a: RecordId = "dining_table:a".parse().unwrap();
        let b: RecordId = "dining_table:b".parse().unwrap();

        let _guard = locks.acquire("t1", &a).await;
        let other =
            tokio::time::timeout(Duration::from_millis(50), locks.acquire("t1", &b)).await;
        assert!(other.is_ok());
    }

    #[tokio::test]
    async fn test_tenants_do_not_share_locks() {
        let locks = TableLocks::new();
        let table: RecordId = "dining_table:a".parse().unwrap();

        let _guard = locks.acquire("t1", &table).await;
        let other =
            tokio::time::timeout(Duration::from_millis(50), locks.acquire("t2", &table)).await;
        assert!(other.is_ok());
    }
}
