//! Idempotency Ledger Repository
//!
//! Reads only. The ledger entry itself is written inside the confirm
//! transaction (see [`super::BookingRepository::create_confirmed`]) so it
//! cannot diverge from the booking it points to.

use super::{BaseRepository, RepoResult};
use crate::db::models::IdempotencyRecord;
use surrealdb::engine::local::Db;
use surrealdb::Surreal;

#[derive(Clone)]
pub struct IdempotencyRepository {
    base: BaseRepository,
}

impl IdempotencyRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Look up the outcome of a previously processed confirm
    pub async fn find(&self, tenant_id: &str, key: &str) -> RepoResult<Option<IdempotencyRecord>> {
        let records: Vec<IdempotencyRecord> = self
            .base
            .db()
            .query("SELECT * FROM idempotency WHERE tenant_id = $tenant_id AND key = $key LIMIT 1")
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("key", key.to_string()))
            .await?
            .take(0)?;
        Ok(records.into_iter().next())
    }
}
