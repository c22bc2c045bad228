//! Idempotency Ledger Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Idempotency ledger entry
///
/// `(tenant_id, key)` is unique; written in the same transaction as the
/// booking it points to, read before any write on every confirm attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdempotencyRecord {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub tenant_id: String,
    pub key: String,
    #[serde(with = "serde_helpers::record_id")]
    pub booking: RecordId,
    pub created_at: i64,
}
