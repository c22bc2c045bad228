//! Booking Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::BookingStatus;
use surrealdb::RecordId;

/// Durable booking entity
///
/// Created exactly once by the confirmation finalizer; afterwards only the
/// status/window/table fields change through the update path.
///
/// Invariants:
/// - `end > start`
/// - `party_size <= capacity` of the assigned table
/// - `(tenant_id, idempotency_key)` is unique
/// - no two rows with a blocking status overlap on the same table
///   (enforced by the serialized confirm/reschedule write paths)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub tenant_id: String,
    #[serde(with = "serde_helpers::record_id")]
    pub table: RecordId,
    /// Unix millis
    pub start: i64,
    /// Unix millis, exclusive
    pub end: i64,
    pub party_size: i32,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: String,
    #[serde(default)]
    pub special_requests: Option<String>,
    pub status: BookingStatus,
    pub idempotency_key: String,
    pub confirmation_code: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Payload for the transactional confirmed-booking insert
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCreate {
    pub tenant_id: String,
    #[serde(with = "serde_helpers::record_id")]
    pub table: RecordId,
    pub start: i64,
    pub end: i64,
    pub party_size: i32,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: String,
    pub special_requests: Option<String>,
    pub idempotency_key: String,
}
