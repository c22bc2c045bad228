//! Wire request payloads for the reservation API
//!
//! Shared with the guest widgets and the admin console so both sides
//! agree on field names. Timestamps are RFC 3339 strings on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::booking::BookingStatus;

/// POST /api/reservations/hold
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldRequest {
    pub table_id: String,
    pub party_size: i32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub idempotency_key: String,
}

/// POST /api/reservations/confirm
///
/// Either `hold_id` or the raw slot (`table_id` + window) must be supplied.
/// The idempotency key travels in the `x-idempotency-key` header, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmRequest {
    #[serde(default)]
    pub hold_id: Option<String>,
    #[serde(default)]
    pub table_id: Option<String>,
    #[serde(default)]
    pub party_size: Option<i32>,
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    /// End of the window; if absent, derived from `start` + `duration_minutes`
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_minutes: Option<i64>,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: String,
    #[serde(default)]
    pub special_requests: Option<String>,
}

/// POST /api/reservations/availability
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRequest {
    pub party_size: i32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// POST /api/reservations/list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequest {
    /// Day to list, YYYY-MM-DD
    pub date: String,
    #[serde(default)]
    pub filters: Option<ListFilters>,
}

/// Optional list filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFilters {
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub status: Option<BookingStatus>,
}

/// POST /api/reservations/update
///
/// Only supplied fields are changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    pub reservation_id: String,
    #[serde(default)]
    pub table_id: Option<String>,
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<BookingStatus>,
}
