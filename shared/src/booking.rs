//! Booking wire types shared between the booking server and client surfaces
//!
//! The admin console and guest widgets render from these enums, so the
//! transition rules live here rather than server-side only (clients use
//! them to grey out illegal actions before a round trip).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Booking lifecycle status
///
/// `pending` is deliberately absent: a pending reservation is a Hold, not a
/// booking row. A booking is born `confirmed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Confirmed,
    Seated,
    Completed,
    Cancelled,
    NoShow,
}

impl BookingStatus {
    /// Whether this status admits no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::NoShow)
    }

    /// Whether the booking occupies its table for conflict purposes
    pub fn blocks_table(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Seated)
    }

    /// Legal status transitions
    ///
    /// ```text
    /// confirmed -> seated -> completed
    /// confirmed | seated -> cancelled
    /// confirmed -> no_show
    /// ```
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (Self::Confirmed, Self::Seated)
                | (Self::Confirmed, Self::Cancelled)
                | (Self::Confirmed, Self::NoShow)
                | (Self::Seated, Self::Completed)
                | (Self::Seated, Self::Cancelled)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Seated => "seated",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no_show",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Computed table status for the catalog view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    /// No active booking touches the table right now
    Available,
    /// A confirmed/seated booking window contains "now"
    Occupied,
    /// A future confirmed booking exists today
    Reserved,
    /// Table is flagged out of service
    Maintenance,
}

/// Wire representation of a durable booking
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingView {
    pub id: String,
    pub tenant_id: String,
    pub table_id: String,
    pub party_size: i32,
    pub start: chrono::DateTime<chrono::Utc>,
    pub end: chrono::DateTime<chrono::Utc>,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    pub status: BookingStatus,
    /// Human-facing confirmation code (stable across idempotent replays)
    pub confirmation_code: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Wire representation of a bookable table with computed status
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub id: String,
    pub name: String,
    pub capacity: i32,
    pub section: String,
    pub status: TableStatus,
}

/// Wire representation of a freshly issued hold
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldView {
    pub hold_id: String,
    pub table_id: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

/// Availability candidate with fit score
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCandidate {
    pub table: TableView,
    pub fit_score: i32,
}
