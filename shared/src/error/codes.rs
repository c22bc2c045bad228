//! Stable error codes for the Heron platform
//!
//! Codes are carried as strings on the wire so the admin console and the
//! guest widgets can match on them without sharing a numeric table.
//! Organized by category:
//! - Validation: malformed or out-of-range input
//! - Auth: boundary failures from the tenant-resolution collaborator
//! - Reservation: domain outcomes of the booking engine
//! - System: storage or internal failures

use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::ErrorCategory;

/// Unified error code enum
///
/// Serialized as SCREAMING_SNAKE_CASE strings (`RESERVATION_CONFLICT`, ...)
/// for cross-language compatibility (Rust, TypeScript).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ==================== Validation ====================
    /// Malformed input: bad date format, missing field, out-of-range value
    ValidationError,
    /// Reservation start time is in the past
    ReservationPastTime,
    /// Reservation window is invalid (end <= start, bad format)
    ReservationInvalidTime,
    /// Confirm was called without an idempotency key
    MissingIdempotencyKey,

    // ==================== Auth / Tenant ====================
    /// No tenant credentials supplied
    AuthRequired,
    /// Tenant credentials rejected
    AuthInvalid,
    /// Tenant does not exist
    TenantNotFound,

    // ==================== Reservation ====================
    /// The table/window is already booked
    ReservationConflict,
    /// Resource (table, booking, hold) not found
    NotFound,

    // ==================== System ====================
    /// Unexpected storage failure
    DatabaseError,
    /// Unexpected logic failure
    InternalError,
}

impl ErrorCode {
    /// Wire representation of the code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::ReservationPastTime => "RESERVATION_PAST_TIME",
            Self::ReservationInvalidTime => "RESERVATION_INVALID_TIME",
            Self::MissingIdempotencyKey => "MISSING_IDEMPOTENCY_KEY",
            Self::AuthRequired => "AUTH_REQUIRED",
            Self::AuthInvalid => "AUTH_INVALID",
            Self::TenantNotFound => "TENANT_NOT_FOUND",
            Self::ReservationConflict => "RESERVATION_CONFLICT",
            Self::NotFound => "NOT_FOUND",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::ValidationError
            | Self::ReservationPastTime
            | Self::ReservationInvalidTime
            | Self::MissingIdempotencyKey => StatusCode::BAD_REQUEST,
            Self::AuthRequired | Self::AuthInvalid => StatusCode::UNAUTHORIZED,
            Self::TenantNotFound | Self::NotFound => StatusCode::NOT_FOUND,
            Self::ReservationConflict => StatusCode::CONFLICT,
            Self::DatabaseError | Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Default human-readable message
    pub fn message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Validation failed",
            Self::ReservationPastTime => "Reservation start time is in the past",
            Self::ReservationInvalidTime => "Reservation time window is invalid",
            Self::MissingIdempotencyKey => "Missing x-idempotency-key header",
            Self::AuthRequired => "Authentication required",
            Self::AuthInvalid => "Invalid credentials",
            Self::TenantNotFound => "Tenant not found",
            Self::ReservationConflict => "The requested table and time are no longer available",
            Self::NotFound => "Resource not found",
            Self::DatabaseError => "Database error",
            Self::InternalError => "Internal server error",
        }
    }

    /// Error category (used for logging decisions)
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationError
            | Self::ReservationPastTime
            | Self::ReservationInvalidTime
            | Self::MissingIdempotencyKey => ErrorCategory::Validation,
            Self::AuthRequired | Self::AuthInvalid | Self::TenantNotFound => ErrorCategory::Auth,
            Self::ReservationConflict | Self::NotFound => ErrorCategory::Reservation,
            Self::DatabaseError | Self::InternalError => ErrorCategory::System,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
