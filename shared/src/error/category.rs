//! Error categories
//!
//! Coarse classification of [`super::ErrorCode`] values. Categories drive
//! logging policy: System errors are logged at error level with full detail,
//! everything else is expected request traffic.

use serde::{Deserialize, Serialize};

/// Error category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Malformed or out-of-range input
    Validation,
    /// Tenant-resolution / authentication boundary failures
    Auth,
    /// Domain outcomes of the booking engine (conflict, not found)
    Reservation,
    /// Storage or internal failures
    System,
}

impl ErrorCategory {
    /// Whether errors in this category indicate a server-side fault
    pub fn is_server_fault(&self) -> bool {
        matches!(self, Self::System)
    }
}
