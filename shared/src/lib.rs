//! Shared types for the Heron platform
//!
//! Common types used across the booking server and client crates:
//! error codes, the unified API envelope, and booking wire types.

pub mod booking;
pub mod error;
pub mod request;
pub mod response;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use booking::{BookingStatus, BookingView, TableStatus, TableView};
pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use response::ErrorBody;
