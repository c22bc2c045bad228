//! Unified error system for the Heron platform
//!
//! This module provides the error handling system shared by the booking
//! server and its clients:
//! - [`ErrorCode`]: stable string codes carried on the wire
//! - [`ErrorCategory`]: classification of errors by domain
//! - [`AppError`]: rich error type with code, message, and details
//! - [`ApiResponse`]: unified API response envelope
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! // Simple error with the default message
//! let err = AppError::new(ErrorCode::ReservationConflict);
//!
//! // Error with a custom message and a detail entry
//! let err = AppError::validation("party size out of range")
//!     .with_detail("field", "party_size");
//!
//! assert_eq!(err.code.as_str(), "VALIDATION_ERROR");
//! ```

mod category;
mod codes;
mod types;

pub use category::ErrorCategory;
pub use codes::ErrorCode;
pub use types::{ApiResponse, AppError, AppResult};
