//! Database Models
//!
//! Row types for the embedded SurrealDB store. Timestamps are stored as
//! Unix millis (`i64`); all date conversion happens at the API handler
//! layer (`api/convert.rs`).

pub mod booking;
pub mod dining_table;
pub mod idempotency;
pub mod serde_helpers;

pub use booking::{Booking, BookingCreate};
pub use dining_table::{DiningTable, DiningTableCreate};
pub use idempotency::IdempotencyRecord;
