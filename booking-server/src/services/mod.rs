//! 服务模块
//!
//! - [`EventBus`] - Booking 事件广播 (UI 刷新、自动化订阅)

pub mod event_bus;

pub use event_bus::{BookingEvent, BookingEventKind, EventBus};
