//! 工具模块 - 通用工具函数
//!
//! # 内容
//!
//! - [`logger`] - 日志初始化
//! - [`time`] - 时间转换 (API 层日期 → Unix millis)

pub mod logger;
pub mod time;

pub use logger::{init_logger, init_logger_with_file};
