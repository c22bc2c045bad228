//! Reservations API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/reservations/availability | POST | 可用性排序 |
//! | /api/reservations/hold | POST | 创建 Hold |
//! | /api/reservations/confirm | POST | 幂等确认 |
//! | /api/reservations/list | POST | 当日预订列表 |
//! | /api/reservations/update | POST | 部分更新 |

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/reservations/availability", post(handler::availability))
        .route("/api/reservations/hold", post(handler::hold))
        .route("/api/reservations/confirm", post(handler::confirm))
        .route("/api/reservations/list", post(handler::list))
        .route("/api/reservations/update", post(handler::update))
}
