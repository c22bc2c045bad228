//! Reservation Handlers
//!
//! Handler 层只做三件事: 解析请求、调用领域服务、转换响应。
//! 时间戳在这里从 RFC 3339 转成 Unix millis，领域层不认识字符串日期。

use axum::{Json, extract::State, http::HeaderMap, http::StatusCode};
use tracing::info;

use crate::api::convert;
use crate::auth::TenantContext;
use crate::booking::confirm::parse_table_id;
use crate::booking::{
    AvailabilityRanker, ConfirmationFinalizer, ConflictDetector, repo_err, validation,
};
use crate::core::ServerState;
use crate::db::repository::{BookingRepository, DiningTableRepository, IdempotencyRepository};
use crate::services::BookingEventKind;
use crate::utils::time;
use shared::booking::{BookingView, HoldView, TableCandidate};
use shared::request::{AvailabilityRequest, ConfirmRequest, HoldRequest, ListRequest, UpdateRequest};
use shared::{ApiResponse, AppError, AppResult};

/// Idempotency keys travel in this header, not the body
pub const IDEMPOTENCY_HEADER: &str = "x-idempotency-key";

/// POST /api/reservations/availability - 按 fit score 排序候选桌台
pub async fn availability(
    State(state): State<ServerState>,
    tenant: TenantContext,
    Json(req): Json<AvailabilityRequest>,
) -> AppResult<Json<ApiResponse<Vec<TableCandidate>>>> {
    let now_ms = time::now_ms();
    let start = req.start.timestamp_millis();
    let end = req.end.timestamp_millis();

    validation::validate_window(start, end, now_ms)?;
    validation::validate_party_size(req.party_size, state.config.max_party_size)?;

    let bookings = BookingRepository::new(state.db.clone());
    let ranker = AvailabilityRanker::new(
        DiningTableRepository::new(state.db.clone()),
        ConflictDetector::new(bookings),
    );

    let ranked = ranker
        .rank(&tenant.tenant_id, req.party_size, start, end)
        .await
        .map_err(repo_err)?;

    let candidates = ranked
        .iter()
        .map(convert::ranked_to_candidate)
        .collect::<AppResult<Vec<_>>>()?;
    Ok(Json(ApiResponse::success(candidates)))
}

/// POST /api/reservations/hold - 为表单填写期间占位
///
/// Hold 是建议性的: confirm 路径有自己的事务冲突检查，这里的冲突
/// 探测只是提早失败，省得客人填完表单才发现桌台没了。
pub async fn hold(
    State(state): State<ServerState>,
    tenant: TenantContext,
    Json(req): Json<HoldRequest>,
) -> AppResult<Json<ApiResponse<HoldView>>> {
    let now_ms = time::now_ms();
    let start = req.start.timestamp_millis();
    let end = req.end.timestamp_millis();

    validation::validate_window(start, end, now_ms)?;
    validation::validate_party_size(req.party_size, state.config.max_party_size)?;
    if req.idempotency_key.trim().is_empty() {
        return Err(AppError::missing_idempotency_key());
    }

    let tables = DiningTableRepository::new(state.db.clone());
    let table = tables
        .find_by_id(&tenant.tenant_id, &req.table_id)
        .await
        .map_err(repo_err)?
        .ok_or_else(|| AppError::not_found("Table"))?;
    if !table.is_active || table.out_of_service {
        return Err(AppError::validation("Table is not bookable").with_detail("field", "tableId"));
    }
    if req.party_size > table.capacity {
        return Err(AppError::validation(format!(
            "Party size {} exceeds table capacity {}",
            req.party_size, table.capacity
        ))
        .with_detail("field", "partySize"));
    }

    let table_record = table
        .id
        .ok_or_else(|| AppError::internal("Stored table row has no id"))?;
    let detector = ConflictDetector::new(BookingRepository::new(state.db.clone()));
    if detector
        .has_conflict(&tenant.tenant_id, &table_record, start, end, None)
        .await
        .map_err(repo_err)?
    {
        return Err(AppError::conflict());
    }

    let hold = state.holds.create(
        &tenant.tenant_id,
        &table_record.to_string(),
        req.party_size,
        start,
        end,
        &req.idempotency_key,
        now_ms,
    );
    info!(
        tenant_id = %tenant.tenant_id,
        hold_id = %hold.id,
        table_id = %hold.table_id,
        "hold created"
    );

    Ok(Json(ApiResponse::success(convert::hold_to_view(&hold))))
}

/// POST /api/reservations/confirm - 幂等确认
///
/// 首次成功返回 201；同一 `x-idempotency-key` 重放返回 200 和
/// 已存储的预订，不看请求体。
pub async fn confirm(
    State(state): State<ServerState>,
    tenant: TenantContext,
    headers: HeaderMap,
    Json(req): Json<ConfirmRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<BookingView>>)> {
    let idempotency_key = headers
        .get(IDEMPOTENCY_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(AppError::missing_idempotency_key)?
        .to_string();

    let finalizer = ConfirmationFinalizer::new(
        BookingRepository::new(state.db.clone()),
        DiningTableRepository::new(state.db.clone()),
        IdempotencyRepository::new(state.db.clone()),
        state.holds.clone(),
        state.table_locks.clone(),
        state.config.max_party_size,
    );

    let outcome = finalizer
        .confirm(&tenant.tenant_id, &req, &idempotency_key, time::now_ms())
        .await?;
    let view = convert::booking_to_view(&outcome.booking)?;

    if !outcome.replayed {
        state.publish_booking_event(BookingEventKind::Created, &view);
    }

    let status = if outcome.replayed {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(ApiResponse::success(view))))
}

/// POST /api/reservations/list - 某天的预订，按开始时间排序
pub async fn list(
    State(state): State<ServerState>,
    tenant: TenantContext,
    Json(req): Json<ListRequest>,
) -> AppResult<Json<ApiResponse<Vec<BookingView>>>> {
    let date = time::parse_date(&req.date)?;
    let (day_start, day_end) = time::day_bounds_ms(date)?;
    let filters = req.filters.unwrap_or_default();

    let bookings = BookingRepository::new(state.db.clone())
        .find_for_day(
            &tenant.tenant_id,
            day_start,
            day_end,
            filters.section,
            filters.status,
        )
        .await
        .map_err(repo_err)?;

    let views = bookings
        .iter()
        .map(convert::booking_to_view)
        .collect::<AppResult<Vec<_>>>()?;
    Ok(Json(ApiResponse::success(views)))
}

/// POST /api/reservations/update - 部分更新 (状态流转 / 改期 / 换桌)
///
/// 状态流转先过状态机；改期和换桌在目标桌台写锁下走事务路径重跑
/// 冲突检查。终态或 no-show 之后窗口不再占用。
pub async fn update(
    State(state): State<ServerState>,
    tenant: TenantContext,
    Json(req): Json<UpdateRequest>,
) -> AppResult<Json<ApiResponse<BookingView>>> {
    let now_ms = time::now_ms();
    let repo = BookingRepository::new(state.db.clone());

    let booking = repo
        .find_by_id(&tenant.tenant_id, &req.reservation_id)
        .await
        .map_err(repo_err)?
        .ok_or_else(|| AppError::not_found("Reservation"))?;
    let booking_id = booking
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Stored booking row has no id"))?;

    // Resolve the final status through the state machine
    let final_status = match req.status {
        Some(next) if next != booking.status => {
            if !booking.status.can_transition_to(next) {
                return Err(AppError::validation(format!(
                    "Cannot transition from {} to {}",
                    booking.status.as_str(),
                    next.as_str()
                ))
                .with_detail("field", "status"));
            }
            next
        }
        _ => booking.status,
    };

    // Resolve the final slot; table changes go through the table catalog
    let table = match req.table_id.as_deref() {
        Some(id) if id != booking.table.to_string() => {
            let new_table = DiningTableRepository::new(state.db.clone())
                .find_by_id(&tenant.tenant_id, id)
                .await
                .map_err(repo_err)?
                .ok_or_else(|| AppError::not_found("Table"))?;
            if !new_table.is_active || new_table.out_of_service {
                return Err(
                    AppError::validation("Table is not bookable").with_detail("field", "tableId")
                );
            }
            if booking.party_size > new_table.capacity {
                return Err(AppError::validation(format!(
                    "Party size {} exceeds table capacity {}",
                    booking.party_size, new_table.capacity
                ))
                .with_detail("field", "partySize"));
            }
            parse_table_id(id)?
        }
        _ => booking.table.clone(),
    };
    let start = req.start.map(|t| t.timestamp_millis()).unwrap_or(booking.start);
    let end = req.end.map(|t| t.timestamp_millis()).unwrap_or(booking.end);

    let window_moved = start != booking.start || end != booking.end || table != booking.table;
    if window_moved {
        if end <= start {
            return Err(AppError::invalid_time("Reservation end must be after start"));
        }
        // Only a moved start is checked against the clock; a seated
        // booking legitimately has a start in the past
        if start != booking.start && start < now_ms {
            return Err(AppError::past_time("Reservation start must not be in the past"));
        }
        if !final_status.blocks_table() {
            return Err(AppError::validation(
                "Cannot reschedule a reservation that no longer blocks its table",
            ));
        }
    }

    let updated = if final_status.blocks_table() {
        // Serialize against confirms targeting the same table; the
        // transaction re-checks the overlap under this lock
        let _guard = state.table_locks.acquire(&tenant.tenant_id, &table).await;
        repo.reschedule(
            &tenant.tenant_id,
            &booking_id,
            &table,
            start,
            end,
            final_status,
            now_ms,
        )
        .await
        .map_err(repo_err)?
    } else {
        repo.release(&tenant.tenant_id, &booking_id, final_status, now_ms)
            .await
            .map_err(repo_err)?
    };

    info!(
        tenant_id = %tenant.tenant_id,
        booking_id = %booking_id,
        status = %updated.status.as_str(),
        "reservation updated"
    );

    let view = convert::booking_to_view(&updated)?;
    state.publish_booking_event(BookingEventKind::Updated, &view);
    Ok(Json(ApiResponse::success(view)))
}
