//! Table Catalog Handlers
//!
//! Pure read: active tables annotated with occupancy computed from
//! today's blocking bookings. No side effects.

use axum::{Json, extract::State};

use crate::api::convert;
use crate::auth::TenantContext;
use crate::booking::repo_err;
use crate::core::ServerState;
use crate::db::models::Booking;
use crate::db::repository::{BookingRepository, DiningTableRepository};
use crate::utils::time;
use shared::booking::{TableStatus, TableView};
use shared::{ApiResponse, AppResult, BookingStatus};

/// POST /api/tables - 桌台目录 (含计算状态)
pub async fn list(
    State(state): State<ServerState>,
    tenant: TenantContext,
) -> AppResult<Json<ApiResponse<Vec<TableView>>>> {
    let tables = DiningTableRepository::new(state.db.clone());
    let bookings = BookingRepository::new(state.db.clone());

    let now_ms = time::now_ms();
    let today = time::ms_to_datetime(now_ms).date_naive();
    let (day_start, day_end) = time::day_bounds_ms(today)?;

    let todays = bookings
        .find_blocking_in_range(&tenant.tenant_id, day_start, day_end)
        .await
        .map_err(repo_err)?;

    let mut views = Vec::new();
    for table in tables
        .find_active(&tenant.tenant_id)
        .await
        .map_err(repo_err)?
    {
        let status = table_status(&table.id, table.out_of_service, &todays, now_ms);
        views.push(convert::table_to_view(&table, status)?);
    }

    Ok(Json(ApiResponse::success(views)))
}

/// Compute a table's catalog status from today's blocking bookings
fn table_status(
    table_id: &Option<surrealdb::RecordId>,
    out_of_service: bool,
    todays: &[Booking],
    now_ms: i64,
) -> TableStatus {
    if out_of_service {
        return TableStatus::Maintenance;
    }
    let Some(table_id) = table_id else {
        return TableStatus::Available;
    };

    let mine = todays.iter().filter(|b| &b.table == table_id);
    let mut has_future_confirmed = false;
    for booking in mine {
        if booking.start <= now_ms && now_ms < booking.end {
            return TableStatus::Occupied;
        }
        if booking.start > now_ms && booking.status == BookingStatus::Confirmed {
            has_future_confirmed = true;
        }
    }

    if has_future_confirmed {
        TableStatus::Reserved
    } else {
        TableStatus::Available
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surrealdb::RecordId;

    fn booking(table: &RecordId, start: i64, end: i64, status: BookingStatus) -> Booking {
        Booking {
            id: None,
            tenant_id: "demo".into(),
            table: table.clone(),
            start,
            end,
            party_size: 2,
            guest_name: "Jane".into(),
            guest_email: "jane@example.com".into(),
            guest_phone: "+34600123456".into(),
            special_requests: None,
            status,
            idempotency_key: "K".into(),
            confirmation_code: "BK-ABC123".into(),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_out_of_service_wins() {
        let id: RecordId = "dining_table:t1".parse().unwrap();
        let todays = vec![booking(&id, 0, 100, BookingStatus::Seated)];
        assert_eq!(
            table_status(&Some(id), true, &todays, 50),
            TableStatus::Maintenance
        );
    }

    #[test]
    fn test_current_booking_is_occupied() {
        let id: RecordId = "dining_table:t1".parse().unwrap();
        let todays = vec![booking(&id, 0, 100, BookingStatus::Confirmed)];
        assert_eq!(
            table_status(&Some(id), false, &todays, 50),
            TableStatus::Occupied
        );
    }

    #[test]
    fn test_future_confirmed_is_reserved() {
        let id: RecordId = "dining_table:t1".parse().unwrap();
        let todays = vec![booking(&id, 100, 200, BookingStatus::Confirmed)];
        assert_eq!(
            table_status(&Some(id), false, &todays, 50),
            TableStatus::Reserved
        );
    }

    #[test]
    fn test_other_tables_do_not_count() {
        let id: RecordId = "dining_table:t1".parse().unwrap();
        let other: RecordId = "dining_table:t2".parse().unwrap();
        let todays = vec![booking(&other, 0, 100, BookingStatus::Seated)];
        assert_eq!(
            table_status(&Some(id), false, &todays, 50),
            TableStatus::Available
        );
    }
}
