//! Model → wire view conversion
//!
//! Row types store Unix millis and record links; the wire speaks
//! RFC 3339 timestamps and plain string ids.

use crate::booking::RankedTable;
use crate::db::models::{Booking, DiningTable};
use crate::utils::time::ms_to_datetime;
use shared::booking::{BookingView, HoldView, TableCandidate, TableStatus, TableView};
use shared::{AppError, AppResult};

use crate::booking::Hold;

/// Booking row → wire view
pub fn booking_to_view(booking: &Booking) -> AppResult<BookingView> {
    let id = booking
        .id
        .as_ref()
        .ok_or_else(|| AppError::internal("Stored booking row has no id"))?
        .to_string();

    Ok(BookingView {
        id,
        tenant_id: booking.tenant_id.clone(),
        table_id: booking.table.to_string(),
        party_size: booking.party_size,
        start: ms_to_datetime(booking.start),
        end: ms_to_datetime(booking.end),
        guest_name: booking.guest_name.clone(),
        guest_email: booking.guest_email.clone(),
        guest_phone: booking.guest_phone.clone(),
        special_requests: booking.special_requests.clone(),
        status: booking.status,
        confirmation_code: booking.confirmation_code.clone(),
        created_at: ms_to_datetime(booking.created_at),
        updated_at: ms_to_datetime(booking.updated_at),
    })
}

/// Table row + computed status → wire view
pub fn table_to_view(table: &DiningTable, status: TableStatus) -> AppResult<TableView> {
    let id = table
        .id
        .as_ref()
        .ok_or_else(|| AppError::internal("Stored table row has no id"))?
        .to_string();

    Ok(TableView {
        id,
        name: table.name.clone(),
        capacity: table.capacity,
        section: table.section.clone(),
        status,
    })
}

/// Ranked candidate → wire view
pub fn ranked_to_candidate(ranked: &RankedTable) -> AppResult<TableCandidate> {
    Ok(TableCandidate {
        table: table_to_view(&ranked.table, TableStatus::Available)?,
        fit_score: ranked.score,
    })
}

/// Hold → wire view
pub fn hold_to_view(hold: &Hold) -> HoldView {
    HoldView {
        hold_id: hold.id.clone(),
        table_id: hold.table_id.clone(),
        expires_at: ms_to_datetime(hold.expires_at),
    }
}
