//! Booking Repository
//!
//! All writes that must be atomic with respect to concurrent confirms run
//! as single multi-statement SurrealDB transactions, and callers serialize
//! them per (tenant, table) with [`crate::booking::TableLocks`]. The
//! idempotency unique indexes defined in [`crate::db::DbService`] back up
//! the one-booking-per-key invariant at the storage layer.

use super::{BaseRepository, RepoError, RepoResult, classify_tx_errors};
use crate::db::models::{Booking, BookingCreate};
use shared::BookingStatus;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

/// Prefilter padding around the requested window (±4h)
///
/// Query-efficiency bound only; the half-open overlap predicate is the
/// correctness check.
pub const CONFLICT_PREFILTER_MS: i64 = 4 * 60 * 60 * 1000;

/// Transactional insert: conflict re-check + booking + ledger entry.
///
/// THROWs the conflict marker when an overlapping blocking booking exists,
/// so the whole transaction rolls back and nothing is written.
const CONFIRM_TX: &str = "
    BEGIN TRANSACTION;
    LET $conflicts = (
        SELECT VALUE id FROM booking
        WHERE tenant_id = $tenant_id
          AND table = $table
          AND status IN ['confirmed', 'seated']
          AND start < $end AND end > $start
          AND start >= $prefilter_start AND start <= $prefilter_end
    );
    IF array::len($conflicts) > 0 {
        THROW \"RESERVATION_CONFLICT\";
    };
    LET $created = (CREATE booking CONTENT {
        tenant_id: $tenant_id,
        table: $table,
        start: $start,
        end: $end,
        party_size: $party_size,
        guest_name: $guest_name,
        guest_email: $guest_email,
        guest_phone: $guest_phone,
        special_requests: $special_requests,
        status: 'confirmed',
        idempotency_key: $idempotency_key,
        confirmation_code: $confirmation_code,
        created_at: $now,
        updated_at: $now
    });
    CREATE idempotency CONTENT {
        tenant_id: $tenant_id,
        key: $idempotency_key,
        booking: $created[0].id,
        created_at: $now
    };
    COMMIT TRANSACTION;
";

/// Transactional reschedule: conflict re-check (excluding the booking
/// itself) + field update.
const RESCHEDULE_TX: &str = "
    BEGIN TRANSACTION;
    LET $conflicts = (
        SELECT VALUE id FROM booking
        WHERE tenant_id = $tenant_id
          AND table = $table
          AND status IN ['confirmed', 'seated']
          AND start < $end AND end > $start
          AND id != $booking_id
          AND start >= $prefilter_start AND start <= $prefilter_end
    );
    IF array::len($conflicts) > 0 {
        THROW \"RESERVATION_CONFLICT\";
    };
    UPDATE $booking_id SET
        table = $table,
        start = $start,
        end = $end,
        status = $status,
        updated_at = $now;
    COMMIT TRANSACTION;
";

#[derive(Clone)]
pub struct BookingRepository {
    base: BaseRepository,
}

impl BookingRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find a tenant's booking by id
    pub async fn find_by_id(&self, tenant_id: &str, id: &str) -> RepoResult<Option<Booking>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid booking ID: {}", id)))?;
        let booking: Option<Booking> = self.base.db().select(thing).await?;
        Ok(booking.filter(|b| b.tenant_id == tenant_id))
    }

    /// Find the booking previously created under an idempotency key
    pub async fn find_by_idempotency_key(
        &self,
        tenant_id: &str,
        key: &str,
    ) -> RepoResult<Option<Booking>> {
        let bookings: Vec<Booking> = self
            .base
            .db()
            .query(
                "SELECT * FROM booking WHERE tenant_id = $tenant_id AND idempotency_key = $key LIMIT 1",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("key", key.to_string()))
            .await?
            .take(0)?;
        Ok(bookings.into_iter().next())
    }

    /// Blocking bookings overlapping `[start, end)` on a table
    ///
    /// Half-open rule: `s1 < e2 AND e1 > s2`; touching boundaries do not
    /// conflict. Safe to call inside the same attempt as the eventual
    /// write (the transactional paths embed the same predicate).
    pub async fn find_conflicting(
        &self,
        tenant_id: &str,
        table: &RecordId,
        start: i64,
        end: i64,
        exclude: Option<&RecordId>,
    ) -> RepoResult<Vec<Booking>> {
        let mut query = String::from(
            "SELECT * FROM booking
             WHERE tenant_id = $tenant_id
               AND table = $table
               AND status IN ['confirmed', 'seated']
               AND start < $end AND end > $start
               AND start >= $prefilter_start AND start <= $prefilter_end",
        );
        if exclude.is_some() {
            query.push_str(" AND id != $exclude");
        }

        let mut request = self
            .base
            .db()
            .query(query)
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("table", table.clone()))
            .bind(("start", start))
            .bind(("end", end))
            .bind(("prefilter_start", start - CONFLICT_PREFILTER_MS))
            .bind(("prefilter_end", end + CONFLICT_PREFILTER_MS));
        if let Some(id) = exclude {
            request = request.bind(("exclude", id.clone()));
        }

        let bookings: Vec<Booking> = request.await?.take(0)?;
        Ok(bookings)
    }

    /// Create a confirmed booking and its ledger entry atomically
    ///
    /// On success returns the stored row (fetched back under the
    /// idempotency key, which the transaction just made unique).
    pub async fn create_confirmed(
        &self,
        data: BookingCreate,
        confirmation_code: String,
        now: i64,
    ) -> RepoResult<Booking> {
        let tenant_id = data.tenant_id.clone();
        let key = data.idempotency_key.clone();

        let mut response = self
            .base
            .db()
            .query(CONFIRM_TX)
            .bind(("tenant_id", data.tenant_id))
            .bind(("table", data.table))
            .bind(("start", data.start))
            .bind(("end", data.end))
            .bind(("party_size", data.party_size))
            .bind(("guest_name", data.guest_name))
            .bind(("guest_email", data.guest_email))
            .bind(("guest_phone", data.guest_phone))
            .bind(("special_requests", data.special_requests))
            .bind(("idempotency_key", key.clone()))
            .bind(("confirmation_code", confirmation_code))
            .bind(("now", now))
            .bind(("prefilter_start", data.start - CONFLICT_PREFILTER_MS))
            .bind(("prefilter_end", data.end + CONFLICT_PREFILTER_MS))
            .await?;

        // Every statement error must be inspected: on abort the real
        // cause (THROW, index violation) hides behind generic
        // failed-transaction reports on the other statements
        let errors = response.take_errors();
        if !errors.is_empty() {
            return Err(classify_tx_errors(errors.into_values()));
        }

        self.find_by_idempotency_key(&tenant_id, &key)
            .await?
            .ok_or_else(|| {
                RepoError::Database("Committed booking not found on readback".to_string())
            })
    }

    /// Move/resize a booking with the conflict check re-run atomically
    ///
    /// `status` is the final status after the patch; callers only route
    /// here when it still blocks the table, and hold the table's write
    /// lock.
    pub async fn reschedule(
        &self,
        tenant_id: &str,
        booking_id: &RecordId,
        table: &RecordId,
        start: i64,
        end: i64,
        status: BookingStatus,
        now: i64,
    ) -> RepoResult<Booking> {
        let mut response = self
            .base
            .db()
            .query(RESCHEDULE_TX)
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("booking_id", booking_id.clone()))
            .bind(("table", table.clone()))
            .bind(("start", start))
            .bind(("end", end))
            .bind(("status", status))
            .bind(("now", now))
            .bind(("prefilter_start", start - CONFLICT_PREFILTER_MS))
            .bind(("prefilter_end", end + CONFLICT_PREFILTER_MS))
            .await?;

        let errors = response.take_errors();
        if !errors.is_empty() {
            return Err(classify_tx_errors(errors.into_values()));
        }

        self.find_by_id(tenant_id, &booking_id.to_string())
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Booking {} not found", booking_id)))
    }

    /// Status transition to a non-blocking status; the window stops
    /// counting for conflicts as soon as the status is stored
    pub async fn release(
        &self,
        tenant_id: &str,
        booking_id: &RecordId,
        status: BookingStatus,
        now: i64,
    ) -> RepoResult<Booking> {
        let updated: Option<Booking> = self
            .base
            .db()
            .query(
                "UPDATE $booking_id SET status = $status, updated_at = $now RETURN AFTER",
            )
            .bind(("booking_id", booking_id.clone()))
            .bind(("status", status))
            .bind(("now", now))
            .await?
            .take(0)?;

        updated
            .filter(|b| b.tenant_id == tenant_id)
            .ok_or_else(|| RepoError::NotFound(format!("Booking {} not found", booking_id)))
    }

    /// Bookings for a day, ordered by start time
    ///
    /// `section` filters through the table record link; `status` filters
    /// exactly.
    pub async fn find_for_day(
        &self,
        tenant_id: &str,
        day_start: i64,
        day_end: i64,
        section: Option<String>,
        status: Option<BookingStatus>,
    ) -> RepoResult<Vec<Booking>> {
        let mut query = String::from(
            "SELECT * FROM booking
             WHERE tenant_id = $tenant_id
               AND start >= $day_start AND start < $day_end",
        );
        if section.is_some() {
            query.push_str(" AND table.section = $section");
        }
        if status.is_some() {
            query.push_str(" AND status = $status");
        }
        query.push_str(" ORDER BY start");

        let mut request = self
            .base
            .db()
            .query(query)
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("day_start", day_start))
            .bind(("day_end", day_end));
        if let Some(section) = section {
            request = request.bind(("section", section));
        }
        if let Some(status) = status {
            request = request.bind(("status", status));
        }

        let bookings: Vec<Booking> = request.await?.take(0)?;
        Ok(bookings)
    }

    /// Blocking bookings for a tenant in a time range (table catalog
    /// occupancy computation)
    pub async fn find_blocking_in_range(
        &self,
        tenant_id: &str,
        range_start: i64,
        range_end: i64,
    ) -> RepoResult<Vec<Booking>> {
        let bookings: Vec<Booking> = self
            .base
            .db()
            .query(
                "SELECT * FROM booking
                 WHERE tenant_id = $tenant_id
                   AND status IN ['confirmed', 'seated']
                   AND start < $range_end AND end > $range_start",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("range_start", range_start))
            .bind(("range_end", range_end))
            .await?
            .take(0)?;
        Ok(bookings)
    }
}
