//! Confirmation Finalizer
//!
//! The only write path that creates bookings. The sequence is: ledger
//! replay check → input validation → per-table write lock → authoritative
//! conflict check → transactional insert (+ ledger entry). A replay
//! returns the stored booking unchanged regardless of the payload: the
//! ledger wins.

use std::sync::Arc;

use surrealdb::RecordId;
use uuid::Uuid;

use crate::booking::hold::HoldManager;
use crate::booking::locks::TableLocks;
use crate::booking::{repo_err, validation};
use crate::db::models::{Booking, BookingCreate};
use crate::db::repository::{
    BookingRepository, DiningTableRepository, IdempotencyRepository, RepoError,
};
use shared::request::ConfirmRequest;
use shared::{AppError, AppResult};

/// Retry budget for transaction clashes. Each retry re-runs the ledger
/// check and the conflict check from scratch, so a retry after the
/// winner's commit converges on replay or a clean conflict.
const MAX_TX_RETRIES: u32 = 3;

/// Outcome of a confirm call
#[derive(Debug, Clone)]
pub struct ConfirmOutcome {
    pub booking: Booking,
    /// True when the idempotency ledger resolved the call (HTTP 200
    /// instead of 201); replays are expected traffic, not errors
    pub replayed: bool,
}

/// The resolved slot a confirm is targeting
struct Slot {
    table_id: String,
    party_size: i32,
    start: i64,
    end: i64,
}

/// Confirmation finalizer
#[derive(Clone)]
pub struct ConfirmationFinalizer {
    bookings: BookingRepository,
    tables: DiningTableRepository,
    ledger: IdempotencyRepository,
    holds: Arc<HoldManager>,
    locks: Arc<TableLocks>,
    max_party_size: i32,
}

impl ConfirmationFinalizer {
    pub fn new(
        bookings: BookingRepository,
        tables: DiningTableRepository,
        ledger: IdempotencyRepository,
        holds: Arc<HoldManager>,
        locks: Arc<TableLocks>,
        max_party_size: i32,
    ) -> Self {
        Self {
            bookings,
            tables,
            ledger,
            holds,
            locks,
            max_party_size,
        }
    }

    /// Idempotently confirm a reservation
    ///
    /// `idempotency_key` comes from the `x-idempotency-key` header; the
    /// handler rejects requests without one before calling in.
    pub async fn confirm(
        &self,
        tenant_id: &str,
        req: &ConfirmRequest,
        idempotency_key: &str,
        now_ms: i64,
    ) -> AppResult<ConfirmOutcome> {
        if idempotency_key.trim().is_empty() {
            return Err(AppError::missing_idempotency_key());
        }

        let mut attempt = 0;
        loop {
            match self.try_confirm(tenant_id, req, idempotency_key, now_ms).await {
                Err(inner) if inner.retryable && attempt < MAX_TX_RETRIES => {
                    attempt += 1;
                    tracing::debug!(
                        tenant_id,
                        idempotency_key,
                        attempt,
                        "confirm transaction clashed, retrying"
                    );
                }
                Err(inner) => return Err(inner.error),
                Ok(outcome) => return Ok(outcome),
            }
        }
    }

    async fn try_confirm(
        &self,
        tenant_id: &str,
        req: &ConfirmRequest,
        idempotency_key: &str,
        now_ms: i64,
    ) -> Result<ConfirmOutcome, ConfirmError> {
        // 1. Ledger replay check, must be side-effect-free on replay
        if let Some(outcome) = self.replay_from_ledger(tenant_id, idempotency_key).await? {
            return Ok(outcome);
        }

        // 2. Resolve the slot (hold or raw) and validate the input
        let slot = self.resolve_slot(tenant_id, req, idempotency_key, now_ms)?;
        validation::validate_window(slot.start, slot.end, now_ms).map_err(ConfirmError::fatal)?;
        validation::validate_party_size(slot.party_size, self.max_party_size)
            .map_err(ConfirmError::fatal)?;
        validation::validate_guest(
            &req.guest_name,
            &req.guest_email,
            &req.guest_phone,
            req.special_requests.as_deref(),
        )
        .map_err(ConfirmError::fatal)?;

        // Capacity check against the actual table, before any write
        let table = self
            .tables
            .find_by_id(tenant_id, &slot.table_id)
            .await
            .map_err(ConfirmError::from_repo)?
            .ok_or_else(|| ConfirmError::fatal(AppError::not_found("Table")))?;
        if !table.is_active || table.out_of_service {
            return Err(ConfirmError::fatal(
                AppError::validation("Table is not bookable").with_detail("field", "tableId"),
            ));
        }
        if slot.party_size > table.capacity {
            return Err(ConfirmError::fatal(
                AppError::validation(format!(
                    "Party size {} exceeds table capacity {}",
                    slot.party_size, table.capacity
                ))
                .with_detail("field", "partySize"),
            ));
        }
        let table_record = table
            .id
            .clone()
            .ok_or_else(|| ConfirmError::fatal(AppError::internal("Stored table row has no id")))?;

        // 3. Serialize against other writers on this table. With the lock
        // held the read below is authoritative; nothing can commit an
        // overlapping booking between the check and our insert.
        let _guard = self.locks.acquire(tenant_id, &table_record).await;

        let conflicting = self
            .bookings
            .find_conflicting(tenant_id, &table_record, slot.start, slot.end, None)
            .await
            .map_err(ConfirmError::from_repo)?;
        if !conflicting.is_empty() {
            // The occupant may be this very key's winner (same-key race)
            if let Some(outcome) = self.replay_from_ledger(tenant_id, idempotency_key).await? {
                return Ok(outcome);
            }
            return Err(ConfirmError::fatal(AppError::conflict()));
        }

        // 4-5. Transactional insert: overlap re-check + booking + ledger
        let data = BookingCreate {
            tenant_id: tenant_id.to_string(),
            table: table_record.clone(),
            start: slot.start,
            end: slot.end,
            party_size: slot.party_size,
            guest_name: req.guest_name.clone(),
            guest_email: req.guest_email.clone(),
            guest_phone: req.guest_phone.clone(),
            special_requests: req.special_requests.clone(),
            idempotency_key: idempotency_key.to_string(),
        };
        let code = generate_confirmation_code();

        match self.bookings.create_confirmed(data, code, now_ms).await {
            Ok(booking) => {
                if let Some(hold_id) = req.hold_id.as_deref() {
                    self.holds.remove(tenant_id, hold_id);
                }
                tracing::info!(
                    tenant_id,
                    booking_id = %booking.id.as_ref().map(ToString::to_string).unwrap_or_default(),
                    table_id = %booking.table,
                    "booking confirmed"
                );
                Ok(ConfirmOutcome {
                    booking,
                    replayed: false,
                })
            }
            // Lost the race on the idempotency key: the winner's booking
            // is the canonical outcome for this key
            Err(RepoError::DuplicateKey(_)) => {
                let booking = self
                    .bookings
                    .find_by_idempotency_key(tenant_id, idempotency_key)
                    .await
                    .map_err(ConfirmError::from_repo)?
                    .ok_or_else(|| {
                        ConfirmError::fatal(AppError::internal(
                            "Duplicate idempotency key without a stored booking",
                        ))
                    })?;
                Ok(ConfirmOutcome {
                    booking,
                    replayed: true,
                })
            }
            Err(RepoError::TxRetry(msg)) => Err(ConfirmError::retryable(AppError::database(msg))),
            Err(err) => Err(ConfirmError::from_repo(err)),
        }
    }

    /// Fetch the booking a ledger entry points at, if one exists
    async fn replay_from_ledger(
        &self,
        tenant_id: &str,
        idempotency_key: &str,
    ) -> Result<Option<ConfirmOutcome>, ConfirmError> {
        let Some(record) = self
            .ledger
            .find(tenant_id, idempotency_key)
            .await
            .map_err(ConfirmError::from_repo)?
        else {
            return Ok(None);
        };

        let booking = self
            .bookings
            .find_by_id(tenant_id, &record.booking.to_string())
            .await
            .map_err(ConfirmError::from_repo)?
            .ok_or_else(|| {
                ConfirmError::fatal(AppError::internal(format!(
                    "Ledger entry {} points at a missing booking",
                    record.booking
                )))
            })?;
        Ok(Some(ConfirmOutcome {
            booking,
            replayed: true,
        }))
    }

    /// Resolve hold-id or raw-slot input into a concrete slot
    fn resolve_slot(
        &self,
        tenant_id: &str,
        req: &ConfirmRequest,
        idempotency_key: &str,
        now_ms: i64,
    ) -> Result<Slot, ConfirmError> {
        if let Some(hold_id) = req.hold_id.as_deref() {
            // Expired holds are treated as absent; the caller falls back
            // to re-ranking availability
            let hold = self.holds.get_valid(tenant_id, hold_id, now_ms).ok_or_else(|| {
                ConfirmError::fatal(AppError::not_found("Hold").with_detail("holdId", hold_id))
            })?;
            // The key must travel unchanged from hold to confirm
            if hold.idempotency_key != idempotency_key {
                return Err(ConfirmError::fatal(
                    AppError::validation(
                        "Hold was created under a different idempotency key",
                    )
                    .with_detail("field", "holdId"),
                ));
            }
            return Ok(Slot {
                table_id: hold.table_id,
                party_size: hold.party_size,
                start: hold.start,
                end: hold.end,
            });
        }

        let table_id = req.table_id.clone().ok_or_else(|| {
            ConfirmError::fatal(
                AppError::validation("Either holdId or tableId is required")
                    .with_detail("field", "tableId"),
            )
        })?;
        let party_size = req.party_size.ok_or_else(|| {
            ConfirmError::fatal(
                AppError::validation("partySize is required").with_detail("field", "partySize"),
            )
        })?;
        let start = req.start.ok_or_else(|| {
            ConfirmError::fatal(
                AppError::validation("start is required").with_detail("field", "start"),
            )
        })?;
        let start = start.timestamp_millis();

        // End is taken verbatim, or derived from start + duration
        let end = match (req.end, req.duration_minutes) {
            (Some(end), _) => end.timestamp_millis(),
            (None, Some(minutes)) => minutes
                .checked_mul(60 * 1000)
                .and_then(|ms| start.checked_add(ms))
                .ok_or_else(|| {
                    ConfirmError::fatal(AppError::invalid_time(
                        "durationMinutes is out of range",
                    ))
                })?,
            (None, None) => {
                return Err(ConfirmError::fatal(
                    AppError::invalid_time("Either end or durationMinutes is required"),
                ));
            }
        };

        Ok(Slot {
            table_id,
            party_size,
            start,
            end,
        })
    }
}

/// Derive the human-facing confirmation code
///
/// Generated once, inside the creating attempt only; replays read the
/// stored value so the code is stable for the booking's lifetime.
fn generate_confirmation_code() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("BK-{}", id[..6].to_uppercase())
}

/// Internal confirm error carrying retryability
struct ConfirmError {
    error: AppError,
    retryable: bool,
}

impl ConfirmError {
    fn fatal(error: AppError) -> Self {
        Self {
            error,
            retryable: false,
        }
    }

    fn retryable(error: AppError) -> Self {
        Self {
            error,
            retryable: true,
        }
    }

    fn from_repo(err: RepoError) -> Self {
        let retryable = matches!(err, RepoError::TxRetry(_));
        Self {
            error: repo_err(err),
            retryable,
        }
    }
}

/// Resolve a booking's table record id for the update path
pub(crate) fn parse_table_id(id: &str) -> AppResult<RecordId> {
    id.parse()
        .map_err(|_| AppError::validation(format!("Invalid table id: {}", id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmation_code_shape() {
        let code = generate_confirmation_code();
        assert!(code.starts_with("BK-"));
        assert_eq!(code.len(), 9);
        assert!(code[3..].chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }
}
