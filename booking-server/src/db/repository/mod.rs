//! Repository Module
//!
//! Typed query methods over SurrealDB tables. The booking engine never
//! composes ad hoc filters at call sites; every query the storage layer
//! answers is a named method here.

pub mod booking;
pub mod dining_table;
pub mod idempotency;

pub use booking::BookingRepository;
pub use dining_table::DiningTableRepository;
pub use idempotency::IdempotencyRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Another booking occupies the table/window (thrown by the
    /// in-transaction overlap check)
    #[error("Slot conflict: {0}")]
    Conflict(String),

    /// Unique-index violation on the idempotency key; the caller must
    /// fall back to the already-persisted booking
    #[error("Duplicate idempotency key: {0}")]
    DuplicateKey(String),

    /// Optimistic transaction clash; safe to retry the whole operation
    #[error("Transaction retry: {0}")]
    TxRetry(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        classify_db_error(&err.to_string())
    }
}

/// Map a SurrealDB error message onto the repository taxonomy
///
/// Order matters: the THROWn conflict marker also contains the word
/// "conflict", so it is tested before the transaction checks. A failed
/// multi-statement transaction reports most statements with the generic
/// "The query was not executed due to a failed transaction" text; that
/// shape is retryable, because re-running re-evaluates the ledger and the
/// overlap predicate and converges on the real outcome.
pub(crate) fn classify_db_error(msg: &str) -> RepoError {
    if msg.contains("RESERVATION_CONFLICT") {
        return RepoError::Conflict(msg.to_string());
    }
    if msg.contains("idempotency_tenant_key") || msg.contains("booking_idem") {
        return RepoError::DuplicateKey(msg.to_string());
    }
    let lower = msg.to_lowercase();
    if lower.contains("transaction")
        && (lower.contains("conflict")
            || lower.contains("busy")
            || lower.contains("retry")
            || lower.contains("failed")
            || lower.contains("not executed"))
    {
        return RepoError::TxRetry(msg.to_string());
    }
    RepoError::Database(msg.to_string())
}

/// Classify every per-statement error of a failed transaction
///
/// On abort, SurrealDB reports the generic failed-transaction text for
/// most statements and carries the real cause (a THROW message, a
/// unique-index violation) on one of them. All errors are inspected and
/// the most specific classification wins: Conflict, then DuplicateKey,
/// then TxRetry, then Database.
pub(crate) fn classify_tx_errors<I, E>(errors: I) -> RepoError
where
    I: IntoIterator<Item = E>,
    E: ToString,
{
    let mut fallback: Option<RepoError> = None;
    for err in errors {
        match classify_db_error(&err.to_string()) {
            specific @ (RepoError::Conflict(_) | RepoError::DuplicateKey(_)) => return specific,
            RepoError::TxRetry(msg) => fallback = Some(RepoError::TxRetry(msg)),
            other => {
                if fallback.is_none() {
                    fallback = Some(other);
                }
            }
        }
    }
    fallback.unwrap_or_else(|| RepoError::Database("Transaction failed".to_string()))
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
