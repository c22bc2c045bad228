//! Conflict Detection
//!
//! The overlap rule is the half-open interval test: `[s1, e1)` and
//! `[s2, e2)` conflict iff `s1 < e2 && e1 > s2`. Touching boundaries
//! (one booking ends exactly when the next starts) do not conflict, at
//! any clock alignment.
//!
//! The detector answers reads only. Write paths run the same predicate
//! inside their transaction, serialized per (tenant, table) by
//! [`super::locks::TableLocks`], so a check here is authoritative when
//! the caller holds the table's write lock.

use crate::db::repository::{BookingRepository, RepoResult};
use surrealdb::RecordId;

/// Half-open interval overlap test
pub fn windows_overlap(s1: i64, e1: i64, s2: i64, e2: i64) -> bool {
    s1 < e2 && e1 > s2
}

/// Conflict detector over the booking store
#[derive(Clone)]
pub struct ConflictDetector {
    bookings: BookingRepository,
}

impl ConflictDetector {
    pub fn new(bookings: BookingRepository) -> Self {
        Self { bookings }
    }

    /// Whether an overlapping blocking booking exists for the table/window
    pub async fn has_conflict(
        &self,
        tenant_id: &str,
        table: &RecordId,
        start: i64,
        end: i64,
        exclude: Option<&RecordId>,
    ) -> RepoResult<bool> {
        let conflicting = self
            .bookings
            .find_conflicting(tenant_id, table, start, end, exclude)
            .await?;
        Ok(!conflicting.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: i64 = 60 * 60 * 1000;

    #[test]
    fn test_overlapping_windows_conflict() {
        // [10:00, 11:00) vs [10:30, 11:30)
        assert!(windows_overlap(10 * HOUR, 11 * HOUR, 10 * HOUR + HOUR / 2, 11 * HOUR + HOUR / 2));
    }

    #[test]
    fn test_contained_window_conflicts() {
        assert!(windows_overlap(10 * HOUR, 12 * HOUR, 10 * HOUR + HOUR / 2, 11 * HOUR));
    }

    #[test]
    fn test_touching_boundaries_do_not_conflict() {
        // [10:00, 11:00) then [11:00, 12:00)
        assert!(!windows_overlap(10 * HOUR, 11 * HOUR, 11 * HOUR, 12 * HOUR));
        assert!(!windows_overlap(11 * HOUR, 12 * HOUR, 10 * HOUR, 11 * HOUR));
    }

    #[test]
    fn test_touching_at_odd_alignment_does_not_conflict() {
        // Boundaries off the quarter-hour grid behave exactly the same
        let five_min = 5 * 60 * 1000;
        let s = 10 * HOUR + five_min;
        assert!(!windows_overlap(s, s + HOUR, s + HOUR, s + 2 * HOUR));
    }

    #[test]
    fn test_disjoint_windows_do_not_conflict() {
        assert!(!windows_overlap(10 * HOUR, 11 * HOUR, 14 * HOUR, 15 * HOUR));
    }
}
