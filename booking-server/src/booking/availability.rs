//! Availability Ranking
//!
//! Scores candidate tables for a party/window so the UI can offer the
//! best fit first. The score rewards near-capacity seating and penalizes
//! both wasted seats and squeezed-in parties.

use crate::booking::ConflictDetector;
use crate::db::models::DiningTable;
use crate::db::repository::{DiningTableRepository, RepoResult};

/// Fit score for seating `party_size` at a table of `capacity`
///
/// Starts at 100. Utilization below 50% loses 2 points per missing
/// percent (wasted seats); above 90% loses 3 per excess percent
/// (overcrowding). Clamped at 0. The sweet spot lands around 75–85%.
pub fn fit_score(party_size: i32, capacity: i32) -> i32 {
    let utilization = f64::from(party_size) / f64::from(capacity) * 100.0;
    let mut score = 100.0;
    if utilization < 50.0 {
        score -= (50.0 - utilization) * 2.0;
    }
    if utilization > 90.0 {
        score -= (utilization - 90.0) * 3.0;
    }
    score.max(0.0).round() as i32
}

/// A candidate table with its fit score
#[derive(Debug, Clone)]
pub struct RankedTable {
    pub table: DiningTable,
    pub score: i32,
}

/// Availability ranker over the table catalog and conflict detector
#[derive(Clone)]
pub struct AvailabilityRanker {
    tables: DiningTableRepository,
    conflicts: ConflictDetector,
}

impl AvailabilityRanker {
    pub fn new(tables: DiningTableRepository, conflicts: ConflictDetector) -> Self {
        Self { tables, conflicts }
    }

    /// Rank a tenant's tables for the party/window, best fit first
    ///
    /// Filters to active, in-service tables with enough capacity and no
    /// conflicting booking. Ties break by table id for determinism.
    pub async fn rank(
        &self,
        tenant_id: &str,
        party_size: i32,
        start: i64,
        end: i64,
    ) -> RepoResult<Vec<RankedTable>> {
        let mut candidates = Vec::new();

        for table in self.tables.find_active(tenant_id).await? {
            if table.out_of_service || table.capacity < party_size {
                continue;
            }
            let Some(id) = table.id.as_ref() else {
                continue;
            };
            if self
                .conflicts
                .has_conflict(tenant_id, id, start, end, None)
                .await?
            {
                continue;
            }
            candidates.push(RankedTable {
                score: fit_score(party_size, table.capacity),
                table,
            });
        }

        candidates.sort_by(|a, b| {
            b.score.cmp(&a.score).then_with(|| {
                let a_id = a.table.id.as_ref().map(ToString::to_string).unwrap_or_default();
                let b_id = b.table.id.as_ref().map(ToString::to_string).unwrap_or_default();
                a_id.cmp(&b_id)
            })
        });

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_table_is_penalized() {
        // party 4 at capacity 4: utilization 100 -> 100 - 10*3 = 70
        assert_eq!(fit_score(4, 4), 70);
    }

    #[test]
    fn test_half_empty_table_keeps_full_score() {
        // utilization exactly 50: no penalty
        assert_eq!(fit_score(4, 8), 100);
    }

    #[test]
    fn test_sweet_spot_scores_full() {
        // 75% utilization
        assert_eq!(fit_score(6, 8), 100);
    }

    #[test]
    fn test_wasted_seats_are_penalized() {
        // party 2 at capacity 10: utilization 20 -> 100 - 30*2 = 40
        assert_eq!(fit_score(2, 10), 40);
    }

    #[test]
    fn test_extreme_waste_approaches_zero() {
        // party 1 at capacity 20: utilization 5 -> 100 - 45*2 = 10
        assert_eq!(fit_score(1, 20), 10);
        // party 1 at capacity 50: utilization 2 -> 100 - 48*2 = 4
        assert_eq!(fit_score(1, 50), 4);
    }
}
