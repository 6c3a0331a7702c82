//! Standings derived from the athlete ledger and checkpoint history.
//!
//! Ordering, applied key by key:
//! 1. status bucket (Normal, then Lapped, then Disqualified)
//! 2. points, descending
//! 3. placing in the newest checkpoint that handed out the top value:
//!    points scored there (descending), then arrival order
//! 4. start number, ascending
//!
//! Athletes without a placing in that checkpoint, or races where no such
//! checkpoint exists yet, rank behind every athlete that has one.

use std::cmp::Ordering;

use crate::config::RaceConfig;
use crate::state::{Athlete, AthleteNumber, AthleteRegistry, CheckpointHistory, CheckpointHistoryEntry};

/// One row of the leaderboard.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Standing {
    /// 1-based position.
    pub rank: usize,
    pub athlete: Athlete,
}

/// Produces the total order over all registered athletes. Pure.
pub fn rank(athletes: &AthleteRegistry, history: &CheckpointHistory) -> Vec<Standing> {
    let finish = history.latest_with_points(RaceConfig::TOP_POINT_VALUE);

    let mut ordered: Vec<&Athlete> = athletes.iter().collect();
    ordered.sort_by(|a, b| compare(a, b, finish));

    ordered
        .into_iter()
        .enumerate()
        .map(|(index, athlete)| Standing {
            rank: index + 1,
            athlete: athlete.clone(),
        })
        .collect()
}

fn compare(a: &Athlete, b: &Athlete, finish: Option<&CheckpointHistoryEntry>) -> Ordering {
    a.status
        .rank_bucket()
        .cmp(&b.status.rank_bucket())
        .then_with(|| b.points.cmp(&a.points))
        .then_with(|| {
            let (a_points, a_position) = finish_placing(finish, a.number);
            let (b_points, b_position) = finish_placing(finish, b.number);
            b_points
                .cmp(&a_points)
                .then_with(|| a_position.cmp(&b_position))
        })
        .then_with(|| a.number.cmp(&b.number))
}

/// Points and arrival position in the finish checkpoint; absent counts as worst.
fn finish_placing(finish: Option<&CheckpointHistoryEntry>, athlete: AthleteNumber) -> (u8, usize) {
    finish
        .and_then(|entry| entry.placing(athlete))
        .unwrap_or((0, usize::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Assignment, Assignments, AthleteStatus};

    fn number(n: u32) -> AthleteNumber {
        AthleteNumber::new(n).unwrap()
    }

    fn registry(rows: &[(u32, u32, AthleteStatus)]) -> AthleteRegistry {
        let mut registry = AthleteRegistry::new();
        for &(n, points, status) in rows {
            let athlete = registry.get_or_register(number(n));
            athlete.points = points;
            athlete.status = status;
        }
        registry
    }

    fn entry(pairs: &[(u32, u8)]) -> Assignments {
        pairs
            .iter()
            .map(|&(n, p)| Assignment::new(number(n), p))
            .collect()
    }

    fn order(standings: &[Standing]) -> Vec<u32> {
        standings.iter().map(|s| s.athlete.number.get()).collect()
    }

    #[test]
    fn buckets_by_status_before_points() {
        let athletes = registry(&[
            (1, 2, AthleteStatus::Disqualified),
            (2, 1, AthleteStatus::Normal),
            (3, 9, AthleteStatus::Lapped),
            (4, 5, AthleteStatus::Normal),
        ]);
        let standings = rank(&athletes, &CheckpointHistory::new());
        assert_eq!(order(&standings), vec![4, 2, 3, 1]);
        assert_eq!(standings[0].rank, 1);
        assert_eq!(standings[3].rank, 4);
    }

    #[test]
    fn equal_points_resolved_by_finish_checkpoint() {
        let athletes = registry(&[
            (21, 7, AthleteStatus::Normal),
            (20, 7, AthleteStatus::Normal),
        ]);
        let mut history = CheckpointHistory::new();
        history.record(4, &entry(&[(21, 3), (20, 2), (5, 1)]), 1);

        assert_eq!(order(&rank(&athletes, &history)), vec![21, 20]);
    }

    #[test]
    fn uses_newest_entry_with_top_value() {
        let athletes = registry(&[
            (1, 6, AthleteStatus::Normal),
            (2, 6, AthleteStatus::Normal),
        ]);
        let mut history = CheckpointHistory::new();
        history.record(1, &entry(&[(1, 3), (2, 2)]), 4);
        history.record(2, &entry(&[(2, 3), (1, 2)]), 2);
        // Newer entry without a 3 is skipped.
        history.record(3, &entry(&[(1, 2)]), 0);

        assert_eq!(order(&rank(&athletes, &history)), vec![2, 1]);
    }

    #[test]
    fn absent_from_finish_ranks_behind_present() {
        let athletes = registry(&[
            (8, 4, AthleteStatus::Normal),
            (9, 4, AthleteStatus::Normal),
        ]);
        let mut history = CheckpointHistory::new();
        history.record(1, &entry(&[(3, 3), (9, 1)]), 1);

        assert_eq!(order(&rank(&athletes, &history)), vec![9, 8]);
    }

    #[test]
    fn falls_back_to_start_number_and_is_stable() {
        let athletes = registry(&[
            (30, 2, AthleteStatus::Normal),
            (12, 2, AthleteStatus::Normal),
            (17, 2, AthleteStatus::Normal),
        ]);
        let history = CheckpointHistory::new();

        let first = rank(&athletes, &history);
        assert_eq!(order(&first), vec![12, 17, 30]);
        assert_eq!(rank(&athletes, &history), first);
    }
}
