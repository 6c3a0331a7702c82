//! Log of scored checkpoints, newest last.

use super::{Assignment, AthleteNumber, Assignments};

/// Snapshot of one checkpoint's assignments.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CheckpointHistoryEntry {
    pub number: u32,
    /// Assignments at the time of the last mutation, in arrival order.
    pub athletes: Assignments,
    /// Laps remaining when the checkpoint received its first assignment.
    pub laps_before_decrement: u32,
}

impl CheckpointHistoryEntry {
    /// Points the athlete scored here and their arrival position.
    pub fn placing(&self, athlete: AthleteNumber) -> Option<(u8, usize)> {
        self.athletes
            .iter()
            .position(|a| a.athlete == athlete)
            .map(|position| (self.athletes[position].points, position))
    }

    pub fn contains_points(&self, points: u8) -> bool {
        self.athletes.iter().any(|a| a.points == points)
    }
}

/// Append/amend/pop log of checkpoints that received at least one assignment.
///
/// Only the newest entry is ever amended (while its checkpoint is open) or
/// removed (by undo).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CheckpointHistory {
    entries: Vec<CheckpointHistoryEntry>,
}

impl CheckpointHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the latest assignments of checkpoint `number`.
    ///
    /// Creates the entry on the checkpoint's first assignment, capturing
    /// `laps_remaining`; afterwards only the snapshot is overwritten.
    pub fn record(&mut self, number: u32, athletes: &Assignments, laps_remaining: u32) {
        match self.entries.last_mut() {
            Some(entry) if entry.number == number => {
                entry.athletes = athletes.clone();
            }
            _ => self.entries.push(CheckpointHistoryEntry {
                number,
                athletes: athletes.clone(),
                laps_before_decrement: laps_remaining,
            }),
        }
    }

    pub fn pop(&mut self) -> Option<CheckpointHistoryEntry> {
        self.entries.pop()
    }

    pub fn last(&self) -> Option<&CheckpointHistoryEntry> {
        self.entries.last()
    }

    /// Newest entry containing an assignment worth `points`.
    pub fn latest_with_points(&self, points: u8) -> Option<&CheckpointHistoryEntry> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.contains_points(points))
    }

    /// Entries oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &CheckpointHistoryEntry> {
        self.entries.iter()
    }

    /// Every assignment ever recorded for `athlete`, oldest first.
    pub fn assignments_of(
        &self,
        athlete: AthleteNumber,
    ) -> impl Iterator<Item = (u32, Assignment)> + '_ {
        self.entries.iter().flat_map(move |entry| {
            entry
                .athletes
                .iter()
                .filter(move |a| a.athlete == athlete)
                .map(move |a| (entry.number, *a))
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignments(pairs: &[(u32, u8)]) -> Assignments {
        pairs
            .iter()
            .map(|&(n, p)| Assignment::new(AthleteNumber::new(n).unwrap(), p))
            .collect()
    }

    #[test]
    fn amends_open_entry_and_appends_new_ones() {
        let mut history = CheckpointHistory::new();

        history.record(1, &assignments(&[(10, 2)]), 5);
        history.record(1, &assignments(&[(10, 2), (11, 1)]), 5);
        assert_eq!(history.len(), 1);
        assert_eq!(history.last().unwrap().athletes.len(), 2);
        assert_eq!(history.last().unwrap().laps_before_decrement, 5);

        history.record(2, &assignments(&[(12, 1)]), 4);
        assert_eq!(history.len(), 2);
        assert_eq!(history.last().unwrap().laps_before_decrement, 4);

        let popped = history.pop().unwrap();
        assert_eq!(popped.number, 2);
        assert_eq!(history.last().unwrap().number, 1);
    }

    #[test]
    fn finds_newest_entry_with_top_value() {
        let mut history = CheckpointHistory::new();
        history.record(1, &assignments(&[(1, 3), (2, 2), (3, 1)]), 2);
        history.record(2, &assignments(&[(2, 3), (1, 2), (3, 1)]), 1);
        history.record(3, &assignments(&[(4, 2)]), 0);

        let entry = history.latest_with_points(3).unwrap();
        assert_eq!(entry.number, 2);
        assert_eq!(entry.placing(AthleteNumber::new(1).unwrap()), Some((2, 1)));
        assert_eq!(entry.placing(AthleteNumber::new(9).unwrap()), None);

        let scored: Vec<_> = history
            .assignments_of(AthleteNumber::new(1).unwrap())
            .map(|(number, a)| (number, a.points))
            .collect();
        assert_eq!(scored, vec![(1, 3), (2, 2)]);
    }
}
