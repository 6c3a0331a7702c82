//! Retracting the newest checkpoint.

use super::checkpoint::reopen_checkpoint;
use super::errors::Rejection;
use crate::state::{Assignments, PointPool, RaceState};

/// What an undo reverted.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UndoOutcome {
    /// Checkpoint that is open again.
    pub checkpoint: u32,
    /// Assignments whose points were taken back.
    pub reverted: Assignments,
    /// Lap countdown restored from the history entry.
    pub laps_remaining: u32,
    pub available: PointPool,
}

/// Pops the newest history entry and reopens its checkpoint.
///
/// Athlete statuses are left alone; only the entry's points are subtracted
/// from the current totals.
pub(super) fn undo_last_checkpoint(state: &mut RaceState) -> Result<UndoOutcome, Rejection> {
    let entry = state.history.pop().ok_or(Rejection::NothingToUndo)?;

    for assignment in &entry.athletes {
        if let Some(athlete) = state.athletes.get_mut(assignment.athlete) {
            athlete.revoke(assignment.points);
        }
    }

    state.progress.laps_remaining = entry.laps_before_decrement;
    reopen_checkpoint(state, entry.number);

    Ok(UndoOutcome {
        checkpoint: entry.number,
        reverted: entry.athletes,
        laps_remaining: state.progress.laps_remaining,
        available: state.checkpoint.available,
    })
}
