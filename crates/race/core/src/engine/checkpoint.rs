//! Checkpoint opening, recording, and completion.

use crate::state::{Assignment, PointPool, RaceState};

/// Result of a checkpoint running out of points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CheckpointCompletion {
    /// The checkpoint that just completed.
    pub number: u32,
    /// Laps remaining after the decrement.
    pub laps_remaining: u32,
    /// Next checkpoint, opened immediately while laps remain.
    pub next: Option<u32>,
    /// All laps are scored; the race may now be ended.
    pub race_finishable: bool,
}

/// Pool for a checkpoint opened with the current lap countdown.
pub(super) fn pool_for(state: &RaceState) -> PointPool {
    PointPool::for_checkpoint(
        state
            .config
            .is_final_checkpoint(state.progress.laps_remaining),
    )
}

/// Opens the checkpoint after the current one.
pub(super) fn initialize_checkpoint(state: &mut RaceState) {
    let number = state.checkpoint.number + 1;
    reopen_checkpoint(state, number);
}

/// Opens checkpoint `number` empty, with the pool implied by the countdown.
pub(super) fn reopen_checkpoint(state: &mut RaceState, number: u32) {
    let pool = pool_for(state);
    state.checkpoint.open(number, pool);
}

/// Records a validated assignment in the open checkpoint and its history entry.
pub(super) fn record_assignment(state: &mut RaceState, assignment: Assignment) {
    state.checkpoint.record(assignment);
    state.history.record(
        state.checkpoint.number,
        &state.checkpoint.assigned,
        state.progress.laps_remaining,
    );
}

/// Advances the lap countdown if the open checkpoint has no points left.
pub(super) fn complete_if_exhausted(state: &mut RaceState) -> Option<CheckpointCompletion> {
    if !state.checkpoint.is_complete() {
        return None;
    }

    let number = state.checkpoint.number;
    let laps = state.config.points_frequency.laps_per_checkpoint();
    state.progress.laps_remaining = state.progress.laps_remaining.saturating_sub(laps);

    let next = if state.progress.laps_remaining > 0 {
        initialize_checkpoint(state);
        Some(state.checkpoint.number)
    } else {
        None
    };

    Some(CheckpointCompletion {
        number,
        laps_remaining: state.progress.laps_remaining,
        next,
        race_finishable: next.is_none(),
    })
}
