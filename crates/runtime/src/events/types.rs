//! Event payloads published by the race worker.

use race_core::{
    Assignment, Assignments, AthleteNumber, CommandOutcome, PointPool, RaceConfig, RaceState,
    StatusChange,
};
use serde::{Deserialize, Serialize};

use super::bus::Topic;

/// Notification emitted after a command was applied or refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RaceEvent {
    RaceConfigured {
        config: RaceConfig,
    },
    RaceStarted {
        checkpoint: u32,
        available: PointPool,
    },
    /// The race state was restored from a saved snapshot at startup.
    RaceResumed {
        checkpoint: u32,
        laps_remaining: u32,
    },
    PointsAssigned {
        checkpoint: u32,
        assignment: Assignment,
        total: u32,
    },
    CheckpointCompleted {
        number: u32,
        laps_remaining: u32,
    },
    CheckpointOpened {
        number: u32,
        available: PointPool,
    },
    /// Every lap is scored; the organizer may end the race.
    RaceFinishable,
    StatusChanged(StatusChange),
    PointsModified {
        athlete: AthleteNumber,
        points: u32,
    },
    CheckpointUndone {
        checkpoint: u32,
        reverted: Assignments,
        laps_remaining: u32,
    },
    RaceEnded,
    RaceReset,
    CommandRejected {
        command: String,
        code: String,
        message: String,
    },
}

impl RaceEvent {
    pub fn topic(&self) -> Topic {
        match self {
            RaceEvent::RaceConfigured { .. }
            | RaceEvent::RaceStarted { .. }
            | RaceEvent::RaceResumed { .. }
            | RaceEvent::RaceFinishable
            | RaceEvent::RaceEnded
            | RaceEvent::RaceReset => Topic::Lifecycle,
            RaceEvent::PointsAssigned { .. }
            | RaceEvent::CheckpointCompleted { .. }
            | RaceEvent::CheckpointOpened { .. }
            | RaceEvent::StatusChanged(_)
            | RaceEvent::PointsModified { .. }
            | RaceEvent::CheckpointUndone { .. } => Topic::Scoring,
            RaceEvent::CommandRejected { .. } => Topic::Rejection,
        }
    }

    /// Expands a command outcome into the events it implies.
    ///
    /// `state` is the race after the command was committed.
    pub fn from_outcome(outcome: &CommandOutcome, state: &RaceState) -> Vec<RaceEvent> {
        match outcome {
            CommandOutcome::Configured(config) => vec![RaceEvent::RaceConfigured { config: *config }],
            CommandOutcome::Started {
                checkpoint,
                available,
            } => vec![RaceEvent::RaceStarted {
                checkpoint: *checkpoint,
                available: *available,
            }],
            CommandOutcome::Assigned(assigned) => {
                let mut events = vec![RaceEvent::PointsAssigned {
                    checkpoint: assigned.checkpoint,
                    assignment: assigned.assignment,
                    total: assigned.total,
                }];
                if let Some(completion) = assigned.completion {
                    events.push(RaceEvent::CheckpointCompleted {
                        number: completion.number,
                        laps_remaining: completion.laps_remaining,
                    });
                    match completion.next {
                        Some(number) => events.push(RaceEvent::CheckpointOpened {
                            number,
                            available: state.checkpoint.available,
                        }),
                        None => events.push(RaceEvent::RaceFinishable),
                    }
                }
                events
            }
            CommandOutcome::StatusChanged(change) => vec![RaceEvent::StatusChanged(*change)],
            CommandOutcome::PointsModified { athlete, points } => {
                vec![RaceEvent::PointsModified {
                    athlete: *athlete,
                    points: *points,
                }]
            }
            CommandOutcome::Undone(undo) => vec![
                RaceEvent::CheckpointUndone {
                    checkpoint: undo.checkpoint,
                    reverted: undo.reverted.clone(),
                    laps_remaining: undo.laps_remaining,
                },
                RaceEvent::CheckpointOpened {
                    number: undo.checkpoint,
                    available: undo.available,
                },
            ],
            CommandOutcome::Ended => vec![RaceEvent::RaceEnded],
        }
    }
}
