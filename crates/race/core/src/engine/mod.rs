//! Command handling for a single race.
//!
//! The [`RaceEngine`] is the authoritative reducer for [`RaceState`]. It
//! enforces race-level preconditions, applies point and status changes, and
//! cascades checkpoint completion synchronously. Every public operation
//! either applies fully or returns a [`Rejection`] with the state untouched.

mod checkpoint;
mod errors;
mod undo;

pub use checkpoint::CheckpointCompletion;
pub use errors::{InputError, Rejection};
pub use undo::UndoOutcome;

use crate::command::{CommandOutcome, RaceCommand};
use crate::config::RaceConfig;
use crate::state::{Assignment, AthleteNumber, AthleteStatus, PointPool, RaceState};

/// Successful point assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssignOutcome {
    pub checkpoint: u32,
    pub assignment: Assignment,
    /// Athlete's running total after the assignment.
    pub total: u32,
    /// Present when this assignment exhausted the checkpoint's pool.
    pub completion: Option<CheckpointCompletion>,
}

/// Successful status transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusChange {
    pub athlete: AthleteNumber,
    pub from: AthleteStatus,
    pub to: AthleteStatus,
    pub points: u32,
    pub saved_points: u32,
}

/// Race engine that validates and applies race commands.
pub struct RaceEngine<'a> {
    state: &'a mut RaceState,
}

impl<'a> RaceEngine<'a> {
    /// Creates a new race engine over the given state.
    pub fn new(state: &'a mut RaceState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &RaceState {
        self.state
    }

    /// Routes a command to its operation.
    pub fn execute(&mut self, command: &RaceCommand) -> Result<CommandOutcome, Rejection> {
        match *command {
            RaceCommand::Configure { config } => {
                self.configure(config)?;
                Ok(CommandOutcome::Configured(config))
            }
            RaceCommand::StartRace => {
                let pool = self.start_race()?;
                Ok(CommandOutcome::Started {
                    checkpoint: self.state.checkpoint.number,
                    available: pool,
                })
            }
            RaceCommand::AssignPoints { athlete, points } => self
                .assign_points(athlete, points)
                .map(CommandOutcome::Assigned),
            RaceCommand::SetStatus { athlete, status } => self
                .set_status(athlete, status)
                .map(CommandOutcome::StatusChanged),
            RaceCommand::ModifyPoints { athlete, delta } => {
                let points = self.modify_points(athlete, delta)?;
                Ok(CommandOutcome::PointsModified { athlete, points })
            }
            RaceCommand::UndoLastCheckpoint => {
                self.undo_last_checkpoint().map(CommandOutcome::Undone)
            }
            RaceCommand::EndRace => {
                self.end_race()?;
                Ok(CommandOutcome::Ended)
            }
        }
    }

    /// Sets lap count and scoring frequency. Only allowed before the start.
    pub fn configure(&mut self, config: RaceConfig) -> Result<(), Rejection> {
        self.ensure_not_started()?;
        config.validate()?;

        self.state.config = config;
        self.state.progress.laps_remaining = config.total_laps;
        Ok(())
    }

    /// Starts the race and opens checkpoint 1. Returns its pool.
    pub fn start_race(&mut self) -> Result<PointPool, Rejection> {
        self.ensure_not_started()?;
        self.state.config.validate()?;

        self.state.progress.started = true;
        self.state.progress.laps_remaining = self.state.config.total_laps;
        self.state.checkpoint.number = 0;
        checkpoint::initialize_checkpoint(self.state);
        Ok(self.state.checkpoint.available)
    }

    /// Awards `points` to `athlete` at the open checkpoint.
    ///
    /// Preconditions, in order: race open, value still in the pool, athlete
    /// not yet scored here, athlete not disqualified. Completing the pool
    /// advances the lap countdown and opens the next checkpoint in the same
    /// call.
    pub fn assign_points(
        &mut self,
        athlete: AthleteNumber,
        points: u8,
    ) -> Result<AssignOutcome, Rejection> {
        self.ensure_running()?;

        let number = self.state.checkpoint.number;
        if !self.state.checkpoint.available.contains_value(points) {
            return Err(Rejection::PointsNotAvailable {
                points,
                checkpoint: number,
            });
        }
        if self.state.checkpoint.has_athlete(athlete) {
            return Err(Rejection::DuplicateAssignment {
                athlete,
                checkpoint: number,
            });
        }
        if self.state.athletes.status_of(athlete) == AthleteStatus::Disqualified {
            return Err(Rejection::AthleteDisqualified { athlete });
        }

        let record = self.state.athletes.get_or_register(athlete);
        record.award(points);
        let total = record.points;

        let assignment = Assignment::new(athlete, points);
        checkpoint::record_assignment(self.state, assignment);
        let completion = checkpoint::complete_if_exhausted(self.state);

        Ok(AssignOutcome {
            checkpoint: number,
            assignment,
            total,
            completion,
        })
    }

    /// Moves an athlete through the status state machine.
    ///
    /// Unseen athletes are registered as Normal first, so an athlete can be
    /// lapped or disqualified before scoring.
    pub fn set_status(
        &mut self,
        athlete: AthleteNumber,
        status: AthleteStatus,
    ) -> Result<StatusChange, Rejection> {
        self.ensure_running()?;

        let mut record = self
            .state
            .athletes
            .get(athlete)
            .cloned()
            .unwrap_or_else(|| crate::state::Athlete::new(athlete));
        let from = record.status;
        record.transition_to(status)?;

        let change = StatusChange {
            athlete,
            from,
            to: record.status,
            points: record.points,
            saved_points: record.saved_points,
        };
        self.state.athletes.upsert(record);
        Ok(change)
    }

    /// Free-form correction of an athlete's total, floored at zero.
    ///
    /// Does not touch the open checkpoint or the history. Returns the new total.
    pub fn modify_points(&mut self, athlete: AthleteNumber, delta: i64) -> Result<u32, Rejection> {
        self.ensure_running()?;

        let record = self.state.athletes.get_or_register(athlete);
        record.adjust(delta);
        Ok(record.points)
    }

    /// Retracts the newest checkpoint in history and reopens it.
    pub fn undo_last_checkpoint(&mut self) -> Result<UndoOutcome, Rejection> {
        self.ensure_running()?;
        undo::undo_last_checkpoint(self.state)
    }

    /// Ends the race. Terminal.
    pub fn end_race(&mut self) -> Result<(), Rejection> {
        self.ensure_running()?;
        self.state.progress.ended = true;
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.state.can_undo()
    }

    fn ensure_running(&self) -> Result<(), Rejection> {
        if self.state.progress.ended {
            return Err(Rejection::RaceEnded);
        }
        if !self.state.progress.started {
            return Err(Rejection::RaceNotStarted);
        }
        Ok(())
    }

    fn ensure_not_started(&self) -> Result<(), Rejection> {
        if self.state.progress.ended {
            return Err(Rejection::RaceEnded);
        }
        if self.state.progress.started {
            return Err(Rejection::RaceAlreadyStarted);
        }
        Ok(())
    }
}
