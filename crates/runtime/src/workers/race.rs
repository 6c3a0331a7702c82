//! Race worker that owns the authoritative [`race_core::RaceState`].
//!
//! Receives commands from [`crate::RaceHandle`], executes them through
//! [`race_core::RaceEngine`], persists the result, and publishes events.
//!
//! A command runs against a staged copy of the state. The copy replaces the
//! live state only after it has been saved, so a failed save leaves both the
//! race and the snapshot on disk unchanged.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

use race_core::{CommandOutcome, RaceCommand, RaceEngine, RaceError, RaceState, Rejection};

use crate::api::{Result, RuntimeError};
use crate::events::{EventBus, RaceEvent};
use crate::repository::{RaceSnapshot, SnapshotRepository};

/// Commands that can be sent to the race worker
pub enum Command {
    /// Apply a race command.
    Execute {
        command: RaceCommand,
        reply: oneshot::Sender<Result<CommandOutcome>>,
    },
    /// Replace the race with a fresh one under the same configuration.
    Reset { reply: oneshot::Sender<Result<()>> },
    /// Query the current race state (read-only).
    QueryState { reply: oneshot::Sender<RaceState> },
}

/// Background task that serializes every race operation.
pub struct RaceWorker {
    state: RaceState,
    session_id: String,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    repository: Option<Arc<dyn SnapshotRepository>>,
}

impl RaceWorker {
    pub fn new(
        state: RaceState,
        session_id: String,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        repository: Option<Arc<dyn SnapshotRepository>>,
    ) -> Self {
        info!(
            target: "runtime::worker",
            session = %session_id,
            phase = %state.progress.phase(),
            athletes = state.athletes.len(),
            persistence = repository.is_some(),
            "RaceWorker initialized"
        );

        Self {
            state,
            session_id,
            command_rx,
            event_bus,
            repository,
        }
    }

    /// Main worker loop. Ends once every handle is dropped.
    pub async fn run(mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd);
        }
        debug!(target: "runtime::worker", "command channel closed, worker stopping");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Execute { command, reply } => {
                let result = self.execute(command);
                if reply.send(result).is_err() {
                    debug!("Execute reply channel closed (caller dropped)");
                }
            }
            Command::Reset { reply } => {
                let result = self.reset();
                if reply.send(result).is_err() {
                    debug!("Reset reply channel closed (caller dropped)");
                }
            }
            Command::QueryState { reply } => {
                if reply.send(self.state.clone()).is_err() {
                    debug!("QueryState reply channel closed (caller dropped)");
                }
            }
        }
    }

    fn execute(&mut self, command: RaceCommand) -> Result<CommandOutcome> {
        let mut staged = self.state.clone();
        let outcome = match RaceEngine::new(&mut staged).execute(&command) {
            Ok(outcome) => outcome,
            Err(rejection) => {
                self.publish_rejection(&command, &rejection);
                return Err(rejection.into());
            }
        };

        self.persist(&staged)?;
        self.state = staged;

        info!(
            target: "runtime::worker",
            command = command.name(),
            checkpoint = self.state.checkpoint.number,
            laps_remaining = self.state.progress.laps_remaining,
            "command applied"
        );

        for event in RaceEvent::from_outcome(&outcome, &self.state) {
            self.event_bus.publish(event);
        }

        Ok(outcome)
    }

    fn reset(&mut self) -> Result<()> {
        let fresh = RaceState::new(self.state.config);

        if let Some(repository) = &self.repository {
            repository.clear().inspect_err(|e| {
                error!(target: "runtime::worker", error = %e, "failed to clear snapshot");
            })?;
        }
        self.state = fresh;

        info!(target: "runtime::worker", session = %self.session_id, "race reset");
        self.event_bus.publish(RaceEvent::RaceReset);
        Ok(())
    }

    fn persist(&self, staged: &RaceState) -> Result<()> {
        let Some(repository) = &self.repository else {
            return Ok(());
        };

        let snapshot = RaceSnapshot::capture(self.session_id.clone(), staged);
        repository.save(&snapshot).map_err(|e| {
            error!(
                target: "runtime::worker",
                error = %e,
                "failed to persist snapshot; command discarded"
            );
            RuntimeError::from(e)
        })
    }

    fn publish_rejection(&self, command: &RaceCommand, rejection: &Rejection) {
        debug!(
            target: "runtime::worker",
            command = command.name(),
            code = rejection.error_code(),
            severity = rejection.severity().as_str(),
            "command rejected: {}",
            rejection
        );

        self.event_bus.publish(RaceEvent::CommandRejected {
            command: command.name().to_owned(),
            code: rejection.error_code().to_owned(),
            message: rejection.to_string(),
        });
    }
}
