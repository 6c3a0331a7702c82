//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RaceHandle`] hides channel plumbing and offers async helpers for every
//! race operation. Reads are answered from a clone of the worker's state, so
//! each one sees a consistent race.
use tokio::sync::{broadcast, mpsc, oneshot};

use race_core::{
    AssignOutcome, AthleteNumber, AthleteStatus, CheckpointSummary, CommandOutcome,
    ProgressSummary, RaceCommand, RaceConfig, RaceState, Standing, StatusChange, UndoOutcome,
};

use super::errors::{Result, RuntimeError};
use crate::events::{EventBus, RaceEvent, Topic};
use crate::report::{ReportFormat, ReportGenerator};
use crate::workers::Command;

/// Client-facing handle to interact with the race worker
#[derive(Clone)]
pub struct RaceHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RaceHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Execute a race command. The outcome is returned once the change is
    /// applied and persisted.
    pub async fn execute(&self, command: RaceCommand) -> Result<CommandOutcome> {
        self.request(|reply| Command::Execute { command, reply })
            .await?
    }

    pub async fn configure(&self, config: RaceConfig) -> Result<()> {
        self.execute(RaceCommand::Configure { config }).await?;
        Ok(())
    }

    /// Start the race; returns the number of the opened checkpoint.
    pub async fn start_race(&self) -> Result<u32> {
        match self.execute(RaceCommand::StartRace).await? {
            CommandOutcome::Started { checkpoint, .. } => Ok(checkpoint),
            _ => unreachable!("StartRace always yields Started"),
        }
    }

    pub async fn assign_points(&self, athlete: AthleteNumber, points: u8) -> Result<AssignOutcome> {
        match self
            .execute(RaceCommand::AssignPoints { athlete, points })
            .await?
        {
            CommandOutcome::Assigned(outcome) => Ok(outcome),
            _ => unreachable!("AssignPoints always yields Assigned"),
        }
    }

    pub async fn set_status(
        &self,
        athlete: AthleteNumber,
        status: AthleteStatus,
    ) -> Result<StatusChange> {
        match self
            .execute(RaceCommand::SetStatus { athlete, status })
            .await?
        {
            CommandOutcome::StatusChanged(change) => Ok(change),
            _ => unreachable!("SetStatus always yields StatusChanged"),
        }
    }

    /// Apply a manual correction; returns the athlete's new total.
    pub async fn modify_points(&self, athlete: AthleteNumber, delta: i64) -> Result<u32> {
        match self
            .execute(RaceCommand::ModifyPoints { athlete, delta })
            .await?
        {
            CommandOutcome::PointsModified { points, .. } => Ok(points),
            _ => unreachable!("ModifyPoints always yields PointsModified"),
        }
    }

    pub async fn undo_last_checkpoint(&self) -> Result<UndoOutcome> {
        match self.execute(RaceCommand::UndoLastCheckpoint).await? {
            CommandOutcome::Undone(outcome) => Ok(outcome),
            _ => unreachable!("UndoLastCheckpoint always yields Undone"),
        }
    }

    pub async fn end_race(&self) -> Result<()> {
        self.execute(RaceCommand::EndRace).await?;
        Ok(())
    }

    /// Discard the race and the saved snapshot, keeping the configuration.
    pub async fn reset(&self) -> Result<()> {
        self.request(|reply| Command::Reset { reply }).await?
    }

    /// Query the current race state (read-only snapshot)
    pub async fn query_state(&self) -> Result<RaceState> {
        self.request(|reply| Command::QueryState { reply }).await
    }

    pub async fn can_undo(&self) -> Result<bool> {
        Ok(self.query_state().await?.can_undo())
    }

    pub async fn leaderboard(&self) -> Result<Vec<Standing>> {
        Ok(self.query_state().await?.leaderboard())
    }

    pub async fn checkpoint_summary(&self) -> Result<CheckpointSummary> {
        Ok(self.query_state().await?.checkpoint_summary())
    }

    pub async fn progress_summary(&self) -> Result<ProgressSummary> {
        Ok(self.query_state().await?.progress_summary())
    }

    /// Render a report of the current race.
    pub async fn report(&self, format: ReportFormat) -> Result<String> {
        let state = self.query_state().await?;
        ReportGenerator::new(&state).render(format)
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Scoring` - points, statuses, checkpoint transitions
    /// - `Topic::Lifecycle` - configure, start, resume, finishable, end, reset
    /// - `Topic::Rejection` - refused commands
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<RaceEvent> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> std::collections::HashMap<Topic, broadcast::Receiver<RaceEvent>> {
        self.event_bus.subscribe_multiple(topics)
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
