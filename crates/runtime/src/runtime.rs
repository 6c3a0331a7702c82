//! High-level runtime orchestrator.
//!
//! The runtime owns the race worker, wires up the command and event
//! channels, and restores the last saved race when a repository is attached.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use race_core::{RaceConfig, RaceState};

use crate::api::{RaceHandle, Result, RuntimeError};
use crate::events::{EventBus, RaceEvent, Topic};
use crate::repository::SnapshotRepository;
use crate::workers::RaceWorker;

/// Runtime configuration shared across the orchestrator and worker.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Identifies the race in snapshots and logs.
    pub session_id: String,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Save after every applied command and resume at startup (default: true)
    pub enable_persistence: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            session_id: "default".to_owned(),
            event_buffer_size: 100,
            command_buffer_size: 32,
            enable_persistence: true,
        }
    }
}

/// Main runtime that hosts one race.
///
/// [`RaceHandle`] provides a cloneable façade for front ends.
pub struct Runtime {
    handle: RaceHandle,
    worker_handle: JoinHandle<()>,
    resumed: bool,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RaceHandle {
        self.handle.clone()
    }

    /// True if the race was restored from a saved snapshot.
    pub fn resumed(&self) -> bool {
        self.resumed
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<RaceEvent> {
        self.handle.subscribe(topic)
    }

    /// Shutdown the runtime gracefully
    ///
    /// The worker drains queued commands and stops once every clone of the
    /// handle has been dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);
        self.worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    state: Option<RaceState>,
    repository: Option<Arc<dyn SnapshotRepository>>,
    event_bus: Option<EventBus>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            state: None,
            repository: None,
            event_bus: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// State used when no snapshot can be resumed.
    pub fn initial_state(mut self, state: RaceState) -> Self {
        self.state = Some(state);
        self
    }

    /// Attach a snapshot repository.
    pub fn repository(mut self, repository: Arc<dyn SnapshotRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Use an existing event bus, e.g. to subscribe before the resume event.
    pub fn event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    pub fn enable_persistence(mut self, enable: bool) -> Self {
        self.config.enable_persistence = enable;
        self
    }

    /// Build the runtime and spawn the race worker.
    ///
    /// With persistence enabled the latest snapshot takes precedence over
    /// `initial_state`. A snapshot that fails verification aborts the build.
    pub async fn build(self) -> Result<Runtime> {
        let RuntimeBuilder {
            config,
            state,
            repository,
            event_bus,
        } = self;

        let event_bus =
            event_bus.unwrap_or_else(|| EventBus::with_capacity(config.event_buffer_size));
        let repository = repository.filter(|_| config.enable_persistence);

        let snapshot = match &repository {
            Some(repository) => repository.load()?,
            None => None,
        };

        let resumed = snapshot.is_some();
        let state = match snapshot {
            Some(snapshot) => {
                tracing::info!(
                    target: "runtime::repository",
                    session = %snapshot.session_id,
                    saved_at = %snapshot.saved_at,
                    "resuming race from snapshot"
                );
                snapshot.into_state()
            }
            None => state.unwrap_or_else(|| RaceState::new(RaceConfig::default())),
        };

        if resumed {
            event_bus.publish(RaceEvent::RaceResumed {
                checkpoint: state.checkpoint.number,
                laps_remaining: state.progress.laps_remaining,
            });
        }

        let (command_tx, command_rx) = mpsc::channel(config.command_buffer_size.max(1));
        let worker = RaceWorker::new(
            state,
            config.session_id.clone(),
            command_rx,
            event_bus.clone(),
            repository,
        );
        let worker_handle = tokio::spawn(worker.run());

        Ok(Runtime {
            handle: RaceHandle::new(command_tx, event_bus),
            worker_handle,
            resumed,
        })
    }
}
