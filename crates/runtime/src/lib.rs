//! Runtime hosting for a points race.
//!
//! This crate wires the synchronous [`race_core`] engine into an async
//! service: a single worker task owns the race state, every mutating command
//! is persisted through a [`SnapshotRepository`] before it is acknowledged,
//! and consumers interact through the cloneable [`RaceHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for race notifications
//! - [`repository`] persists and restores race snapshots
//! - [`report`] renders standings and checkpoint history for export
//! - `workers` keeps the background task internal to the crate
pub mod api;
pub mod events;
pub mod report;
pub mod repository;
pub mod runtime;

mod workers;

pub use api::{RaceHandle, Result, RuntimeError};
pub use events::{EventBus, RaceEvent, Topic};
pub use report::{RaceReport, ReportFormat, ReportGenerator};
pub use repository::{
    FileSnapshotRepository, InMemorySnapshotRepository, RaceSnapshot, RepositoryError,
    SnapshotFormat, SnapshotRepository,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
