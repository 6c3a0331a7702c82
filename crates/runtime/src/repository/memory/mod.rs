//! In-memory repository implementations.

mod snapshot;

pub use snapshot::InMemorySnapshotRepository;
