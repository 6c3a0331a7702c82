use std::fs;
use std::sync::Arc;

use race_core::{AthleteNumber, PointsFrequency, RaceConfig, RaceState};
use race_runtime::{
    EventBus, FileSnapshotRepository, InMemorySnapshotRepository, RaceEvent, RaceSnapshot,
    RepositoryError, Runtime, RuntimeConfig, RuntimeError, SnapshotFormat, SnapshotRepository,
    Topic,
};
use tempfile::TempDir;

fn athlete(n: u32) -> AthleteNumber {
    AthleteNumber::new(n).expect("positive athlete number")
}

fn session(id: &str) -> RuntimeConfig {
    RuntimeConfig {
        session_id: id.to_owned(),
        ..RuntimeConfig::default()
    }
}

async fn build(repository: Arc<dyn SnapshotRepository>, id: &str) -> Runtime {
    Runtime::builder()
        .config(session(id))
        .repository(repository)
        .build()
        .await
        .expect("runtime should build")
}

/// A race interrupted after a few commands resumes where it stopped.
#[tokio::test]
async fn test_resume_from_file_snapshot() {
    let dir = TempDir::new().expect("temp dir");

    for format in [SnapshotFormat::Binary, SnapshotFormat::Json] {
        let base = dir.path().join(format.as_ref());
        let repository = Arc::new(
            FileSnapshotRepository::new(&base, format).expect("file repository"),
        );

        let runtime = build(repository.clone(), "resume").await;
        assert!(!runtime.resumed());
        let handle = runtime.handle();
        handle
            .configure(RaceConfig::new(4, PointsFrequency::EveryLap))
            .await
            .expect("configure");
        handle.start_race().await.expect("start");
        handle.assign_points(athlete(3), 2).await.expect("assign");
        handle.assign_points(athlete(9), 1).await.expect("assign");
        let before = handle.query_state().await.expect("state");
        drop(handle);
        runtime.shutdown().await.expect("shutdown");

        assert!(repository.exists());

        let bus = EventBus::new();
        let mut lifecycle = bus.subscribe(Topic::Lifecycle);
        let repository = Arc::new(
            FileSnapshotRepository::new(&base, format).expect("file repository"),
        );
        let runtime = Runtime::builder()
            .config(session("resume"))
            .repository(repository)
            .event_bus(bus)
            .build()
            .await
            .expect("runtime should build");

        assert!(runtime.resumed());
        let after = runtime.handle().query_state().await.expect("state");
        assert_eq!(after, before);
        assert_eq!(after.checkpoint.number, 2);
        assert_eq!(
            lifecycle.try_recv().expect("resume event"),
            RaceEvent::RaceResumed {
                checkpoint: 2,
                laps_remaining: 3,
            }
        );

        runtime.shutdown().await.expect("shutdown");
    }
}

#[tokio::test]
async fn test_rejected_commands_are_not_persisted() {
    let repository = Arc::new(InMemorySnapshotRepository::new());
    let runtime = build(repository.clone(), "rejects").await;
    let handle = runtime.handle();

    handle.start_race().await.expect("start");
    let saved = repository.load().expect("load").expect("snapshot");

    handle
        .assign_points(athlete(1), 3)
        .await
        .expect_err("3 not available on a regular checkpoint");
    let after = repository.load().expect("load").expect("snapshot");
    assert_eq!(after.state, saved.state);

    drop(handle);
    runtime.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn test_tampered_snapshot_aborts_startup() {
    let dir = TempDir::new().expect("temp dir");
    let repository =
        FileSnapshotRepository::new(dir.path(), SnapshotFormat::Json).expect("file repository");

    let mut state = RaceState::new(RaceConfig::new(2, PointsFrequency::EveryLap));
    state.progress.started = true;
    let mut snapshot = RaceSnapshot::capture("tampered", &state);
    snapshot.state.progress.laps_remaining = 99;
    fs::write(
        repository.snapshot_path(),
        serde_json::to_vec(&snapshot).expect("encode"),
    )
    .expect("write snapshot");

    let result = Runtime::builder()
        .config(session("tampered"))
        .repository(Arc::new(repository))
        .build()
        .await;

    assert!(matches!(
        result,
        Err(RuntimeError::Repository(RepositoryError::CorruptedData(_)))
    ));
}

#[tokio::test]
async fn test_reset_clears_snapshot() {
    let repository = Arc::new(InMemorySnapshotRepository::new());
    let runtime = build(repository.clone(), "reset").await;
    let handle = runtime.handle();

    handle.start_race().await.expect("start");
    assert!(repository.exists());

    handle.reset().await.expect("reset");
    assert!(!repository.exists());

    drop(handle);
    runtime.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn test_persistence_disabled_ignores_repository() {
    let repository = Arc::new(InMemorySnapshotRepository::with_snapshot(
        RaceSnapshot::capture("old", &RaceState::new(RaceConfig::new(8, PointsFrequency::EveryLap))),
    ));

    let runtime = Runtime::builder()
        .repository(repository.clone())
        .enable_persistence(false)
        .build()
        .await
        .expect("runtime should build");
    assert!(!runtime.resumed());

    runtime.handle().start_race().await.expect("start");
    let kept = repository.load().expect("load").expect("snapshot");
    assert!(!kept.state.progress.started);

    runtime.shutdown().await.expect("shutdown");
}
