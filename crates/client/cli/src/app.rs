//! Line-oriented operator console.
use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::{self, error::TryRecvError};

use race_core::{RaceError, RaceState};
use race_runtime::{
    EventBus, FileSnapshotRepository, RaceEvent, RaceHandle, ReportFormat, Runtime,
    RuntimeConfig, RuntimeError, Topic,
};

use crate::command::{self, CliCommand, HELP};
use crate::config::CliConfig;
use crate::events::describe;

pub struct CliApp {
    config: CliConfig,
    runtime: Runtime,
    handle: RaceHandle,
    scoring: broadcast::Receiver<RaceEvent>,
    lifecycle: broadcast::Receiver<RaceEvent>,
}

impl CliApp {
    /// Builds the runtime, resuming the session's saved race if there is one.
    pub async fn start(config: CliConfig) -> Result<Self> {
        let event_bus = EventBus::new();
        let scoring = event_bus.subscribe(Topic::Scoring);
        let lifecycle = event_bus.subscribe(Topic::Lifecycle);

        let runtime_config = RuntimeConfig {
            session_id: config.session_id.clone(),
            command_buffer_size: config.command_buffer,
            enable_persistence: config.enable_persistence,
            ..RuntimeConfig::default()
        };

        let mut builder = Runtime::builder()
            .config(runtime_config)
            .event_bus(event_bus)
            .initial_state(RaceState::new(config.race_defaults));

        if config.enable_persistence {
            let save_dir = config.session_save_dir();
            let repository = FileSnapshotRepository::new(&save_dir, config.snapshot_format)
                .with_context(|| format!("opening save directory {}", save_dir.display()))?;
            tracing::info!(
                "Persistence enabled: {}",
                repository.snapshot_path().display()
            );
            builder = builder.repository(Arc::new(repository));
        }

        let runtime = builder
            .build()
            .await
            .context("failed to restore the saved race; remove the snapshot or pick another RACE_SESSION_ID")?;
        let handle = runtime.handle();

        Ok(Self {
            config,
            runtime,
            handle,
            scoring,
            lifecycle,
        })
    }

    pub async fn run(mut self) -> Result<()> {
        println!("Points race scorer (session `{}`). Type `help` for commands.", self.config.session_id);
        self.print_events();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            match command::parse(&line, self.config.race_defaults) {
                Ok(None) => continue,
                Ok(Some(CliCommand::Quit)) => break,
                Ok(Some(command)) => self.dispatch(command).await?,
                Err(e) => println!("error: {e}"),
            }
            self.print_events();
        }

        let CliApp {
            runtime, handle, ..
        } = self;
        drop(handle);
        runtime.shutdown().await?;
        tracing::info!("session closed");
        Ok(())
    }

    /// Runs one command. Only failures of the runtime itself end the session.
    async fn dispatch(&mut self, command: CliCommand) -> Result<()> {
        let result = match command {
            CliCommand::Race(race_command) => self.handle.execute(race_command).await.map(|_| ()),
            CliCommand::Board => self.print_board().await,
            CliCommand::Status => self.print_status().await,
            CliCommand::Report { format, path } => self.report(format, path).await,
            CliCommand::Reset => self.handle.reset().await,
            CliCommand::Help => {
                println!("{HELP}");
                Ok(())
            }
            CliCommand::Quit => Ok(()),
        };

        match result {
            Ok(()) => Ok(()),
            Err(RuntimeError::Rejected(rejection)) => {
                println!("rejected [{}]: {}", rejection.error_code(), rejection);
                Ok(())
            }
            Err(e @ (RuntimeError::Repository(_) | RuntimeError::Report(_))) => {
                tracing::error!(code = e.error_code(), "command failed: {e}");
                println!("error: {e}");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn print_board(&self) -> race_runtime::Result<()> {
        let standings = self.handle.leaderboard().await?;
        if standings.is_empty() {
            println!("no athletes yet");
            return Ok(());
        }
        println!("{:>4}  {:>8}  {:<12}  {:>6}", "Rank", "Athlete", "Status", "Points");
        for standing in standings {
            let athlete = standing.athlete;
            println!(
                "{:>4}  {:>8}  {:<12}  {:>6}",
                standing.rank,
                athlete.number.to_string(),
                athlete.status.as_ref(),
                athlete.points
            );
        }
        Ok(())
    }

    async fn print_status(&self) -> race_runtime::Result<()> {
        let progress = self.handle.progress_summary().await?;
        let checkpoint = self.handle.checkpoint_summary().await?;

        println!(
            "state: {}, laps: {} ({}), remaining: {}",
            progress.phase, progress.total_laps, progress.points_frequency, progress.laps_remaining
        );
        if progress.checkpoint > 0 {
            let available: Vec<String> = checkpoint
                .available
                .values()
                .map(|v| v.to_string())
                .collect();
            let assigned: Vec<String> = checkpoint
                .assigned
                .iter()
                .map(|a| format!("{} +{}", a.athlete, a.points))
                .collect();
            println!(
                "checkpoint {}{}: available [{}], assigned [{}]",
                checkpoint.number,
                if checkpoint.is_final { " (final)" } else { "" },
                available.join(", "),
                assigned.join(", ")
            );
        }
        println!("undo available: {}", if progress.can_undo { "yes" } else { "no" });
        Ok(())
    }

    async fn report(
        &self,
        format: ReportFormat,
        path: Option<std::path::PathBuf>,
    ) -> race_runtime::Result<()> {
        let report = self.handle.report(format).await?;
        match path {
            Some(path) => match tokio::fs::write(&path, report).await {
                Ok(()) => println!("report written to {}", path.display()),
                Err(e) => println!("error: could not write {}: {e}", path.display()),
            },
            None => print!("{report}"),
        }
        Ok(())
    }

    /// Prints events published by the last command, scoring before lifecycle.
    fn print_events(&mut self) {
        for rx in [&mut self.scoring, &mut self.lifecycle] {
            loop {
                match rx.try_recv() {
                    Ok(event) => {
                        if let Some(text) = describe(&event) {
                            println!("  {text}");
                        }
                    }
                    Err(TryRecvError::Lagged(skipped)) => {
                        tracing::warn!("event receiver lagged by {skipped}");
                    }
                    Err(TryRecvError::Empty | TryRecvError::Closed) => break,
                }
            }
        }
    }
}
