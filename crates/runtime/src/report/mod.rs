//! Standings and checkpoint breakdown for export.
//!
//! A [`RaceReport`] is assembled from a consistent clone of the race and can
//! be rendered as plain text for the operator or as JSON for other tools.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use race_core::{CheckpointHistoryEntry, ProgressSummary, RaceState, Standing};

use crate::api::{Result, RuntimeError};

/// Output encoding of a report.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Everything a report shows, in render-independent form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceReport {
    pub generated_at: DateTime<Utc>,
    pub progress: ProgressSummary,
    pub standings: Vec<Standing>,
    /// Scored checkpoints, oldest first.
    pub checkpoints: Vec<CheckpointHistoryEntry>,
}

/// Builds reports from a race state.
pub struct ReportGenerator<'a> {
    state: &'a RaceState,
}

impl<'a> ReportGenerator<'a> {
    pub fn new(state: &'a RaceState) -> Self {
        Self { state }
    }

    pub fn build(&self) -> RaceReport {
        RaceReport {
            generated_at: Utc::now(),
            progress: self.state.progress_summary(),
            standings: self.state.leaderboard(),
            checkpoints: self.state.history.iter().cloned().collect(),
        }
    }

    pub fn render(&self, format: ReportFormat) -> Result<String> {
        let report = self.build();
        match format {
            ReportFormat::Text => Ok(report.to_string()),
            ReportFormat::Json => {
                serde_json::to_string_pretty(&report).map_err(RuntimeError::Report)
            }
        }
    }
}

impl fmt::Display for RaceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let progress = &self.progress;
        writeln!(f, "Points race report ({})", self.generated_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
        writeln!(
            f,
            "Laps: {} ({}), remaining: {}, state: {}",
            progress.total_laps, progress.points_frequency, progress.laps_remaining, progress.phase
        )?;

        writeln!(f)?;
        writeln!(f, "Standings")?;
        writeln!(f, "{:>4}  {:>8}  {:<12}  {:>6}", "Rank", "Athlete", "Status", "Points")?;
        if self.standings.is_empty() {
            writeln!(f, "  (no athletes)")?;
        }
        for standing in &self.standings {
            let athlete = &standing.athlete;
            writeln!(
                f,
                "{:>4}  {:>8}  {:<12}  {:>6}",
                standing.rank,
                athlete.number.to_string(),
                athlete.status.as_ref(),
                athlete.points
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Checkpoints")?;
        if self.checkpoints.is_empty() {
            writeln!(f, "  (none scored)")?;
        }
        for entry in &self.checkpoints {
            let assignments = entry
                .athletes
                .iter()
                .map(|a| format!("{} +{}", a.athlete, a.points))
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(
                f,
                "  #{:<3} laps before: {:<3} {}",
                entry.number, entry.laps_before_decrement, assignments
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use race_core::{AthleteNumber, AthleteStatus, PointsFrequency, RaceConfig, RaceEngine};

    fn athlete(n: u32) -> AthleteNumber {
        AthleteNumber::new(n).unwrap()
    }

    fn scored_race() -> RaceState {
        let mut state = RaceState::new(RaceConfig::new(2, PointsFrequency::EveryLap));
        let mut engine = RaceEngine::new(&mut state);
        engine.start_race().unwrap();
        engine.assign_points(athlete(10), 2).unwrap();
        engine.assign_points(athlete(11), 1).unwrap();
        engine.assign_points(athlete(11), 3).unwrap();
        engine
            .set_status(athlete(12), AthleteStatus::Disqualified)
            .unwrap();
        state
    }

    #[test]
    fn text_report_lists_standings_and_checkpoints() {
        let state = scored_race();
        let text = ReportGenerator::new(&state)
            .render(ReportFormat::Text)
            .unwrap();

        assert!(text.contains("Laps: 2 (every_lap), remaining: 1, state: running"));
        assert!(text.contains("#11"));
        assert!(text.contains("disqualified"));
        assert!(text.contains("#10 +2, #11 +1"));
        assert!(text.contains("#11 +3"));

        let eleven = text.find("     #11").unwrap();
        let ten = text.find("     #10").unwrap();
        assert!(eleven < ten, "leader listed first:\n{text}");
    }

    #[test]
    fn json_report_carries_same_content() {
        let state = scored_race();
        let json = ReportGenerator::new(&state)
            .render(ReportFormat::Json)
            .unwrap();
        let report: RaceReport = serde_json::from_str(&json).unwrap();

        assert_eq!(report.standings, state.leaderboard());
        assert_eq!(report.checkpoints.len(), 2);
        assert_eq!(report.progress, state.progress_summary());
    }

    #[test]
    fn empty_race_renders_placeholders() {
        let state = RaceState::default();
        let text = ReportGenerator::new(&state)
            .render(ReportFormat::Text)
            .unwrap();
        assert!(text.contains("(no athletes)"));
        assert!(text.contains("(none scored)"));
    }
}
