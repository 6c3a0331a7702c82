//! Turns runtime events into operator messages.
use race_core::PointPool;
use race_runtime::RaceEvent;

/// One-line description of an event, or `None` if it is not shown.
pub fn describe(event: &RaceEvent) -> Option<String> {
    let text = match event {
        RaceEvent::RaceConfigured { config } => format!(
            "race configured: {} laps, points {}",
            config.total_laps, config.points_frequency
        ),
        RaceEvent::RaceStarted {
            checkpoint,
            available,
        } => format!(
            "race started; checkpoint {} open, points available: {}",
            checkpoint,
            pool(*available)
        ),
        RaceEvent::RaceResumed {
            checkpoint,
            laps_remaining,
        } => format!(
            "resumed saved race at checkpoint {}, {} laps remaining",
            checkpoint, laps_remaining
        ),
        RaceEvent::PointsAssigned {
            checkpoint,
            assignment,
            total,
        } => format!(
            "checkpoint {}: {} +{} (total {})",
            checkpoint, assignment.athlete, assignment.points, total
        ),
        RaceEvent::CheckpointCompleted {
            number,
            laps_remaining,
        } => format!(
            "checkpoint {} complete, {} laps remaining",
            number, laps_remaining
        ),
        RaceEvent::CheckpointOpened { number, available } => format!(
            "checkpoint {} open, points available: {}",
            number,
            pool(*available)
        ),
        RaceEvent::RaceFinishable => "all laps scored; type `end` to finish the race".to_owned(),
        RaceEvent::StatusChanged(change) => format!(
            "{}: {} -> {} ({} points)",
            change.athlete,
            change.from.as_ref(),
            change.to.as_ref(),
            change.points
        ),
        RaceEvent::PointsModified { athlete, points } => {
            format!("{} now has {} points", athlete, points)
        }
        RaceEvent::CheckpointUndone {
            checkpoint,
            reverted,
            laps_remaining,
        } => format!(
            "checkpoint {} retracted ({} assignments), {} laps remaining",
            checkpoint,
            reverted.len(),
            laps_remaining
        ),
        RaceEvent::RaceEnded => "race ended".to_owned(),
        RaceEvent::RaceReset => "race reset".to_owned(),
        RaceEvent::CommandRejected { .. } => return None,
    };
    Some(text)
}

fn pool(available: PointPool) -> String {
    let values: Vec<String> = available.values().map(|v| v.to_string()).collect();
    if values.is_empty() {
        "none".to_owned()
    } else {
        values.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use race_core::{Assignment, AthleteNumber};

    #[test]
    fn describes_scoring_events() {
        let event = RaceEvent::PointsAssigned {
            checkpoint: 3,
            assignment: Assignment::new(AthleteNumber::new(21).unwrap(), 2),
            total: 9,
        };
        assert_eq!(
            describe(&event).as_deref(),
            Some("checkpoint 3: #21 +2 (total 9)")
        );

        let opened = RaceEvent::CheckpointOpened {
            number: 5,
            available: PointPool::FINAL,
        };
        assert_eq!(
            describe(&opened).as_deref(),
            Some("checkpoint 5 open, points available: 3, 2, 1")
        );
    }

    #[test]
    fn rejections_are_not_repeated() {
        let event = RaceEvent::CommandRejected {
            command: "end_race".into(),
            code: "RACE_ENDED".into(),
            message: "race has ended".into(),
        };
        assert_eq!(describe(&event), None);
    }
}
