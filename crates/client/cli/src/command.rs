//! Operator input parsing.
//!
//! Lines are parsed into [`CliCommand`]s before anything reaches the runtime,
//! so malformed input is reported without touching the race.
use std::path::PathBuf;

use race_core::{
    AthleteNumber, AthleteStatus, InputError, PointsFrequency, RaceCommand, RaceConfig,
};
use race_runtime::ReportFormat;
use thiserror::Error;

/// One line of operator input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CliCommand {
    Race(RaceCommand),
    Board,
    Status,
    Report {
        format: ReportFormat,
        path: Option<PathBuf>,
    },
    Reset,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command `{0}` (type `help`)")]
    UnknownCommand(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("`{value}` is not a valid {what}")]
    InvalidValue { what: &'static str, value: String },

    #[error(transparent)]
    Input(#[from] InputError),
}

pub const HELP: &str = "\
Commands:
  config [laps] [every_lap|every_two_laps]   set up the race (before start)
  start                                      start the race
  assign <athlete> <points>                  award points at the open checkpoint
  lap <athlete>                              mark athlete as lapped
  unlap <athlete>                            return lapped athlete to the race
  dq <athlete>                               disqualify athlete
  reinstate <athlete>                        reinstate disqualified athlete
  adjust <athlete> <delta>                   correct an athlete's points
  undo                                       retract the last scored checkpoint
  end                                        end the race
  board                                      show the leaderboard
  status                                     show race and checkpoint status
  report [json] [path]                       print or write a report
  reset                                      discard the race and start over
  help                                       show this text
  quit                                       leave (the race is kept)";

/// Parses one input line. `defaults` fills in omitted `config` arguments.
///
/// Returns `Ok(None)` for blank lines.
pub fn parse(line: &str, defaults: RaceConfig) -> Result<Option<CliCommand>, ParseError> {
    let mut words = line.split_whitespace();
    let Some(keyword) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match keyword.to_ascii_lowercase().as_str() {
        "config" => {
            let total_laps = match args.first() {
                Some(raw) => parse_value(raw, "lap count")?,
                None => defaults.total_laps,
            };
            let points_frequency = match args.get(1) {
                Some(raw) => parse_value::<PointsFrequency>(raw, "points frequency")?,
                None => defaults.points_frequency,
            };
            expect_at_most(&args, 2, "config [laps] [every_lap|every_two_laps]")?;
            race(RaceCommand::Configure {
                config: RaceConfig::new(total_laps, points_frequency),
            })
        }
        "start" => {
            expect_at_most(&args, 0, "start")?;
            race(RaceCommand::StartRace)
        }
        "assign" => {
            let [athlete, points] = exact::<2>(&args, "assign <athlete> <points>")?;
            race(RaceCommand::AssignPoints {
                athlete: parse_athlete(athlete)?,
                points: parse_value(points, "point value")?,
            })
        }
        "lap" => status(&args, AthleteStatus::Lapped, "lap <athlete>")?,
        "unlap" => status(&args, AthleteStatus::Normal, "unlap <athlete>")?,
        "dq" | "disqualify" => status(&args, AthleteStatus::Disqualified, "dq <athlete>")?,
        "reinstate" => status(&args, AthleteStatus::Normal, "reinstate <athlete>")?,
        "adjust" => {
            let [athlete, delta] = exact::<2>(&args, "adjust <athlete> <delta>")?;
            race(RaceCommand::ModifyPoints {
                athlete: parse_athlete(athlete)?,
                delta: parse_value(delta.trim_start_matches('+'), "point delta")?,
            })
        }
        "undo" => {
            expect_at_most(&args, 0, "undo")?;
            race(RaceCommand::UndoLastCheckpoint)
        }
        "end" => {
            expect_at_most(&args, 0, "end")?;
            race(RaceCommand::EndRace)
        }
        "board" | "leaderboard" => CliCommand::Board,
        "status" => CliCommand::Status,
        "report" => parse_report(&args)?,
        "reset" => CliCommand::Reset,
        "help" | "?" => CliCommand::Help,
        "quit" | "exit" => CliCommand::Quit,
        other => return Err(ParseError::UnknownCommand(other.to_owned())),
    };

    Ok(Some(command))
}

fn race(command: RaceCommand) -> CliCommand {
    CliCommand::Race(command)
}

fn status(
    args: &[&str],
    status: AthleteStatus,
    usage: &'static str,
) -> Result<CliCommand, ParseError> {
    let [athlete] = exact::<1>(args, usage)?;
    Ok(race(RaceCommand::SetStatus {
        athlete: parse_athlete(athlete)?,
        status,
    }))
}

fn parse_report(args: &[&str]) -> Result<CliCommand, ParseError> {
    let mut rest = args;
    let mut format = ReportFormat::Text;
    if let Some((first, tail)) = rest.split_first() {
        if let Ok(parsed) = first.parse::<ReportFormat>() {
            format = parsed;
            rest = tail;
        }
    }
    expect_at_most(rest, 1, "report [json] [path]")?;
    Ok(CliCommand::Report {
        format,
        path: rest.first().map(PathBuf::from),
    })
}

fn parse_athlete(raw: &str) -> Result<AthleteNumber, ParseError> {
    let raw = raw.trim_start_matches('#');
    let number: i64 = parse_value(raw, "athlete number")?;
    Ok(AthleteNumber::try_from(number)?)
}

fn parse_value<T: std::str::FromStr>(raw: &str, what: &'static str) -> Result<T, ParseError> {
    raw.parse().map_err(|_| ParseError::InvalidValue {
        what,
        value: raw.to_owned(),
    })
}

fn exact<'a, const N: usize>(
    args: &[&'a str],
    usage: &'static str,
) -> Result<[&'a str; N], ParseError> {
    <[&str; N]>::try_from(args).map_err(|_| ParseError::Usage(usage))
}

fn expect_at_most(args: &[&str], max: usize, usage: &'static str) -> Result<(), ParseError> {
    if args.len() > max {
        return Err(ParseError::Usage(usage));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> RaceConfig {
        RaceConfig::new(10, PointsFrequency::EveryTwoLaps)
    }

    fn parse_ok(line: &str) -> CliCommand {
        parse(line, defaults()).unwrap().unwrap()
    }

    fn athlete(n: u32) -> AthleteNumber {
        AthleteNumber::new(n).unwrap()
    }

    #[test]
    fn parses_race_commands() {
        assert_eq!(
            parse_ok("assign 12 3"),
            CliCommand::Race(RaceCommand::AssignPoints {
                athlete: athlete(12),
                points: 3
            })
        );
        assert_eq!(
            parse_ok("  DQ #7 "),
            CliCommand::Race(RaceCommand::SetStatus {
                athlete: athlete(7),
                status: AthleteStatus::Disqualified
            })
        );
        assert_eq!(
            parse_ok("adjust 4 -3"),
            CliCommand::Race(RaceCommand::ModifyPoints {
                athlete: athlete(4),
                delta: -3
            })
        );
        assert_eq!(
            parse_ok("adjust 4 +2"),
            CliCommand::Race(RaceCommand::ModifyPoints {
                athlete: athlete(4),
                delta: 2
            })
        );
        assert_eq!(parse_ok("undo"), CliCommand::Race(RaceCommand::UndoLastCheckpoint));
    }

    #[test]
    fn config_falls_back_to_defaults() {
        assert_eq!(
            parse_ok("config"),
            CliCommand::Race(RaceCommand::Configure { config: defaults() })
        );
        assert_eq!(
            parse_ok("config 5 every_lap"),
            CliCommand::Race(RaceCommand::Configure {
                config: RaceConfig::new(5, PointsFrequency::EveryLap)
            })
        );
        assert_eq!(
            parse_ok("config 6"),
            CliCommand::Race(RaceCommand::Configure {
                config: RaceConfig::new(6, PointsFrequency::EveryTwoLaps)
            })
        );
    }

    #[test]
    fn report_arguments() {
        assert_eq!(
            parse_ok("report"),
            CliCommand::Report {
                format: ReportFormat::Text,
                path: None
            }
        );
        assert_eq!(
            parse_ok("report json out.json"),
            CliCommand::Report {
                format: ReportFormat::Json,
                path: Some(PathBuf::from("out.json"))
            }
        );
        assert_eq!(
            parse_ok("report results.txt"),
            CliCommand::Report {
                format: ReportFormat::Text,
                path: Some(PathBuf::from("results.txt"))
            }
        );
    }

    #[test]
    fn blank_line_is_nothing() {
        assert_eq!(parse("   ", defaults()), Ok(None));
    }

    #[test]
    fn malformed_input_is_reported() {
        assert_eq!(
            parse("assign 0 2", defaults()),
            Err(ParseError::Input(InputError::AthleteNumberNotPositive))
        );
        assert_eq!(
            parse("assign -4 2", defaults()),
            Err(ParseError::Input(InputError::AthleteNumberNotPositive))
        );
        assert!(matches!(
            parse("assign 4", defaults()),
            Err(ParseError::Usage(_))
        ));
        assert!(matches!(
            parse("assign x 1", defaults()),
            Err(ParseError::InvalidValue { what: "athlete number", .. })
        ));
        assert!(matches!(
            parse("config 4 sometimes", defaults()),
            Err(ParseError::InvalidValue { what: "points frequency", .. })
        ));
        assert_eq!(
            parse("sprint", defaults()),
            Err(ParseError::UnknownCommand("sprint".into()))
        );
    }
}
