//! Worker tasks that back the runtime orchestration.
//!
//! The race worker is the only owner of the race state; every read and write
//! goes through its command channel.

mod race;

pub use race::{Command, RaceWorker};
