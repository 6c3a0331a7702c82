//! The open scoring checkpoint and its point pool.

use arrayvec::ArrayVec;
use bitflags::bitflags;

use crate::config::RaceConfig;
use crate::state::AthleteNumber;

bitflags! {
    /// Point values that can still be handed out at a checkpoint.
    ///
    /// Each bit stands for one point value, so a pool is at most `{3, 2, 1}`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct PointPool: u8 {
        const ONE   = 1 << 0;
        const TWO   = 1 << 1;
        const THREE = 1 << 2;
    }
}

impl PointPool {
    /// Pool of every checkpoint except the last.
    pub const REGULAR: Self = Self::ONE.union(Self::TWO);
    /// Pool of the checkpoint that coincides with the finish.
    pub const FINAL: Self = Self::REGULAR.union(Self::THREE);

    pub const fn for_checkpoint(is_final: bool) -> Self {
        if is_final { Self::FINAL } else { Self::REGULAR }
    }

    /// Flag for a single point value; `None` outside `1..=3`.
    pub const fn from_value(points: u8) -> Option<Self> {
        match points {
            1 => Some(Self::ONE),
            2 => Some(Self::TWO),
            3 => Some(Self::THREE),
            _ => None,
        }
    }

    pub fn contains_value(self, points: u8) -> bool {
        Self::from_value(points).is_some_and(|flag| self.contains(flag))
    }

    /// Point values in the pool, highest first.
    pub fn values(self) -> impl Iterator<Item = u8> {
        (1..=RaceConfig::TOP_POINT_VALUE)
            .rev()
            .filter(move |points| self.contains_value(*points))
    }
}

/// One athlete scoring at a checkpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
    pub athlete: AthleteNumber,
    pub points: u8,
}

impl Assignment {
    pub fn new(athlete: AthleteNumber, points: u8) -> Self {
        Self { athlete, points }
    }
}

/// Assignments of one checkpoint in arrival order.
pub type Assignments = ArrayVec<Assignment, { RaceConfig::MAX_ASSIGNMENTS_PER_CHECKPOINT }>;

/// The single open checkpoint.
///
/// `available` is always the checkpoint's pool minus the points recorded in
/// `assigned`, and an athlete appears at most once in `assigned`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CheckpointState {
    /// 1-based checkpoint number; 0 before the race starts.
    pub number: u32,
    pub assigned: Assignments,
    pub available: PointPool,
}

impl CheckpointState {
    /// Opens checkpoint `number` with a fresh `pool`.
    pub fn open(&mut self, number: u32, pool: PointPool) {
        self.number = number;
        self.assigned.clear();
        self.available = pool;
    }

    pub fn has_athlete(&self, athlete: AthleteNumber) -> bool {
        self.assigned.iter().any(|a| a.athlete == athlete)
    }

    /// Hands `assignment.points` out of the pool and records the arrival.
    ///
    /// Callers validate availability and uniqueness first.
    pub(crate) fn record(&mut self, assignment: Assignment) {
        if let Some(flag) = PointPool::from_value(assignment.points) {
            self.available.remove(flag);
        }
        self.assigned.push(assignment);
    }

    /// A checkpoint completes exactly when its pool is exhausted.
    pub fn is_complete(&self) -> bool {
        self.available.is_empty()
    }

    /// Pool the checkpoint was opened with.
    pub fn pool(&self) -> PointPool {
        self.assigned
            .iter()
            .filter_map(|a| PointPool::from_value(a.points))
            .fold(self.available, |pool, flag| pool | flag)
    }
}

/// Read-only view of the open checkpoint for display.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CheckpointSummary {
    pub number: u32,
    pub available: PointPool,
    pub assigned: Assignments,
    pub is_final: bool,
}
