//! Progress Value Object
//!
//! Integer percentage of active lessons completed, rounded half-up.
//! The denominator is the active-lesson count at computation time.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Progress(u8);

impl Progress {
    pub const ZERO: Progress = Progress(0);
    pub const COMPLETE: Progress = Progress(100);

    /// `round_half_up(100 * completed / total)`, or 0 when `total == 0`
    pub fn compute(completed: u64, total: u64) -> Self {
        if total == 0 {
            return Self::ZERO;
        }
        let completed = completed.min(total);
        // floor(100c/t + 1/2) == floor((200c + t) / 2t)
        let percent = (200 * completed + total) / (2 * total);
        Self(percent.min(100) as u8)
    }

    /// Restore a stored value, clamping anything out of range
    pub fn from_stored(value: i16) -> Self {
        Self(value.clamp(0, 100) as u8)
    }

    #[inline]
    pub const fn value(&self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_complete(&self) -> bool {
        self.0 >= 100
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Authoritative completion counts for one enrollment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    /// Completed lessons that are still active
    pub completed_active: u64,
    /// Active lessons in the course right now
    pub total_active: u64,
}

impl ProgressSnapshot {
    pub fn progress(&self) -> Progress {
        Progress::compute(self.completed_active, self.total_active)
    }
}
