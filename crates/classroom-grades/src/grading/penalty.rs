use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Lateness cap: anything beyond three days costs the same 30%.
pub const MAX_PENALTY_DAYS: u8 = 3;

/// A lateness tier. `percent` is always `days * 10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Penalty {
    pub days: u8,
    pub percent: u8,
}

impl Penalty {
    pub fn none() -> Self {
        Self::from_days(0)
    }

    /// Builds a tier from a day count, e.g. from the per-repo override table.
    pub fn from_days(days: u8) -> Self {
        Self {
            days,
            percent: days * 10,
        }
    }

    /// Deterministic tier for a completion time against a deadline. Any
    /// positive lateness lands in at least tier 1, so a submission one second
    /// late already pays a full day's deduction; this cliff is intentional.
    pub fn assess(completed_at: NaiveDateTime, deadline: NaiveDateTime) -> Self {
        let delta_seconds = (completed_at - deadline).num_seconds();
        if delta_seconds <= 0 {
            return Self::none();
        }

        let days = (delta_seconds / 86_400) + 1;
        Self::from_days(days.min(i64::from(MAX_PENALTY_DAYS)) as u8)
    }

    /// Score after deduction.
    pub fn apply(&self, earned_points: u32) -> f64 {
        f64::from(earned_points) * f64::from(100 - u32::min(u32::from(self.percent), 100)) / 100.0
    }
}
