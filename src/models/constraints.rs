//! Solver constraint configuration.
//!
//! Toggles for the hard-constraint checks plus the day exclusions and the
//! optional daily break window. Defaults enforce everything, which matches
//! how the surrounding application submits the generator form.

use serde::{Deserialize, Serialize};

use super::time::{BreakWindow, Weekday};

/// How room kind is matched against session type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomTypeRule {
    /// Mismatched rooms are excluded from the candidate set.
    Strict,
    /// Mismatched rooms are allowed but penalized in scoring.
    Soft,
    /// Room kind is ignored.
    None,
}

/// Hard/soft constraint configuration for a solve invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConstraints {
    /// Require room capacity >= estimated students.
    pub enforce_capacity: bool,
    /// Room kind matching policy.
    pub room_type: RoomTypeRule,
    /// Forbid overlapping sessions for the same instructor.
    pub enforce_instructor: bool,
    /// Forbid overlapping sessions for the same student block.
    pub enforce_block: bool,
    /// Days removed from the default teaching week.
    #[serde(default)]
    pub excluded_days: Vec<Weekday>,
    /// Daily window during which nothing may be scheduled.
    #[serde(default)]
    pub break_time: Option<BreakWindow>,
}

impl Default for SolverConstraints {
    fn default() -> Self {
        Self {
            enforce_capacity: true,
            room_type: RoomTypeRule::Strict,
            enforce_instructor: true,
            enforce_block: true,
            excluded_days: Vec::new(),
            break_time: None,
        }
    }
}

impl SolverConstraints {
    /// Creates the default (fully enforcing) configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets capacity enforcement.
    pub fn with_capacity(mut self, enforce: bool) -> Self {
        self.enforce_capacity = enforce;
        self
    }

    /// Sets the room-kind matching policy.
    pub fn with_room_type(mut self, rule: RoomTypeRule) -> Self {
        self.room_type = rule;
        self
    }

    /// Sets instructor-overlap enforcement.
    pub fn with_instructor(mut self, enforce: bool) -> Self {
        self.enforce_instructor = enforce;
        self
    }

    /// Sets block-overlap enforcement.
    pub fn with_block(mut self, enforce: bool) -> Self {
        self.enforce_block = enforce;
        self
    }

    /// Excludes days from the teaching week.
    pub fn with_excluded_days(mut self, days: impl IntoIterator<Item = Weekday>) -> Self {
        self.excluded_days = days.into_iter().collect();
        self
    }

    /// Sets the daily break window.
    pub fn with_break_time(mut self, window: BreakWindow) -> Self {
        self.break_time = Some(window);
        self
    }

    /// Whether a day is excluded.
    pub fn day_excluded(&self, day: Weekday) -> bool {
        self.excluded_days.contains(&day)
    }

    /// The teaching week minus excluded days.
    pub fn teaching_days(&self) -> Vec<Weekday> {
        Weekday::TEACHING_WEEK
            .into_iter()
            .filter(|d| !self.day_excluded(*d))
            .collect()
    }
}
