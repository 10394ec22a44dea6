//! Schedule output model.
//!
//! A solve invocation produces a [`SolverResult`]: the accepted
//! [`ScheduleEntry`] records plus a failure report for every session that
//! could not be placed. An unsolvable or partially solvable problem is not
//! an error; it is `success = false` with a populated failure list.

use serde::{Deserialize, Serialize};

use super::task::{SessionTask, SessionType};
use super::time::{TimeGrid, TimeOfDay, Weekday};

/// A solver-internal placement: room, day, and start-slot index.
///
/// The time range is derived from the grid and the task's duration when the
/// placement is realized into a [`ScheduleEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Assigned room.
    pub room_id: u32,
    /// Assigned day.
    pub day: Weekday,
    /// Index of the first occupied grid slot.
    pub start_slot: usize,
}

/// One scheduled session: the unit of output.
///
/// Each task yields exactly one entry spanning its `slots_needed`
/// consecutive grid slots; `end_time - start_time` is the session duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Parent class offering.
    pub class_id: u32,
    /// Assigned room.
    pub room_id: u32,
    /// Assigned day.
    #[serde(rename = "day_of_week")]
    pub day: Weekday,
    /// Session start.
    pub start_time: TimeOfDay,
    /// Session end (exclusive).
    pub end_time: TimeOfDay,
    /// Lecture or lab.
    #[serde(rename = "course_type")]
    pub session: SessionType,
}

impl ScheduleEntry {
    /// Realizes a placement into an output entry.
    ///
    /// Returns `None` when the start slot is outside the grid.
    pub fn from_placement(
        task: &SessionTask,
        placement: Placement,
        grid: &TimeGrid,
    ) -> Option<Self> {
        let start_time = grid.slot(placement.start_slot)?;
        Some(Self {
            class_id: task.class_id,
            room_id: placement.room_id,
            day: placement.day,
            start_time,
            end_time: start_time.plus_minutes(task.duration_min),
            session: task.session,
        })
    }

    /// Session length in minutes.
    #[inline]
    pub fn duration_min(&self) -> u32 {
        (self.end_time.minutes() - self.start_time.minutes()) as u32
    }

    /// Whether two entries occupy intersecting time ranges on the same day.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.day == other.day
            && self.start_time < other.end_time
            && other.start_time < self.end_time
    }
}

/// A session that could not be placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedSession {
    /// Display label (subject code and session type).
    pub class: String,
    /// Why placement failed.
    pub reason: String,
}

impl FailedSession {
    /// Creates a failure record.
    pub fn new(class: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            reason: reason.into(),
        }
    }
}

/// The outcome of one solve invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolverResult {
    /// True iff every task was placed.
    pub success: bool,
    /// Accepted entries.
    pub scheduled: Vec<ScheduleEntry>,
    /// Sessions that could not be placed, with reasons.
    pub failed: Vec<FailedSession>,
}

impl SolverResult {
    /// Builds a result; `success` is derived from the failure list.
    pub fn new(scheduled: Vec<ScheduleEntry>, failed: Vec<FailedSession>) -> Self {
        Self {
            success: failed.is_empty(),
            scheduled,
            failed,
        }
    }

    /// Number of accepted entries.
    pub fn scheduled_count(&self) -> usize {
        self.scheduled.len()
    }

    /// Entries for a given class offering.
    pub fn entries_for_class(&self, class_id: u32) -> Vec<&ScheduleEntry> {
        self.scheduled
            .iter()
            .filter(|e| e.class_id == class_id)
            .collect()
    }

    /// Entries in a given room.
    pub fn entries_for_room(&self, room_id: u32) -> Vec<&ScheduleEntry> {
        self.scheduled
            .iter()
            .filter(|e| e.room_id == room_id)
            .collect()
    }

    /// Entries on a given day.
    pub fn entries_for_day(&self, day: Weekday) -> Vec<&ScheduleEntry> {
        self.scheduled.iter().filter(|e| e.day == day).collect()
    }
}
