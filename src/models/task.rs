//! Schedulable session tasks.
//!
//! A [`SessionTask`] is the atomic unit of placement: one lecture, one half
//! of a split lecture, or one lab, derived from a class offering by the
//! decomposer. Tasks are constructed fresh per solve invocation and never
//! persisted.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::room::RoomKind;
use super::time::{TimeGrid, Weekday};

/// The kind of session a task represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionType {
    /// Lecture session.
    Lecture,
    /// Laboratory session.
    Lab,
}

impl SessionType {
    /// Whether a room of `kind` is the matching kind for this session.
    #[inline]
    pub fn matches(&self, kind: RoomKind) -> bool {
        matches!(
            (self, kind),
            (SessionType::Lecture, RoomKind::Lecture) | (SessionType::Lab, RoomKind::Lab)
        )
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SessionType::Lecture => "Lecture",
            SessionType::Lab => "Lab",
        })
    }
}

/// Which half of a split lecture a task is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SplitHalf {
    /// First half.
    First,
    /// Second half.
    Second,
}

impl SplitHalf {
    /// The other half of the same split lecture.
    pub fn sibling(&self) -> SplitHalf {
        match self {
            SplitHalf::First => SplitHalf::Second,
            SplitHalf::Second => SplitHalf::First,
        }
    }

    /// 1-based index used in the task key.
    pub fn index(&self) -> u8 {
        match self {
            SplitHalf::First => 1,
            SplitHalf::Second => 2,
        }
    }
}

/// An atomic schedulable session.
///
/// Carries everything the solvers need: the denormalized class attributes
/// used by the constraint checks, the duration in slots, and the ordered
/// candidate room list and candidate day set that form the placement domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTask {
    /// Parent class offering.
    pub class_id: u32,
    /// Subject code of the parent class (for failure reporting).
    pub subject_code: String,
    /// Lecture or lab.
    pub session: SessionType,
    /// Set when this task is one half of a split lecture.
    pub split: Option<SplitHalf>,
    /// Instructor teaching the parent class, if assigned.
    pub instructor_id: Option<u32>,
    /// Student block attending the parent class.
    pub block_id: u32,
    /// Priority room from the class's room preference, if any.
    pub preferred_room: Option<u32>,
    /// Session length in minutes.
    pub duration_min: u32,
    /// Contiguous grid slots this session occupies.
    pub slots_needed: usize,
    /// Eligible rooms, best candidates first.
    pub candidate_rooms: Vec<u32>,
    /// Eligible days.
    pub candidate_days: Vec<Weekday>,
}

impl SessionTask {
    /// Creates a task with an empty placement domain.
    pub fn new(class_id: u32, session: SessionType, duration_min: u32, slots_needed: usize) -> Self {
        Self {
            class_id,
            subject_code: String::new(),
            session,
            split: None,
            instructor_id: None,
            block_id: 0,
            preferred_room: None,
            duration_min,
            slots_needed,
            candidate_rooms: Vec::new(),
            candidate_days: Vec::new(),
        }
    }

    /// Sets the subject code.
    pub fn with_subject(mut self, code: impl Into<String>) -> Self {
        self.subject_code = code.into();
        self
    }

    /// Marks this task as one half of a split lecture.
    pub fn with_split(mut self, half: SplitHalf) -> Self {
        self.split = Some(half);
        self
    }

    /// Sets the instructor.
    pub fn with_instructor(mut self, instructor_id: u32) -> Self {
        self.instructor_id = Some(instructor_id);
        self
    }

    /// Sets the student block.
    pub fn with_block(mut self, block_id: u32) -> Self {
        self.block_id = block_id;
        self
    }

    /// Sets the priority room.
    pub fn with_preferred_room(mut self, room_id: u32) -> Self {
        self.preferred_room = Some(room_id);
        self
    }

    /// Sets the candidate rooms (best first).
    pub fn with_rooms(mut self, rooms: Vec<u32>) -> Self {
        self.candidate_rooms = rooms;
        self
    }

    /// Sets the candidate days.
    pub fn with_days(mut self, days: Vec<Weekday>) -> Self {
        self.candidate_days = days;
        self
    }

    /// Stable task key: `"<class>_<session>"` plus a split index
    /// (e.g. `"41_Lecture_1"`, `"41_Lab"`).
    pub fn key(&self) -> String {
        match self.split {
            Some(half) => format!("{}_{}_{}", self.class_id, self.session, half.index()),
            None => format!("{}_{}", self.class_id, self.session),
        }
    }

    /// Display label used in failure reports: `"<subject> (<session>)"`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.subject_code, self.session)
    }

    /// Whether `other` is the opposite half of the same split lecture.
    pub fn is_sibling_of(&self, other: &SessionTask) -> bool {
        self.class_id == other.class_id
            && matches!(
                (self.split, other.split),
                (Some(a), Some(b)) if a.sibling() == b
            )
    }

    /// Why this task cannot be placed at all, if its domain is empty.
    ///
    /// Checked up front by the solvers so one impossible task does not
    /// poison the search for the rest.
    pub fn unschedulable_reason(&self, grid: &TimeGrid) -> Option<&'static str> {
        if self.candidate_rooms.is_empty() {
            Some("No eligible room after capacity/type filtering.")
        } else if self.candidate_days.is_empty() {
            Some("No eligible day after exclusions.")
        } else if grid.max_start_index(self.slots_needed).is_none() {
            Some("Session does not fit within the daily time grid.")
        } else {
            None
        }
    }
}
