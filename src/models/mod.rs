//! Timetabling domain models.
//!
//! Core data types for representing timetabling problems and solutions:
//! offerings and rooms on the input side, session tasks as the solver-facing
//! unit of work, and schedule entries on the output side.
//!
//! All types are serde-serializable so the surrounding application can
//! materialize inputs from storage and persist results; times and days use
//! their canonical string forms on the wire.

mod constraints;
mod offering;
mod room;
mod schedule;
mod task;
mod time;

pub use constraints::{RoomTypeRule, SolverConstraints};
pub use offering::{ClassOffering, DayList, RoomPreference};
pub use room::{Room, RoomKind};
pub use schedule::{FailedSession, Placement, ScheduleEntry, SolverResult};
pub use task::{SessionTask, SessionType, SplitHalf};
pub use time::{BreakWindow, ParseDayError, ParseTimeError, TimeGrid, TimeOfDay, Weekday};
