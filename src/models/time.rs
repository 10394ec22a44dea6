//! Days, times of day, and the slot grid.
//!
//! All times are minutes since midnight internally. The `"HH:MM"` string
//! form exists only at the external boundary (serde, `Display`, `FromStr`),
//! where it matches what the surrounding application stores.
//!
//! # Interval Semantics
//! Time ranges are half-open `[start, end)`: two ranges overlap iff
//! `s1 < e2 && s2 < e1`.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// The default teaching week (Monday through Friday).
    pub const TEACHING_WEEK: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    /// Full English name (e.g. `"Monday"`).
    pub fn name(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for unrecognized day names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDayError;

impl fmt::Display for ParseDayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("expected a full English day name (e.g. 'Monday')")
    }
}

impl std::error::Error for ParseDayError {}

impl FromStr for Weekday {
    type Err = ParseDayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let all = [
            Weekday::Monday,
            Weekday::Tuesday,
            Weekday::Wednesday,
            Weekday::Thursday,
            Weekday::Friday,
            Weekday::Saturday,
            Weekday::Sunday,
        ];
        all.into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s.trim()))
            .ok_or(ParseDayError)
    }
}

/// A time of day as minutes since midnight.
///
/// Parses `"HH:MM"` (a trailing `":SS"` is tolerated and discarded) and
/// displays as `"HH:MM"`. Comparison order is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Creates a time from an hour and minute.
    pub fn new(hour: u16, minute: u16) -> Self {
        Self(hour * 60 + minute.min(59))
    }

    /// Creates a time from minutes since midnight.
    pub const fn from_minutes(minutes: u16) -> Self {
        Self(minutes)
    }

    /// Minutes since midnight.
    #[inline]
    pub fn minutes(&self) -> u16 {
        self.0
    }

    /// Returns this time advanced by `minutes`, saturating.
    pub fn plus_minutes(self, minutes: u32) -> Self {
        let total = self.0 as u32 + minutes;
        Self(u16::try_from(total).unwrap_or(u16::MAX))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// Error for malformed `"HH:MM"` strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTimeError;

impl fmt::Display for ParseTimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("expected a time in HH:MM form")
    }
}

impl std::error::Error for ParseTimeError {}

impl FromStr for TimeOfDay {
    type Err = ParseTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split(':');
        let hour: u16 = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or(ParseTimeError)?;
        let minute: u16 = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or(ParseTimeError)?;
        if minute >= 60 {
            return Err(ParseTimeError);
        }
        Ok(Self(hour * 60 + minute))
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// A daily break window `[start, end)` during which nothing is scheduled.
///
/// The external form is the original `"HH:MM-HH:MM"` string
/// (e.g. `"12:00-13:00"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakWindow {
    /// Window start (inclusive).
    pub start: TimeOfDay,
    /// Window end (exclusive).
    pub end: TimeOfDay,
}

impl BreakWindow {
    /// Creates a break window.
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { start, end }
    }

    /// Whether a time falls inside the window.
    #[inline]
    pub fn contains(&self, time: TimeOfDay) -> bool {
        self.start <= time && time < self.end
    }

    /// Whether the half-open range `[start, end)` intersects the window.
    #[inline]
    pub fn overlaps(&self, start: TimeOfDay, end: TimeOfDay) -> bool {
        start < self.end && self.start < end
    }
}

impl fmt::Display for BreakWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl FromStr for BreakWindow {
    type Err = ParseTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s.trim().split_once('-').ok_or(ParseTimeError)?;
        Ok(Self {
            start: start.parse()?,
            end: end.parse()?,
        })
    }
}

impl Serialize for BreakWindow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BreakWindow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// The discretized daily grid of slot-start times.
///
/// Slot starts are ordered, deduplicated, and evenly spaced at
/// `slot_minutes` granularity. The same grid applies to every teaching day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeGrid {
    slots: Vec<TimeOfDay>,
    slot_minutes: u32,
}

impl TimeGrid {
    /// Generates slot starts covering `[start, end)` at `slot_minutes`
    /// granularity, skipping starts that land inside `break_window`.
    ///
    /// Returns an empty grid when `start >= end` or `slot_minutes == 0`.
    pub fn generate(
        start: TimeOfDay,
        end: TimeOfDay,
        slot_minutes: u32,
        break_window: Option<&BreakWindow>,
    ) -> Self {
        let mut slots = Vec::new();
        if slot_minutes > 0 {
            let mut current = start;
            while current < end {
                let excluded = break_window.is_some_and(|bw| bw.contains(current));
                if !excluded {
                    slots.push(current);
                }
                current = current.plus_minutes(slot_minutes);
            }
        }
        Self {
            slots,
            slot_minutes,
        }
    }

    /// Builds a grid from an explicit slot list.
    ///
    /// Slots are sorted and deduplicated to uphold the grid invariant.
    pub fn from_slots(mut slots: Vec<TimeOfDay>, slot_minutes: u32) -> Self {
        slots.sort();
        slots.dedup();
        Self {
            slots,
            slot_minutes,
        }
    }

    /// Slot length in minutes.
    #[inline]
    pub fn slot_minutes(&self) -> u32 {
        self.slot_minutes
    }

    /// Number of slots per day.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the grid has no slots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The slot-start time at `index`.
    #[inline]
    pub fn slot(&self, index: usize) -> Option<TimeOfDay> {
        self.slots.get(index).copied()
    }

    /// All slot starts, in order.
    #[inline]
    pub fn slots(&self) -> &[TimeOfDay] {
        &self.slots
    }

    /// Index of an exact slot-start time, if present.
    pub fn index_of(&self, time: TimeOfDay) -> Option<usize> {
        self.slots.binary_search(&time).ok()
    }

    /// Latest start index from which `slots_needed` contiguous slots fit,
    /// or `None` when the grid is too short.
    pub fn max_start_index(&self, slots_needed: usize) -> Option<usize> {
        self.slots.len().checked_sub(slots_needed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_roundtrip() {
        for day in Weekday::TEACHING_WEEK {
            let parsed: Weekday = day.name().parse().unwrap();
            assert_eq!(parsed, day);
        }
        assert_eq!("monday".parse::<Weekday>(), Ok(Weekday::Monday));
        assert!("Mon".parse::<Weekday>().is_err());
    }

    #[test]
    fn test_time_parse_and_display() {
        let t: TimeOfDay = "08:30".parse().unwrap();
        assert_eq!(t.minutes(), 510);
        assert_eq!(t.to_string(), "08:30");

        // Trailing seconds are tolerated (database TIME columns).
        let t2: TimeOfDay = "13:00:00".parse().unwrap();
        assert_eq!(t2, TimeOfDay::new(13, 0));

        assert!("8".parse::<TimeOfDay>().is_err());
        assert!("08:75".parse::<TimeOfDay>().is_err());
    }

    #[test]
    fn test_time_arithmetic() {
        let t = TimeOfDay::new(8, 0);
        assert_eq!(t.plus_minutes(90), TimeOfDay::new(9, 30));
        assert_eq!(t.plus_minutes(90).to_string(), "09:30");
    }

    #[test]
    fn test_time_serde_as_string() {
        let t = TimeOfDay::new(9, 5);
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "\"09:05\"");
        let back: TimeOfDay = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn test_break_window_parse() {
        let bw: BreakWindow = "12:00-13:00".parse().unwrap();
        assert!(bw.contains(TimeOfDay::new(12, 0)));
        assert!(bw.contains(TimeOfDay::new(12, 59)));
        assert!(!bw.contains(TimeOfDay::new(13, 0))); // exclusive end
        assert_eq!(bw.to_string(), "12:00-13:00");
    }

    #[test]
    fn test_break_window_overlap_half_open() {
        let bw: BreakWindow = "12:00-13:00".parse().unwrap();
        assert!(bw.overlaps(TimeOfDay::new(11, 30), TimeOfDay::new(12, 30)));
        // Touching boundaries do not overlap.
        assert!(!bw.overlaps(TimeOfDay::new(11, 0), TimeOfDay::new(12, 0)));
        assert!(!bw.overlaps(TimeOfDay::new(13, 0), TimeOfDay::new(14, 0)));
    }

    #[test]
    fn test_grid_generate() {
        let grid = TimeGrid::generate(TimeOfDay::new(8, 0), TimeOfDay::new(11, 30), 30, None);
        assert_eq!(grid.len(), 7);
        assert_eq!(grid.slot(0), Some(TimeOfDay::new(8, 0)));
        assert_eq!(grid.slot(6), Some(TimeOfDay::new(11, 0)));
        assert_eq!(grid.index_of(TimeOfDay::new(9, 30)), Some(3));
        assert_eq!(grid.index_of(TimeOfDay::new(9, 15)), None);
    }

    #[test]
    fn test_grid_generate_skips_break() {
        let bw: BreakWindow = "12:00-13:00".parse().unwrap();
        let grid = TimeGrid::generate(
            TimeOfDay::new(11, 0),
            TimeOfDay::new(14, 0),
            30,
            Some(&bw),
        );
        // 11:00 11:30 [12:00 12:30 skipped] 13:00 13:30
        let labels: Vec<String> = grid.slots().iter().map(|s| s.to_string()).collect();
        assert_eq!(labels, vec!["11:00", "11:30", "13:00", "13:30"]);
    }

    #[test]
    fn test_grid_degenerate_inputs() {
        let empty = TimeGrid::generate(TimeOfDay::new(10, 0), TimeOfDay::new(8, 0), 30, None);
        assert!(empty.is_empty());
        let zero = TimeGrid::generate(TimeOfDay::new(8, 0), TimeOfDay::new(10, 0), 0, None);
        assert!(zero.is_empty());
    }

    #[test]
    fn test_grid_from_slots_sorts_and_dedups() {
        let grid = TimeGrid::from_slots(
            vec![
                TimeOfDay::new(9, 0),
                TimeOfDay::new(8, 0),
                TimeOfDay::new(9, 0),
            ],
            60,
        );
        assert_eq!(grid.len(), 2);
        assert_eq!(grid.slot(0), Some(TimeOfDay::new(8, 0)));
    }

    #[test]
    fn test_max_start_index() {
        let grid = TimeGrid::generate(TimeOfDay::new(8, 0), TimeOfDay::new(10, 0), 30, None);
        assert_eq!(grid.len(), 4);
        assert_eq!(grid.max_start_index(3), Some(1));
        assert_eq!(grid.max_start_index(4), Some(0));
        assert_eq!(grid.max_start_index(5), None);
    }
}
