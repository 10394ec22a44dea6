//! Timetable quality metrics.
//!
//! Derives standard indicators from a solver result so callers can compare
//! solver runs or configurations:
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Scheduled Rate | placed tasks / total tasks |
//! | Sessions per Day | entry count by weekday |
//! | Room Utilization | busy minutes / weekly grid minutes, per room |
//! | Mean Block Gap | average idle minutes between consecutive same-block sessions on a day |
//!
//! Pure derivation; nothing here touches the solvers.

use std::collections::HashMap;

use crate::models::{SessionTask, SolverResult, TimeGrid, Weekday};

/// Quality indicators for one solver result.
#[derive(Debug, Clone)]
pub struct TimetableKpi {
    /// Fraction of tasks that received an entry (1.0 when there were none).
    pub scheduled_rate: f64,
    /// Scheduled entries per day.
    pub sessions_per_day: HashMap<Weekday, usize>,
    /// Busy fraction of the weekly grid, per room.
    pub room_utilization: HashMap<u32, f64>,
    /// Mean gap in minutes between consecutive same-block sessions on the
    /// same day (0.0 for perfectly compact timetables).
    pub mean_block_gap_min: f64,
}

impl TimetableKpi {
    /// Computes KPIs from a result and the tasks that produced it.
    ///
    /// Utilization is measured against the grid span times the default
    /// teaching week; block gaps use the tasks' class-to-block mapping.
    pub fn compute(result: &SolverResult, tasks: &[SessionTask], grid: &TimeGrid) -> Self {
        let scheduled_rate = if tasks.is_empty() {
            1.0
        } else {
            result.scheduled.len() as f64 / tasks.len() as f64
        };

        let mut sessions_per_day: HashMap<Weekday, usize> = HashMap::new();
        for entry in &result.scheduled {
            *sessions_per_day.entry(entry.day).or_insert(0) += 1;
        }

        let weekly_minutes =
            grid.len() as u64 * u64::from(grid.slot_minutes()) * Weekday::TEACHING_WEEK.len() as u64;
        let mut busy: HashMap<u32, u64> = HashMap::new();
        for entry in &result.scheduled {
            *busy.entry(entry.room_id).or_insert(0) += u64::from(entry.duration_min());
        }
        let room_utilization = busy
            .into_iter()
            .map(|(room, minutes)| {
                let fraction = if weekly_minutes == 0 {
                    0.0
                } else {
                    minutes as f64 / weekly_minutes as f64
                };
                (room, fraction)
            })
            .collect();

        Self {
            scheduled_rate,
            sessions_per_day,
            room_utilization,
            mean_block_gap_min: mean_block_gap(result, tasks),
        }
    }
}

/// Average idle time between consecutive same-block sessions per day.
fn mean_block_gap(result: &SolverResult, tasks: &[SessionTask]) -> f64 {
    let block_of: HashMap<u32, u32> = tasks.iter().map(|t| (t.class_id, t.block_id)).collect();

    let mut by_block_day: HashMap<(u32, Weekday), Vec<(u16, u16)>> = HashMap::new();
    for entry in &result.scheduled {
        let Some(&block) = block_of.get(&entry.class_id) else {
            continue;
        };
        by_block_day
            .entry((block, entry.day))
            .or_default()
            .push((entry.start_time.minutes(), entry.end_time.minutes()));
    }

    let mut gap_total = 0i64;
    let mut gap_count = 0i64;
    for spans in by_block_day.values_mut() {
        spans.sort();
        for pair in spans.windows(2) {
            let gap = i64::from(pair[1].0) - i64::from(pair[0].1);
            gap_total += gap.max(0);
            gap_count += 1;
        }
    }

    if gap_count == 0 {
        0.0
    } else {
        gap_total as f64 / gap_count as f64
    }
}
