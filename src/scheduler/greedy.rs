//! Greedy first-fit scheduler.
//!
//! # Algorithm
//!
//! 1. Sort tasks longest-first (most slots needed).
//! 2. For each task, try its candidate rooms smallest-capacity-first.
//! 3. Accept the first (day, start-slot) the constraint evaluator allows.
//!
//! No backtracking: a placement is never revisited, so the result is a fast
//! baseline rather than an optimized timetable. Deterministic for identical
//! inputs.

use std::collections::HashMap;

use log::info;

use crate::decompose::decompose_offerings;
use crate::evaluator::ConstraintEvaluator;
use crate::models::{
    ClassOffering, FailedSession, Placement, Room, ScheduleEntry, SessionTask, SolverConstraints,
    SolverResult, TimeGrid,
};

const NO_FIT_REASON: &str = "No available slot found that meets all constraints.";

/// First-fit baseline scheduler.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyScheduler;

impl GreedyScheduler {
    /// Creates a scheduler.
    pub fn new() -> Self {
        Self
    }

    /// Decomposes offerings and schedules the resulting tasks.
    pub fn solve_offerings(
        &self,
        classes: &[ClassOffering],
        rooms: &[Room],
        grid: &TimeGrid,
        constraints: &SolverConstraints,
    ) -> SolverResult {
        let tasks = decompose_offerings(classes, rooms, constraints, grid);
        self.solve(&tasks, rooms, grid, constraints)
    }

    /// Schedules tasks first-fit.
    pub fn solve(
        &self,
        tasks: &[SessionTask],
        rooms: &[Room],
        grid: &TimeGrid,
        constraints: &SolverConstraints,
    ) -> SolverResult {
        let mut failed = Vec::new();
        let mut active = Vec::new();
        for (idx, task) in tasks.iter().enumerate() {
            match task.unschedulable_reason(grid) {
                Some(reason) => failed.push(FailedSession::new(task.label(), reason)),
                None => active.push(idx),
            }
        }

        // Longest sessions first; stable on ties.
        active.sort_by(|&a, &b| tasks[b].slots_needed.cmp(&tasks[a].slots_needed));

        let capacity_of: HashMap<u32, u32> = rooms.iter().map(|r| (r.id, r.capacity)).collect();
        let eval = ConstraintEvaluator::new(tasks, rooms, grid, constraints);

        let mut assignments: Vec<Option<Placement>> = vec![None; tasks.len()];
        let mut placed: Vec<(usize, Placement)> = Vec::with_capacity(active.len());

        for &task_idx in &active {
            let task = &tasks[task_idx];
            let Some(max_start) = grid.max_start_index(task.slots_needed) else {
                continue;
            };

            // Smallest fitting room first.
            let mut candidate_rooms = task.candidate_rooms.clone();
            candidate_rooms
                .sort_by_key(|id| capacity_of.get(id).copied().unwrap_or(u32::MAX));

            'search: for room_id in candidate_rooms {
                for &day in &task.candidate_days {
                    for start_slot in 0..=max_start {
                        let placement = Placement {
                            room_id,
                            day,
                            start_slot,
                        };
                        if eval
                            .conflict_with_placed(task_idx, placement, &placed)
                            .is_none()
                        {
                            assignments[task_idx] = Some(placement);
                            placed.push((task_idx, placement));
                            break 'search;
                        }
                    }
                }
            }
        }

        let mut scheduled = Vec::new();
        for (idx, task) in tasks.iter().enumerate() {
            match assignments[idx] {
                Some(placement) => {
                    scheduled.extend(ScheduleEntry::from_placement(task, placement, grid));
                }
                None if active.contains(&idx) => {
                    failed.push(FailedSession::new(task.label(), NO_FIT_REASON));
                }
                None => {}
            }
        }

        info!(
            "greedy scheduler placed {} of {} tasks",
            scheduled.len(),
            tasks.len()
        );
        SolverResult::new(scheduled, failed)
    }
}
