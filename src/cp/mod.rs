//! Backtracking timetable solver.
//!
//! Depth-first search over (room, day, start-slot) assignments, ordered by
//! the Most-Constrained-Variable heuristic: tasks with fewer candidate rooms
//! per needed slot are placed first. Optional value ordering scores every
//! consistent move with the soft heuristics and tries the best first.
//!
//! The search is bounded by a wall-clock budget checked cooperatively at
//! every node. Running out of time or options is not an error: the deepest
//! assignment reached is snapshotted and returned as a partial result.
//!
//! Given identical inputs and an unbounded budget the search is
//! deterministic; there is no randomness anywhere in this module.
//!
//! # Reference
//! Russell & Norvig (2010), "AIMA", Ch. 6: CSP backtracking and MRV

use std::time::{Duration, Instant};

use log::{info, warn};

use crate::decompose::decompose_offerings;
use crate::evaluator::{ConstraintEvaluator, SoftWeights};
use crate::models::{
    ClassOffering, FailedSession, Placement, Room, ScheduleEntry, SessionTask, SolverConstraints,
    SolverResult, TimeGrid,
};

/// Reason attached to tasks left unplaced when the search ends early.
const NO_SLOT_REASON: &str = "No valid slot found during backtracking.";

/// Configuration for [`BacktrackingSolver`].
#[derive(Debug, Clone, Copy)]
pub struct BacktrackConfig {
    /// Wall-clock budget; `None` searches without a deadline.
    pub time_budget: Option<Duration>,
    /// Score consistent moves with the soft heuristics and try best-first.
    pub value_ordering: bool,
    /// Soft-heuristic weights (only used with `value_ordering`).
    pub weights: SoftWeights,
}

impl Default for BacktrackConfig {
    fn default() -> Self {
        Self {
            time_budget: Some(Duration::from_secs(10)),
            value_ordering: false,
            weights: SoftWeights::default(),
        }
    }
}

/// Depth-first constraint solver with best-partial fallback.
#[derive(Debug, Clone, Default)]
pub struct BacktrackingSolver {
    config: BacktrackConfig,
}

/// How a search run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchStatus {
    /// Every task was assigned.
    Complete,
    /// The option space was exhausted below full depth.
    Exhausted,
    /// The wall-clock budget ran out.
    TimedOut,
}

impl BacktrackingSolver {
    /// Creates a solver with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the wall-clock budget (`None` = unbounded).
    pub fn with_time_budget(mut self, budget: Option<Duration>) -> Self {
        self.config.time_budget = budget;
        self
    }

    /// Enables or disables soft-score value ordering.
    pub fn with_value_ordering(mut self, enabled: bool) -> Self {
        self.config.value_ordering = enabled;
        self
    }

    /// Overrides the soft-heuristic weights.
    pub fn with_weights(mut self, weights: SoftWeights) -> Self {
        self.config.weights = weights;
        self
    }

    /// Decomposes offerings and solves the resulting tasks.
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

    /// Searches for an assignment of every task.
    ///
    /// Returns a complete assignment when one is found within the budget,
    /// otherwise the best partial assignment reached, with the unplaced
    /// tasks reported in `failed`.
    pub fn solve(
        &self,
        tasks: &[SessionTask],
        rooms: &[Room],
        grid: &TimeGrid,
        constraints: &SolverConstraints,
    ) -> SolverResult {
        let mut failed = Vec::new();
        let mut schedulable = vec![false; tasks.len()];
        for (idx, task) in tasks.iter().enumerate() {
            match task.unschedulable_reason(grid) {
                Some(reason) => failed.push(FailedSession::new(task.label(), reason)),
                None => schedulable[idx] = true,
            }
        }

        // Most-Constrained-Variable: fewest rooms per needed slot first.
        // The stable sort keeps input order on ties, which makes the whole
        // search deterministic.
        let mut order: Vec<usize> = (0..tasks.len()).filter(|&i| schedulable[i]).collect();
        order.sort_by(|&a, &b| mcv_ratio(&tasks[a]).total_cmp(&mcv_ratio(&tasks[b])));

        let eval = ConstraintEvaluator::new(tasks, rooms, grid, constraints)
            .with_weights(self.config.weights);
        let mut search = Search {
            eval,
            tasks,
            grid,
            order,
            assignments: vec![None; tasks.len()],
            placed: Vec::with_capacity(tasks.len()),
            best: vec![None; tasks.len()],
            best_depth: 0,
            deadline: self.config.time_budget.map(|b| Instant::now() + b),
            value_ordering: self.config.value_ordering,
        };

        let status = search.dive(0);
        let chosen = match status {
            SearchStatus::Complete => {
                info!("backtracking placed all {} tasks", search.order.len());
                &search.assignments
            }
            SearchStatus::TimedOut => {
                warn!(
                    "backtracking timed out after {:?}; keeping best partial of {} tasks",
                    self.config.time_budget,
                    search.best_depth
                );
                &search.best
            }
            SearchStatus::Exhausted => {
                info!(
                    "backtracking exhausted its options; best partial covers {} of {} tasks",
                    search.best_depth,
                    search.order.len()
                );
                &search.best
            }
        };

        let mut scheduled = Vec::new();
        for (idx, task) in tasks.iter().enumerate() {
            match chosen[idx] {
                Some(placement) => {
                    scheduled.extend(ScheduleEntry::from_placement(task, placement, grid));
                }
                None if schedulable[idx] => {
                    failed.push(FailedSession::new(task.label(), NO_SLOT_REASON));
                }
                None => {}
            }
        }

        SolverResult::new(scheduled, failed)
    }
}

fn mcv_ratio(task: &SessionTask) -> f64 {
    task.candidate_rooms.len() as f64 / task.slots_needed.max(1) as f64
}

/// Mutable search state threaded through the recursion.
struct Search<'a> {
    eval: ConstraintEvaluator<'a>,
    tasks: &'a [SessionTask],
    grid: &'a TimeGrid,
    order: Vec<usize>,
    /// Arena of per-task assignments, indexed by task.
    assignments: Vec<Option<Placement>>,
    /// Accepted placements in assignment order (the evaluator's view).
    placed: Vec<(usize, Placement)>,
    /// Snapshot of the deepest assignment reached so far.
    best: Vec<Option<Placement>>,
    best_depth: usize,
    deadline: Option<Instant>,
    value_ordering: bool,
}

impl Search<'_> {
    fn dive(&mut self, depth: usize) -> SearchStatus {
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return SearchStatus::TimedOut;
        }

        if depth > self.best_depth {
            self.best_depth = depth;
            self.best.clone_from(&self.assignments);
        }
        if depth == self.order.len() {
            return SearchStatus::Complete;
        }

        let task_idx = self.order[depth];
        if self.value_ordering {
            let mut moves = self.scored_moves(task_idx);
            moves.sort_by(|a, b| b.0.cmp(&a.0));
            for (_, placement) in moves {
                match self.try_placement(task_idx, placement, depth) {
                    SearchStatus::Exhausted => continue,
                    done => return done,
                }
            }
        } else {
            let task = &self.tasks[task_idx];
            let Some(max_start) = self.grid.max_start_index(task.slots_needed) else {
                return SearchStatus::Exhausted;
            };
            for &room_id in &task.candidate_rooms {
                for &day in &task.candidate_days {
                    for start_slot in 0..=max_start {
                        let placement = Placement {
                            room_id,
                            day,
                            start_slot,
                        };
                        if self
                            .eval
                            .conflict_with_placed(task_idx, placement, &self.placed)
                            .is_some()
                        {
                            continue;
                        }
                        match self.try_placement(task_idx, placement, depth) {
                            SearchStatus::Exhausted => continue,
                            done => return done,
                        }
                    }
                }
            }
        }

        SearchStatus::Exhausted
    }

    /// Tentatively accepts a placement, recurses, and undoes it unless the
    /// subtree finished the search.
    fn try_placement(
        &mut self,
        task_idx: usize,
        placement: Placement,
        depth: usize,
    ) -> SearchStatus {
        self.assignments[task_idx] = Some(placement);
        self.placed.push((task_idx, placement));
        let status = self.dive(depth + 1);
        if status == SearchStatus::Exhausted {
            self.placed.pop();
            self.assignments[task_idx] = None;
        }
        status
    }

    /// All consistent moves for a task, with their soft scores.
    fn scored_moves(&self, task_idx: usize) -> Vec<(i64, Placement)> {
        let task = &self.tasks[task_idx];
        let mut moves = Vec::new();
        let Some(max_start) = self.grid.max_start_index(task.slots_needed) else {
            return moves;
        };
        for &room_id in &task.candidate_rooms {
            for &day in &task.candidate_days {
                for start_slot in 0..=max_start {
                    let placement = Placement {
                        room_id,
                        day,
                        start_slot,
                    };
                    if self
                        .eval
                        .conflict_with_placed(task_idx, placement, &self.placed)
                        .is_none()
                    {
                        let score = self.eval.soft_score(task_idx, placement, &self.placed);
                        moves.push((score, placement));
                    }
                }
            }
        }
        moves
    }
}
