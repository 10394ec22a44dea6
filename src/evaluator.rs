//! Shared constraint evaluation.
//!
//! Both solvers judge candidate placements through the same predicate and
//! scoring layer: hard-conflict checks that reject a placement outright, and
//! soft heuristics that rank otherwise-valid placements (value ordering in
//! the backtracking solver, fitness in the memetic solver).
//!
//! Hard checks run in a fixed precedence: break-time overlap, split-lecture
//! same-day, lecture/lab same-day, room overlap, instructor overlap, block
//! overlap. All time-range tests are half-open: `[s1, e1)` and `[s2, e2)`
//! overlap iff `s1 < e2 && s2 < e1`.

use std::collections::HashMap;
use std::fmt;

use crate::models::{
    Placement, Room, RoomTypeRule, SessionTask, SolverConstraints, TimeGrid,
};

/// Scoring constants for the soft heuristics.
///
/// The defaults reproduce the tuning the generator shipped with; callers
/// that want a different balance (e.g. heavier compactness) override the
/// individual weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoftWeights {
    /// Bonus for landing in the class's priority room.
    pub preferred_room: i64,
    /// Bonus for a kind-matched room under the `soft` room-type rule.
    pub room_type_match: i64,
    /// Penalty per kind-mismatched room in fitness scoring.
    pub room_type_mismatch: i64,
    /// Bonus for zero-gap adjacency to a same-block session on the same day.
    pub adjacency: i64,
    /// Penalty per minute of gap to the nearest same-block session.
    pub gap_per_minute: i64,
    /// Penalty per slot index when the block has nothing on the day yet
    /// (prefers compact, early days).
    pub early_slot: i64,
    /// Fitness base awarded per task in a conflict-free individual.
    pub base_per_task: i64,
    /// Fitness penalty per hard conflict; large enough that any
    /// conflict-free individual outranks any conflicted one.
    pub hard_conflict: i64,
}

impl Default for SoftWeights {
    fn default() -> Self {
        Self {
            preferred_room: 100,
            room_type_match: 50,
            room_type_mismatch: 10,
            adjacency: 50,
            gap_per_minute: 1,
            early_slot: 1,
            base_per_task: 1000,
            hard_conflict: 10_000,
        }
    }
}

impl SoftWeights {
    /// Sets the preferred-room bonus.
    pub fn with_preferred_room(mut self, weight: i64) -> Self {
        self.preferred_room = weight;
        self
    }

    /// Sets the room-kind match bonus.
    pub fn with_room_type_match(mut self, weight: i64) -> Self {
        self.room_type_match = weight;
        self
    }

    /// Sets the adjacency bonus.
    pub fn with_adjacency(mut self, weight: i64) -> Self {
        self.adjacency = weight;
        self
    }

    /// Sets the per-minute gap penalty.
    pub fn with_gap_per_minute(mut self, weight: i64) -> Self {
        self.gap_per_minute = weight;
        self
    }

    /// Sets the per-hard-conflict fitness penalty.
    pub fn with_hard_conflict(mut self, weight: i64) -> Self {
        self.hard_conflict = weight;
        self
    }
}

/// A hard-constraint violation. Any one rejects a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardConflict {
    /// Placement intersects the configured break window.
    BreakOverlap,
    /// Both halves of a split lecture would fall on the same day.
    SplitLectureSameDay,
    /// A lecture and lab of the same class would fall on the same day.
    LectureLabSameDay,
    /// Room already booked at an intersecting time.
    RoomOverlap,
    /// Instructor already teaching at an intersecting time.
    InstructorOverlap,
    /// Student block already in session at an intersecting time.
    BlockOverlap,
}

impl fmt::Display for HardConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HardConflict::BreakOverlap => "Overlaps the configured break time.",
            HardConflict::SplitLectureSameDay => {
                "Both halves of the split lecture would fall on the same day."
            }
            HardConflict::LectureLabSameDay => {
                "Lecture and lab of the same class would fall on the same day."
            }
            HardConflict::RoomOverlap => "Room is already booked at this time.",
            HardConflict::InstructorOverlap => "Instructor is already teaching at this time.",
            HardConflict::BlockOverlap => "Block already has a session at this time.",
        })
    }
}

/// Stateless judge for candidate placements.
///
/// Borrows the task list, room pool, grid, and constraint configuration for
/// the duration of one solve invocation; placements are always passed in
/// explicitly, so the evaluator itself carries no search state.
pub struct ConstraintEvaluator<'a> {
    tasks: &'a [SessionTask],
    grid: &'a TimeGrid,
    constraints: &'a SolverConstraints,
    weights: SoftWeights,
    rooms: HashMap<u32, &'a Room>,
}

impl<'a> ConstraintEvaluator<'a> {
    /// Creates an evaluator with default weights.
    pub fn new(
        tasks: &'a [SessionTask],
        rooms: &'a [Room],
        grid: &'a TimeGrid,
        constraints: &'a SolverConstraints,
    ) -> Self {
        Self {
            tasks,
            grid,
            constraints,
            weights: SoftWeights::default(),
            rooms: rooms.iter().map(|r| (r.id, r)).collect(),
        }
    }

    /// Overrides the scoring weights.
    pub fn with_weights(mut self, weights: SoftWeights) -> Self {
        self.weights = weights;
        self
    }

    /// The scoring weights in effect.
    pub fn weights(&self) -> &SoftWeights {
        &self.weights
    }

    /// The tasks under evaluation.
    pub fn tasks(&self) -> &[SessionTask] {
        self.tasks
    }

    /// Occupied minute range `[start, end)` for a task at a start slot.
    fn span_min(&self, task: &SessionTask, start_slot: usize) -> (u32, u32) {
        let start = self
            .grid
            .slot(start_slot)
            .map_or(0, |t| u32::from(t.minutes()));
        (start, start + task.duration_min)
    }

    /// Checks a single placement against the break window (hard check 1).
    pub fn slot_conflict(&self, task_idx: usize, placement: Placement) -> Option<HardConflict> {
        let bw = self.constraints.break_time.as_ref()?;
        let (start, end) = self.span_min(&self.tasks[task_idx], placement.start_slot);
        let overlap =
            start < u32::from(bw.end.minutes()) && u32::from(bw.start.minutes()) < end;
        overlap.then_some(HardConflict::BreakOverlap)
    }

    /// Checks two placements against each other (hard checks 2-6).
    pub fn pair_conflict(
        &self,
        a: (usize, Placement),
        b: (usize, Placement),
    ) -> Option<HardConflict> {
        let (ta, pa) = (&self.tasks[a.0], a.1);
        let (tb, pb) = (&self.tasks[b.0], b.1);

        if pa.day == pb.day {
            // Same-day exclusions apply regardless of time overlap.
            if ta.is_sibling_of(tb) {
                return Some(HardConflict::SplitLectureSameDay);
            }
            if ta.class_id == tb.class_id && ta.session != tb.session {
                return Some(HardConflict::LectureLabSameDay);
            }

            let (s1, e1) = self.span_min(ta, pa.start_slot);
            let (s2, e2) = self.span_min(tb, pb.start_slot);
            if s1 < e2 && s2 < e1 {
                if pa.room_id == pb.room_id {
                    return Some(HardConflict::RoomOverlap);
                }
                if self.constraints.enforce_instructor
                    && ta.instructor_id.is_some()
                    && ta.instructor_id == tb.instructor_id
                {
                    return Some(HardConflict::InstructorOverlap);
                }
                if self.constraints.enforce_block && ta.block_id == tb.block_id {
                    return Some(HardConflict::BlockOverlap);
                }
            }
        }
        None
    }

    /// Checks a placement against an accepted set, in precedence order.
    ///
    /// Returns the first violated constraint, or `None` when the placement
    /// is consistent.
    pub fn conflict_with_placed(
        &self,
        task_idx: usize,
        placement: Placement,
        placed: &[(usize, Placement)],
    ) -> Option<HardConflict> {
        if let Some(conflict) = self.slot_conflict(task_idx, placement) {
            return Some(conflict);
        }
        placed
            .iter()
            .find_map(|&other| self.pair_conflict((task_idx, placement), other))
    }

    /// Scores a consistent placement against the accepted set.
    ///
    /// Rewards the priority room and (under the `soft` rule) kind-matched
    /// rooms, rewards back-to-back adjacency with a same-block session on the
    /// same day, penalizes gaps proportionally, and nudges toward earlier
    /// slots on days the block has not used yet. Never rejects.
    pub fn soft_score(
        &self,
        task_idx: usize,
        placement: Placement,
        placed: &[(usize, Placement)],
    ) -> i64 {
        let task = &self.tasks[task_idx];
        let mut score = 0i64;

        if task.preferred_room == Some(placement.room_id) {
            score += self.weights.preferred_room;
        }
        if self.constraints.room_type == RoomTypeRule::Soft {
            if let Some(room) = self.rooms.get(&placement.room_id) {
                if task.session.matches(room.kind) {
                    score += self.weights.room_type_match;
                }
            }
        }

        let mut min_gap: Option<i64> = None;
        for &(other_idx, other) in placed {
            if self.tasks[other_idx].block_id != task.block_id {
                continue;
            }
            let Some(gap) = self.gap_minutes((task_idx, placement), (other_idx, other)) else {
                continue;
            };
            min_gap = Some(min_gap.map_or(gap, |g| g.min(gap)));
        }

        match min_gap {
            Some(0) => score += self.weights.adjacency,
            Some(gap) => score -= gap * self.weights.gap_per_minute,
            None => score -= placement.start_slot as i64 * self.weights.early_slot,
        }

        score
    }

    /// Minute gap between two placements on the same day, `Some(0)` when
    /// they touch or intersect, `None` when the days differ.
    pub fn gap_minutes(&self, a: (usize, Placement), b: (usize, Placement)) -> Option<i64> {
        if a.1.day != b.1.day {
            return None;
        }
        let (s1, e1) = self.span_min(&self.tasks[a.0], a.1.start_slot);
        let (s2, e2) = self.span_min(&self.tasks[b.0], b.1.start_slot);
        let gap = (i64::from(s1) - i64::from(e2))
            .max(i64::from(s2) - i64::from(e1))
            .max(0);
        Some(gap)
    }

    /// Whether a kind-mismatched room was chosen (counted as a soft
    /// mismatch in fitness scoring under the `soft` rule).
    pub fn room_type_mismatch(&self, task_idx: usize, placement: Placement) -> bool {
        if self.constraints.room_type != RoomTypeRule::Soft {
            return false;
        }
        self.rooms
            .get(&placement.room_id)
            .is_some_and(|room| !self.tasks[task_idx].session.matches(room.kind))
    }
}
