//! Greedy baseline scheduler and result quality metrics.
//!
//! `GreedyScheduler` is a fast, deterministic, first-fit baseline: longest
//! sessions first, smallest fitting room first, earliest consistent slot.
//! It shares the constraint evaluator with the real solvers, so its output
//! honors the same hard constraints, but it never revisits a placement.
//!
//! `TimetableKpi` computes quality indicators (scheduled rate, per-room
//! utilization, per-day load, block compactness) from any solver's result.

mod greedy;
mod kpi;

pub use greedy::GreedyScheduler;
pub use kpi::TimetableKpi;
