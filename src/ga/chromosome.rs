//! Chromosome encoding and genetic operators.
//!
//! A chromosome carries one gene per schedulable task; each gene is a
//! [`Placement`] drawn from that task's candidate rooms, candidate days,
//! and the valid start indices for its duration. Fitness bookkeeping lives
//! on the individual so the engine can sort populations without
//! re-evaluating.

use rand::prelude::IndexedRandom;
use rand::Rng;

use crate::models::{Placement, SessionTask, TimeGrid, Weekday};

/// One candidate timetable: a gene per task plus its evaluated fitness.
#[derive(Debug, Clone)]
pub struct Individual {
    /// Placements, parallel to the engine's active-task list.
    pub genes: Vec<Placement>,
    /// Evaluated fitness (higher = better).
    pub fitness: i64,
    /// Hard conflicts in this chromosome; zero means decodable as-is.
    pub hard_conflicts: usize,
}

impl Individual {
    /// Wraps genes with unevaluated fitness.
    pub fn new(genes: Vec<Placement>) -> Self {
        Self {
            genes,
            fitness: i64::MIN,
            hard_conflicts: usize::MAX,
        }
    }
}

/// Draws a uniformly random valid gene for a task.
///
/// The task's domain must be non-empty; the engine filters out tasks with
/// empty domains before building the population.
pub fn random_placement<R: Rng>(task: &SessionTask, grid: &TimeGrid, rng: &mut R) -> Placement {
    let room_id = task.candidate_rooms.choose(rng).copied().unwrap_or(0);
    let day = task.candidate_days.choose(rng).copied().unwrap_or(Weekday::Monday);
    let max_start = grid.max_start_index(task.slots_needed).unwrap_or(0);
    Placement {
        room_id,
        day,
        start_slot: rng.random_range(0..=max_start),
    }
}

/// Uniform crossover: each gene comes from either parent with equal chance.
pub fn uniform_crossover<R: Rng>(a: &[Placement], b: &[Placement], rng: &mut R) -> Vec<Placement> {
    a.iter()
        .zip(b)
        .map(|(&ga, &gb)| if rng.random_bool(0.5) { ga } else { gb })
        .collect()
}

/// Re-randomizes one random gene in place.
///
/// Returns the mutated index so a caller can revert the change (the
/// hill-climbing step keeps a mutation only when it improves fitness).
pub fn point_mutation<R: Rng>(
    genes: &mut [Placement],
    tasks: &[&SessionTask],
    grid: &TimeGrid,
    rng: &mut R,
) -> Option<(usize, Placement)> {
    if genes.is_empty() {
        return None;
    }
    let index = rng.random_range(0..genes.len());
    let previous = genes[index];
    genes[index] = random_placement(tasks[index], grid, rng);
    Some((index, previous))
}
