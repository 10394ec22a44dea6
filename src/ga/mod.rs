//! Memetic timetable solver.
//!
//! Genetic algorithm over whole-timetable chromosomes with elitism, uniform
//! crossover, point mutation, and a per-generation hill-climbing step on the
//! top individuals (the "memetic" part), followed by a greedy
//! conflict-sanitizing decode of the best chromosome.
//!
//! Fitness is dominance-ordered: any chromosome with hard conflicts scores
//! strictly below every conflict-free one, so the population is pulled
//! toward feasibility first and soft quality second. Because a
//! fitness-optimal chromosome may still carry conflicts when no feasible
//! solution was found within the generation budget, the decode step accepts
//! genes greedily and reports the rejects instead of emitting a conflicted
//! timetable.
//!
//! The solver is stochastic; the RNG is injected per invocation so
//! concurrent runs do not interfere and tests can seed it.
//!
//! # Reference
//! - Moscato (1989), "On Evolution, Search, Optimization, GAs and Martial
//!   Arts: Towards Memetic Algorithms"
//! - Lewis (2008), "A survey of metaheuristic-based techniques for
//!   University Timetabling problems"

mod chromosome;

pub use chromosome::Individual;

use log::{debug, info};
use rand::Rng;

use crate::decompose::decompose_offerings;
use crate::evaluator::{ConstraintEvaluator, SoftWeights};
use crate::models::{
    ClassOffering, FailedSession, Placement, Room, ScheduleEntry, SessionTask, SolverConstraints,
    SolverResult, TimeGrid,
};

use chromosome::{point_mutation, random_placement, uniform_crossover};

/// Configuration for [`MemeticSolver`].
#[derive(Debug, Clone, Copy)]
pub struct MemeticConfig {
    /// Individuals per generation.
    pub population_size: usize,
    /// Generation budget.
    pub generations: usize,
    /// Probability that a child gets one re-randomized gene.
    pub mutation_rate: f64,
    /// Individuals carried over unchanged each generation.
    pub elitism: usize,
    /// Individuals given a hill-climbing attempt each generation.
    pub local_search_top: usize,
    /// Scoring weights.
    pub weights: SoftWeights,
}

impl Default for MemeticConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 50,
            mutation_rate: 0.1,
            elitism: 2,
            local_search_top: 5,
            weights: SoftWeights::default(),
        }
    }
}

/// Population-based solver with local search and sanitizing decode.
#[derive(Debug, Clone, Default)]
pub struct MemeticSolver {
    config: MemeticConfig,
}

impl MemeticSolver {
    /// Creates a solver with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the population size (minimum 1).
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.config.population_size = size.max(1);
        self
    }

    /// Sets the generation budget.
    pub fn with_generations(mut self, generations: usize) -> Self {
        self.config.generations = generations;
        self
    }

    /// Sets the mutation probability (clamped to `0.0..=1.0`).
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.config.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the elitism count.
    pub fn with_elitism(mut self, count: usize) -> Self {
        self.config.elitism = count;
        self
    }

    /// Sets how many top individuals receive local search per generation.
    pub fn with_local_search_top(mut self, count: usize) -> Self {
        self.config.local_search_top = count;
        self
    }

    /// Overrides the scoring weights.
    pub fn with_weights(mut self, weights: SoftWeights) -> Self {
        self.config.weights = weights;
        self
    }

    /// Decomposes offerings and solves the resulting tasks.
    pub fn solve_offerings<R: Rng>(
        &self,
        classes: &[ClassOffering],
        rooms: &[Room],
        grid: &TimeGrid,
        constraints: &SolverConstraints,
        rng: &mut R,
    ) -> SolverResult {
        let tasks = decompose_offerings(classes, rooms, constraints, grid);
        self.solve(&tasks, rooms, grid, constraints, rng)
    }

    /// Evolves a timetable for the given tasks.
    pub fn solve<R: Rng>(
        &self,
        tasks: &[SessionTask],
        rooms: &[Room],
        grid: &TimeGrid,
        constraints: &SolverConstraints,
        rng: &mut R,
    ) -> SolverResult {
        let mut failed = Vec::new();
        let mut active = Vec::new();
        for (idx, task) in tasks.iter().enumerate() {
            match task.unschedulable_reason(grid) {
                Some(reason) => failed.push(FailedSession::new(task.label(), reason)),
                None => active.push(idx),
            }
        }
        if active.is_empty() {
            return SolverResult::new(Vec::new(), failed);
        }
        let active_tasks: Vec<&SessionTask> = active.iter().map(|&i| &tasks[i]).collect();

        let eval = ConstraintEvaluator::new(tasks, rooms, grid, constraints)
            .with_weights(self.config.weights);
        let pop_size = self.config.population_size.max(1);

        let mut population: Vec<Individual> = (0..pop_size)
            .map(|_| {
                let genes = active_tasks
                    .iter()
                    .map(|&task| random_placement(task, grid, rng))
                    .collect();
                evaluated(Individual::new(genes), &eval, &active)
            })
            .collect();

        for generation in 0..self.config.generations {
            population.sort_by(|a, b| b.fitness.cmp(&a.fitness));
            if population[0].hard_conflicts == 0 {
                debug!("conflict-free individual at generation {generation}");
                break;
            }

            let mut next: Vec<Individual> =
                population[..self.config.elitism.min(pop_size)].to_vec();
            while next.len() < pop_size {
                let p1 = &population[rng.random_range(0..pop_size)].genes;
                let p2 = &population[rng.random_range(0..pop_size)].genes;
                let mut genes = uniform_crossover(p1, p2, rng);
                if rng.random_bool(self.config.mutation_rate) {
                    point_mutation(&mut genes, &active_tasks, grid, rng);
                }
                next.push(evaluated(Individual::new(genes), &eval, &active));
            }
            population = next;

            // Hill climbing on the leaders: keep a random single-gene
            // mutation only when it improves fitness.
            for individual in population
                .iter_mut()
                .take(self.config.local_search_top.min(pop_size))
            {
                let Some((index, previous)) =
                    point_mutation(&mut individual.genes, &active_tasks, grid, rng)
                else {
                    continue;
                };
                let (hard, fitness) = fitness_of(&eval, &active, &individual.genes);
                if fitness > individual.fitness {
                    individual.fitness = fitness;
                    individual.hard_conflicts = hard;
                } else {
                    individual.genes[index] = previous;
                }
            }
        }

        population.sort_by(|a, b| b.fitness.cmp(&a.fitness));
        let best = &population[0];
        debug!(
            "best individual: fitness {}, {} hard conflicts",
            best.fitness, best.hard_conflicts
        );

        // Greedy decode: accept each gene only if it is consistent with the
        // genes accepted before it.
        let mut accepted: Vec<(usize, Placement)> = Vec::new();
        let mut scheduled = Vec::new();
        for (pos, &gene) in best.genes.iter().enumerate() {
            let task_idx = active[pos];
            match eval.conflict_with_placed(task_idx, gene, &accepted) {
                None => {
                    accepted.push((task_idx, gene));
                    scheduled.extend(ScheduleEntry::from_placement(&tasks[task_idx], gene, grid));
                }
                Some(conflict) => {
                    failed.push(FailedSession::new(tasks[task_idx].label(), conflict.to_string()));
                }
            }
        }

        info!(
            "memetic solver scheduled {} of {} tasks",
            scheduled.len(),
            tasks.len()
        );
        SolverResult::new(scheduled, failed)
    }
}

fn evaluated(mut individual: Individual, eval: &ConstraintEvaluator, active: &[usize]) -> Individual {
    let (hard, fitness) = fitness_of(eval, active, &individual.genes);
    individual.hard_conflicts = hard;
    individual.fitness = fitness;
    individual
}

/// Scores a chromosome: hard-conflict count and dominance-ordered fitness.
///
/// Any hard conflict makes the fitness a large negative multiple of the
/// conflict count; conflict-free chromosomes score a per-task base plus
/// preferred-room and compactness bonuses minus soft room-kind mismatches.
fn fitness_of(
    eval: &ConstraintEvaluator,
    active: &[usize],
    genes: &[Placement],
) -> (usize, i64) {
    let weights = *eval.weights();

    let mut hard = 0usize;
    for (i, &gene) in genes.iter().enumerate() {
        if eval.slot_conflict(active[i], gene).is_some() {
            hard += 1;
        }
    }
    for i in 0..genes.len() {
        for j in (i + 1)..genes.len() {
            if eval
                .pair_conflict((active[i], genes[i]), (active[j], genes[j]))
                .is_some()
            {
                hard += 1;
            }
        }
    }
    if hard > 0 {
        return (hard, -(hard as i64) * weights.hard_conflict);
    }

    let mut score = genes.len() as i64 * weights.base_per_task;
    for (i, &gene) in genes.iter().enumerate() {
        let task = &eval.tasks()[active[i]];
        if task.preferred_room == Some(gene.room_id) {
            score += weights.preferred_room;
        }
        if eval.room_type_mismatch(active[i], gene) {
            score -= weights.room_type_mismatch;
        }
    }
    for i in 0..genes.len() {
        for j in (i + 1)..genes.len() {
            let (ta, tb) = (&eval.tasks()[active[i]], &eval.tasks()[active[j]]);
            if ta.block_id != tb.block_id {
                continue;
            }
            match eval.gap_minutes((active[i], genes[i]), (active[j], genes[j])) {
                Some(0) => score += weights.adjacency,
                Some(gap) => score -= gap * weights.gap_per_minute,
                None => {}
            }
        }
    }

    (0, score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RoomTypeRule, SessionType, TimeOfDay, Weekday};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn grid() -> TimeGrid {
        TimeGrid::generate(TimeOfDay::new(8, 0), TimeOfDay::new(17, 0), 30, None)
    }

    fn relaxed() -> SolverConstraints {
        SolverConstraints::new()
            .with_capacity(false)
            .with_room_type(RoomTypeRule::None)
            .with_instructor(false)
            .with_block(false)
    }

    #[test]
    fn test_single_class_scheduled() {
        let classes = vec![ClassOffering::new(1, "CS101")
            .with_lecture_hours(1.5)
            .with_block(1)];
        let rooms = vec![Room::lecture(1)];
        let grid = grid();
        let mut rng = SmallRng::seed_from_u64(42);

        let result = MemeticSolver::new().solve_offerings(
            &classes,
            &rooms,
            &grid,
            &relaxed(),
            &mut rng,
        );

        assert!(result.success);
        assert_eq!(result.scheduled_count(), 1);
        let entry = &result.scheduled[0];
        assert_eq!(entry.duration_min(), 90);
        assert!(grid.index_of(entry.start_time).is_some());
    }

    #[test]
    fn test_decode_never_emits_hard_conflicts() {
        // Heavily over-constrained: five 2-hour classes, one room, one day.
        // Whatever the best chromosome looks like, the decoded output must
        // be conflict-free.
        let classes: Vec<ClassOffering> = (1..=5)
            .map(|i| {
                ClassOffering::new(i, format!("CS10{i}"))
                    .with_lecture_hours(2.0)
                    .with_block(i)
                    .with_lecture_days([Weekday::Monday])
            })
            .collect();
        let rooms = vec![Room::lecture(1)];
        let grid = TimeGrid::generate(TimeOfDay::new(8, 0), TimeOfDay::new(13, 0), 30, None);
        let mut rng = SmallRng::seed_from_u64(7);

        let result = MemeticSolver::new().solve_offerings(
            &classes,
            &rooms,
            &grid,
            &relaxed(),
            &mut rng,
        );

        assert!(!result.success);
        assert!(!result.failed.is_empty());
        for (i, a) in result.scheduled.iter().enumerate() {
            for b in &result.scheduled[i + 1..] {
                if a.room_id == b.room_id {
                    assert!(!a.overlaps(b), "decode leaked a conflict: {a:?} vs {b:?}");
                }
            }
        }
    }

    #[test]
    fn test_same_seed_reproduces_schedule() {
        let classes: Vec<ClassOffering> = (1..=4)
            .map(|i| {
                ClassOffering::new(i, format!("CS10{i}"))
                    .with_lecture_hours(1.5)
                    .with_block(i % 2)
            })
            .collect();
        let rooms = vec![Room::lecture(1), Room::lecture(2)];
        let grid = grid();

        let mut rng1 = SmallRng::seed_from_u64(99);
        let first = MemeticSolver::new().solve_offerings(
            &classes,
            &rooms,
            &grid,
            &relaxed(),
            &mut rng1,
        );
        let mut rng2 = SmallRng::seed_from_u64(99);
        let second = MemeticSolver::new().solve_offerings(
            &classes,
            &rooms,
            &grid,
            &relaxed(),
            &mut rng2,
        );

        assert_eq!(first.scheduled, second.scheduled);
        assert_eq!(first.failed, second.failed);
    }

    #[test]
    fn test_split_halves_never_share_a_day() {
        let classes = vec![ClassOffering::new(1, "CS101")
            .with_lecture_hours(3.0)
            .with_split_lecture()
            .with_block(1)
            .with_lecture_days([Weekday::Monday, Weekday::Wednesday])];
        let rooms = vec![Room::lecture(1)];
        let grid = grid();
        let mut rng = SmallRng::seed_from_u64(3);

        let result = MemeticSolver::new().solve_offerings(
            &classes,
            &rooms,
            &grid,
            &relaxed(),
            &mut rng,
        );

        let entries = result.entries_for_class(1);
        assert!(!entries.is_empty());
        if entries.len() == 2 {
            assert_ne!(entries[0].day, entries[1].day);
        }
        for entry in entries {
            assert_eq!(entry.duration_min(), 90);
        }
    }

    #[test]
    fn test_break_window_respected() {
        let classes = vec![ClassOffering::new(1, "CS101")
            .with_lecture_hours(2.0)
            .with_block(1)];
        let rooms = vec![Room::lecture(1)];
        let grid = grid();
        let constraints = relaxed().with_break_time("12:00-13:00".parse().unwrap());
        let mut rng = SmallRng::seed_from_u64(11);

        let result =
            MemeticSolver::new().solve_offerings(&classes, &rooms, &grid, &constraints, &mut rng);

        let bw: crate::models::BreakWindow = "12:00-13:00".parse().unwrap();
        for entry in &result.scheduled {
            assert!(
                !bw.overlaps(entry.start_time, entry.end_time),
                "entry crosses the break: {entry:?}"
            );
        }
    }

    #[test]
    fn test_fitness_dominance_ordering() {
        let tasks = vec![
            SessionTask::new(1, SessionType::Lecture, 90, 3)
                .with_block(1)
                .with_rooms(vec![1])
                .with_days(vec![Weekday::Monday]),
            SessionTask::new(2, SessionType::Lecture, 90, 3)
                .with_block(2)
                .with_rooms(vec![1])
                .with_days(vec![Weekday::Monday]),
        ];
        let rooms = vec![Room::lecture(1)];
        let grid = grid();
        let constraints = relaxed();
        let eval = ConstraintEvaluator::new(&tasks, &rooms, &grid, &constraints);
        let active = vec![0, 1];

        let overlapping = vec![
            Placement {
                room_id: 1,
                day: Weekday::Monday,
                start_slot: 0,
            },
            Placement {
                room_id: 1,
                day: Weekday::Monday,
                start_slot: 1,
            },
        ];
        let (hard, conflicted_fitness) = fitness_of(&eval, &active, &overlapping);
        assert_eq!(hard, 1);
        assert!(conflicted_fitness < 0);

        let disjoint = vec![
            Placement {
                room_id: 1,
                day: Weekday::Monday,
                start_slot: 0,
            },
            Placement {
                room_id: 1,
                day: Weekday::Monday,
                start_slot: 3,
            },
        ];
        let (hard, clean_fitness) = fitness_of(&eval, &active, &disjoint);
        assert_eq!(hard, 0);
        assert!(clean_fitness > conflicted_fitness);
    }

    #[test]
    fn test_unschedulable_task_fails_upfront() {
        let tasks = vec![SessionTask::new(1, SessionType::Lecture, 90, 3)
            .with_subject("CS101")
            .with_days(vec![Weekday::Monday])];
        let rooms = vec![Room::lecture(1)];
        let grid = grid();
        let constraints = relaxed();
        let mut rng = SmallRng::seed_from_u64(1);

        let result = MemeticSolver::new().solve(&tasks, &rooms, &grid, &constraints, &mut rng);

        assert!(!result.success);
        assert!(result.scheduled.is_empty());
        assert_eq!(result.failed.len(), 1);
        assert!(result.failed[0].class.contains("CS101"));
    }

    #[test]
    fn test_config_builders_clamp() {
        let solver = MemeticSolver::new()
            .with_population_size(0)
            .with_mutation_rate(5.0)
            .with_generations(10)
            .with_elitism(3)
            .with_local_search_top(2);
        assert_eq!(solver.config.population_size, 1);
        assert_eq!(solver.config.mutation_rate, 1.0);
        assert_eq!(solver.config.generations, 10);
    }
}
