//! University class-timetabling engine.
//!
//! Given class offerings, a room pool, a discretized daily time grid, and a
//! constraint configuration, produces an assignment of (room, day,
//! time-range) to every schedulable session. Fetching inputs and persisting
//! results are the caller's job; nothing in this crate performs I/O.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `ClassOffering`, `Room`, `SessionTask`,
//!   `TimeGrid`, `SolverConstraints`, `ScheduleEntry`, `SolverResult`
//! - **`decompose`**: Offerings → atomic session tasks with ordered
//!   candidate rooms and days
//! - **`evaluator`**: Shared hard-conflict checks and soft scoring
//! - **`cp`**: Timeout-bounded backtracking solver (MCV ordering, optional
//!   best-first value ordering, best-partial fallback)
//! - **`ga`**: Memetic solver (GA with elitism and per-generation local
//!   search, conflict-sanitizing decode)
//! - **`scheduler`**: Greedy first-fit baseline and result KPIs
//! - **`validation`**: Input integrity checks (duplicate IDs, hour loads,
//!   preference references)
//!
//! # Usage
//!
//! Build a grid, decompose, pick a solver:
//!
//! ```
//! use timetabler::cp::BacktrackingSolver;
//! use timetabler::models::{ClassOffering, Room, SolverConstraints, TimeGrid, TimeOfDay};
//!
//! let classes = vec![ClassOffering::new(1, "CS101")
//!     .with_lecture_hours(1.5)
//!     .with_block(1)
//!     .with_students(30)];
//! let rooms = vec![Room::lecture(1).with_capacity(40)];
//! let grid = TimeGrid::generate(TimeOfDay::new(7, 30), TimeOfDay::new(17, 0), 30, None);
//!
//! let result = BacktrackingSolver::new().solve_offerings(
//!     &classes,
//!     &rooms,
//!     &grid,
//!     &SolverConstraints::default(),
//! );
//! assert!(result.success);
//! ```
//!
//! Each solve invocation is synchronous, single-threaded, and owns all of
//! its state; concurrent solves need no coordination beyond independently
//! owned inputs. The memetic solver takes its RNG as an argument so runs
//! can be reproduced.
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Lewis (2008), "A survey of metaheuristic-based techniques for
//!   University Timetabling problems"
//! - Russell & Norvig (2010), "Artificial Intelligence: A Modern Approach",
//!   Ch. 6 (CSPs)

pub mod cp;
pub mod decompose;
pub mod evaluator;
pub mod ga;
pub mod models;
pub mod scheduler;
pub mod validation;
