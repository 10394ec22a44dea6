//! Class offering decomposition.
//!
//! Converts each offering into its atomic schedulable tasks: one lecture
//! (or two half-duration lectures when split), and one lab. Candidate rooms
//! are filtered by the hard constraints and then ordered best-first, since
//! both solvers use candidate order as their search/mutation domain.

use log::info;

use crate::models::{
    ClassOffering, Room, RoomTypeRule, SessionTask, SessionType, SolverConstraints, SplitHalf,
    TimeGrid,
};

/// Decomposes offerings into session tasks.
///
/// - A lecture task is emitted when `lecture_hours > 0`; a split lecture
///   yields two half-duration tasks tagged with their [`SplitHalf`].
/// - A lab task is emitted when `lab_hours > 0`. Labs always use the
///   teaching week minus excluded days; lectures use the offering's
///   explicit day list when one is given (bypassing exclusions).
/// - `slots_needed` is `ceil(duration / slot length)` against the grid.
pub fn decompose_offerings(
    classes: &[ClassOffering],
    rooms: &[Room],
    constraints: &SolverConstraints,
    grid: &TimeGrid,
) -> Vec<SessionTask> {
    let mut tasks = Vec::new();
    let open_days = constraints.teaching_days();

    for cls in classes {
        let lecture_days = if cls.lecture_days.is_empty() {
            open_days.clone()
        } else {
            cls.lecture_days.days().to_vec()
        };

        if cls.lecture_hours > 0.0 {
            let lecture_rooms = candidate_rooms(cls, SessionType::Lecture, rooms, constraints);
            if cls.split_lecture {
                for half in [SplitHalf::First, SplitHalf::Second] {
                    tasks.push(
                        session_task(cls, SessionType::Lecture, cls.lecture_hours / 2.0, grid)
                            .with_split(half)
                            .with_rooms(lecture_rooms.clone())
                            .with_days(lecture_days.clone()),
                    );
                }
            } else {
                tasks.push(
                    session_task(cls, SessionType::Lecture, cls.lecture_hours, grid)
                        .with_rooms(lecture_rooms)
                        .with_days(lecture_days.clone()),
                );
            }
        }

        if cls.lab_hours > 0.0 {
            tasks.push(
                session_task(cls, SessionType::Lab, cls.lab_hours, grid)
                    .with_rooms(candidate_rooms(cls, SessionType::Lab, rooms, constraints))
                    .with_days(open_days.clone()),
            );
        }
    }

    let lectures = tasks
        .iter()
        .filter(|t| t.session == SessionType::Lecture)
        .count();
    info!(
        "decomposed {} offerings into {} tasks ({} lectures, {} labs)",
        classes.len(),
        tasks.len(),
        lectures,
        tasks.len() - lectures
    );

    tasks
}

fn session_task(
    cls: &ClassOffering,
    session: SessionType,
    hours: f64,
    grid: &TimeGrid,
) -> SessionTask {
    let duration_min = duration_minutes(hours);
    let mut task = SessionTask::new(cls.id, session, duration_min, slots_for(duration_min, grid))
        .with_subject(cls.subject_code.clone())
        .with_block(cls.block_id);
    if let Some(instructor) = cls.instructor_id {
        task = task.with_instructor(instructor);
    }
    if let Some(room) = cls.preferred_room() {
        task = task.with_preferred_room(room);
    }
    task
}

/// Whole minutes for a fractional hour count (negative clamps to zero).
fn duration_minutes(hours: f64) -> u32 {
    if hours.is_finite() && hours > 0.0 {
        (hours * 60.0).round() as u32
    } else {
        0
    }
}

fn slots_for(duration_min: u32, grid: &TimeGrid) -> usize {
    if grid.slot_minutes() == 0 {
        return 0;
    }
    duration_min.div_ceil(grid.slot_minutes()) as usize
}

/// Filters rooms by the hard constraints, then orders them best-first:
/// the priority room, the preference options in their listed order,
/// kind-matched rooms, then the rest in input order.
fn candidate_rooms(
    cls: &ClassOffering,
    session: SessionType,
    rooms: &[Room],
    constraints: &SolverConstraints,
) -> Vec<u32> {
    let preference = cls.room_preference.as_ref();
    let priority = preference.and_then(|p| p.priority);

    let mut eligible: Vec<&Room> = rooms
        .iter()
        .filter(|r| {
            let capacity_ok = !constraints.enforce_capacity || r.fits(cls.estimated_students);
            let kind_ok =
                constraints.room_type != RoomTypeRule::Strict || session.matches(r.kind);
            capacity_ok && kind_ok
        })
        .collect();

    // Stable sort: ties keep input order.
    eligible.sort_by_key(|r| {
        if priority == Some(r.id) {
            (0, 0)
        } else if let Some(pos) = preference.and_then(|p| p.options.iter().position(|&o| o == r.id))
        {
            (1, pos)
        } else if session.matches(r.kind) {
            (2, 0)
        } else {
            (3, 0)
        }
    });

    eligible.into_iter().map(|r| r.id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RoomPreference, TimeOfDay, Weekday};

    fn grid() -> TimeGrid {
        TimeGrid::generate(TimeOfDay::new(8, 0), TimeOfDay::new(17, 0), 30, None)
    }

    fn rooms() -> Vec<Room> {
        vec![
            Room::lecture(1).with_capacity(50),
            Room::lecture(2).with_capacity(20),
            Room::lab(3).with_capacity(40),
        ]
    }

    #[test]
    fn test_lecture_and_lab_tasks() {
        let classes = vec![ClassOffering::new(41, "CS101")
            .with_lecture_hours(3.0)
            .with_lab_hours(2.0)
            .with_block(1)
            .with_students(30)];
        let tasks = decompose_offerings(&classes, &rooms(), &SolverConstraints::default(), &grid());

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].session, SessionType::Lecture);
        assert_eq!(tasks[0].duration_min, 180);
        assert_eq!(tasks[0].slots_needed, 6);
        assert_eq!(tasks[1].session, SessionType::Lab);
        assert_eq!(tasks[1].duration_min, 120);
        assert_eq!(tasks[1].slots_needed, 4);
    }

    #[test]
    fn test_split_lecture_halves() {
        let classes = vec![ClassOffering::new(41, "CS101")
            .with_lecture_hours(3.0)
            .with_split_lecture()
            .with_students(10)];
        let tasks = decompose_offerings(&classes, &rooms(), &SolverConstraints::default(), &grid());

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].split, Some(SplitHalf::First));
        assert_eq!(tasks[1].split, Some(SplitHalf::Second));
        // 1.5 h each → 90 min → 3 slots of 30 min.
        for t in &tasks {
            assert_eq!(t.duration_min, 90);
            assert_eq!(t.slots_needed, 3);
        }
        assert!(tasks[0].is_sibling_of(&tasks[1]));
    }

    #[test]
    fn test_fractional_hours_round_up_slots() {
        let classes = vec![ClassOffering::new(1, "CS101")
            .with_lecture_hours(1.25)
            .with_students(10)];
        let tasks = decompose_offerings(&classes, &rooms(), &SolverConstraints::default(), &grid());
        assert_eq!(tasks[0].duration_min, 75);
        assert_eq!(tasks[0].slots_needed, 3); // ceil(75 / 30)
    }

    #[test]
    fn test_lecture_days_explicit_bypass_exclusions() {
        let constraints = SolverConstraints::default().with_excluded_days([Weekday::Monday]);
        let classes = vec![ClassOffering::new(1, "CS101")
            .with_lecture_hours(2.0)
            .with_lab_hours(2.0)
            .with_students(10)
            .with_lecture_days([Weekday::Monday, Weekday::Wednesday])];
        let tasks = decompose_offerings(&classes, &rooms(), &constraints, &grid());

        // Explicit list wins for the lecture, even over exclusions.
        assert_eq!(
            tasks[0].candidate_days,
            vec![Weekday::Monday, Weekday::Wednesday]
        );
        // The lab ignores lecture_days and honors exclusions.
        assert_eq!(
            tasks[1].candidate_days,
            vec![
                Weekday::Tuesday,
                Weekday::Wednesday,
                Weekday::Thursday,
                Weekday::Friday
            ]
        );
    }

    #[test]
    fn test_capacity_filter() {
        let classes = vec![ClassOffering::new(1, "CS101")
            .with_lecture_hours(2.0)
            .with_students(30)];
        let tasks = decompose_offerings(&classes, &rooms(), &SolverConstraints::default(), &grid());
        // Room 2 (capacity 20) filtered out; strict kind excludes the lab.
        assert_eq!(tasks[0].candidate_rooms, vec![1]);

        let relaxed = SolverConstraints::default().with_capacity(false);
        let tasks = decompose_offerings(&classes, &rooms(), &relaxed, &grid());
        assert_eq!(tasks[0].candidate_rooms, vec![1, 2]);
    }

    #[test]
    fn test_strict_vs_soft_room_kind() {
        let classes = vec![ClassOffering::new(1, "CS101")
            .with_lab_hours(2.0)
            .with_students(10)];

        let strict = SolverConstraints::default();
        let tasks = decompose_offerings(&classes, &rooms(), &strict, &grid());
        assert_eq!(tasks[0].candidate_rooms, vec![3]);

        let soft = SolverConstraints::default().with_room_type(RoomTypeRule::Soft);
        let tasks = decompose_offerings(&classes, &rooms(), &soft, &grid());
        // All rooms eligible; the kind-matched lab sorts first.
        assert_eq!(tasks[0].candidate_rooms, vec![3, 1, 2]);
    }

    #[test]
    fn test_room_preference_ordering() {
        let classes = vec![ClassOffering::new(1, "CS101")
            .with_lecture_hours(2.0)
            .with_students(10)
            .with_room_preference(RoomPreference::priority(2).with_options(vec![1]))];
        let soft = SolverConstraints::default().with_room_type(RoomTypeRule::Soft);
        let tasks = decompose_offerings(&classes, &rooms(), &soft, &grid());
        // Priority room first, then options, then the kind-matched rest.
        assert_eq!(tasks[0].candidate_rooms, vec![2, 1, 3]);
    }

    #[test]
    fn test_no_session_hours_no_tasks() {
        let classes = vec![ClassOffering::new(1, "CS101")];
        let tasks = decompose_offerings(&classes, &rooms(), &SolverConstraints::default(), &grid());
        assert!(tasks.is_empty());
    }

    #[test]
    fn test_task_metadata_carried() {
        let classes = vec![ClassOffering::new(41, "CS101")
            .with_lecture_hours(2.0)
            .with_instructor(9)
            .with_block(4)
            .with_students(10)
            .with_room_preference(RoomPreference::priority(1))];
        let tasks = decompose_offerings(&classes, &rooms(), &SolverConstraints::default(), &grid());

        let t = &tasks[0];
        assert_eq!(t.class_id, 41);
        assert_eq!(t.subject_code, "CS101");
        assert_eq!(t.instructor_id, Some(9));
        assert_eq!(t.block_id, 4);
        assert_eq!(t.preferred_room, Some(1));
        assert_eq!(t.key(), "41_Lecture");
    }
}
