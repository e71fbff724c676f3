//! Plan edits: reordering and substituting exercises.
//!
//! Every edit borrows the current snapshot and returns a new one, so a
//! holder of the old snapshot still sees the old structure. Completion
//! records are not touched; they stay bound to positions.

use crate::{Exercise, WorkoutCurriculum};

/// Position of an exercise within the plan
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExerciseSlot {
    pub week: usize,
    pub day: usize,
    pub index: usize,
}

impl ExerciseSlot {
    pub fn new(week: usize, day: usize, index: usize) -> Self {
        Self { week, day, index }
    }
}

fn exercises_mut(plan: &mut WorkoutCurriculum, week: usize, day: usize) -> &mut Vec<Exercise> {
    let weeks = plan.weeks.len();
    let week_plan = match plan.weeks.get_mut(week) {
        Some(w) => w,
        None => panic!("week {} out of range ({} weeks)", week, weeks),
    };
    let days = week_plan.schedule.len();
    match week_plan.schedule.get_mut(day) {
        Some(d) => &mut d.exercises,
        None => panic!("day {} out of range ({} days)", day, days),
    }
}

/// Move the exercise at `from` to `to` within one day, shifting the
/// exercises in between.
pub fn move_exercise(
    plan: &WorkoutCurriculum,
    week: usize,
    day: usize,
    from: usize,
    to: usize,
) -> WorkoutCurriculum {
    let mut next = plan.clone();
    let exercises = exercises_mut(&mut next, week, day);
    assert!(
        from < exercises.len() && to < exercises.len(),
        "move {} -> {} out of range ({} exercises)",
        from,
        to,
        exercises.len()
    );

    if from != to {
        let moved = exercises.remove(from);
        exercises.insert(to, moved);
        tracing::debug!("Moved exercise w{}-d{} {} -> {}", week, day, from, to);
    }
    next
}

/// Drag-and-drop entry point: only same-day moves are applied.
///
/// Returns `None` when the slots are in different days or weeks.
pub fn move_between(
    plan: &WorkoutCurriculum,
    source: ExerciseSlot,
    destination: ExerciseSlot,
) -> Option<WorkoutCurriculum> {
    if source.week != destination.week || source.day != destination.day {
        tracing::debug!("Ignoring cross-day move {:?} -> {:?}", source, destination);
        return None;
    }
    Some(move_exercise(
        plan,
        source.week,
        source.day,
        source.index,
        destination.index,
    ))
}

/// Replace the exercise at a position. The position's `ExerciseId` is
/// unchanged, so prior completion now refers to `replacement`.
pub fn swap_exercise(
    plan: &WorkoutCurriculum,
    week: usize,
    day: usize,
    index: usize,
    replacement: Exercise,
) -> WorkoutCurriculum {
    let mut next = plan.clone();
    let exercises = exercises_mut(&mut next, week, day);
    let len = exercises.len();
    match exercises.get_mut(index) {
        Some(slot) => {
            tracing::debug!("Swapping '{}' for '{}'", slot.name, replacement.name);
            *slot = replacement;
        }
        None => panic!("exercise {} out of range ({} exercises)", index, len),
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixtures::{self, names};

    #[test]
    fn test_move_forward_and_back() {
        let plan = fixtures::plan();

        let moved = move_exercise(&plan, 0, 1, 2, 0);
        assert_eq!(names(&moved.weeks[0].schedule[1]), vec!["C", "A", "B", "D"]);

        let moved = move_exercise(&plan, 0, 1, 0, 3);
        assert_eq!(names(&moved.weeks[0].schedule[1]), vec!["B", "C", "D", "A"]);
    }

    #[test]
    fn test_move_leaves_original_untouched() {
        let plan = fixtures::plan();
        let before = plan.clone();
        let moved = move_exercise(&plan, 0, 1, 2, 0);

        assert_eq!(plan, before);
        assert_ne!(moved, plan);
        // Other days are carried over as-is
        assert_eq!(moved.weeks[1], plan.weeks[1]);
    }

    #[test]
    fn test_move_same_index_is_equivalent() {
        let plan = fixtures::plan();
        assert_eq!(move_exercise(&plan, 0, 0, 1, 1), plan);
    }

    #[test]
    fn test_move_between_rejects_cross_day() {
        let plan = fixtures::plan();
        assert!(move_between(&plan, ExerciseSlot::new(0, 0, 0), ExerciseSlot::new(0, 1, 0)).is_none());
        assert!(move_between(&plan, ExerciseSlot::new(0, 1, 0), ExerciseSlot::new(1, 1, 0)).is_none());

        let moved =
            move_between(&plan, ExerciseSlot::new(0, 1, 3), ExerciseSlot::new(0, 1, 1)).unwrap();
        assert_eq!(names(&moved.weeks[0].schedule[1]), vec!["A", "D", "B", "C"]);
    }

    #[test]
    fn test_swap_replaces_in_place() {
        let plan = fixtures::plan();
        let swapped = swap_exercise(&plan, 0, 0, 1, fixtures::exercise("Z"));

        assert_eq!(names(&swapped.weeks[0].schedule[0]), vec!["A", "Z", "C"]);
        assert_eq!(names(&plan.weeks[0].schedule[0]), vec!["A", "B", "C"]);
    }

    #[test]
    #[should_panic]
    fn test_move_out_of_range_panics() {
        move_exercise(&fixtures::plan(), 0, 0, 0, 3);
    }

    #[test]
    #[should_panic]
    fn test_swap_out_of_range_panics() {
        swap_exercise(&fixtures::plan(), 2, 0, 0, fixtures::exercise("Z"));
    }
}
