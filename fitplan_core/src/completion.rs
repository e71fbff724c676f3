//! Day and exercise completion tracking.
//!
//! Cascade rules:
//! - Invariant A: toggling a day sets or clears every exercise of that day,
//!   so a completed day always has all its exercises complete afterwards.
//! - Exercise toggles never write `completed_days`. Completing the last
//!   open exercise of a day only yields a pending-completion signal, and
//!   un-completing an exercise of a completed day leaves the day complete.
//!
//! Every transition takes `&self` and returns a new state value.
//! Ids outside the plan are a caller bug and panic.

use crate::{DayId, ExerciseId, WorkoutCurriculum};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionState {
    pub completed_days: BTreeSet<DayId>,
    pub completed_exercises: BTreeSet<ExerciseId>,
}

/// Outcome of an exercise toggle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExerciseToggle {
    Unchanged,
    /// Every exercise of the day is now complete but the day is not;
    /// the caller decides whether to commit it.
    DayEligibleForCompletion(DayId),
}

impl CompletionState {
    pub fn is_day_complete(&self, day: DayId) -> bool {
        self.completed_days.contains(&day)
    }

    pub fn is_exercise_complete(&self, exercise: ExerciseId) -> bool {
        self.completed_exercises.contains(&exercise)
    }

    /// Flip a day, cascading to all of its exercises
    pub fn toggle_day(&self, plan: &WorkoutCurriculum, day: DayId) -> Self {
        let mut next = self.clone();
        let exercises: Vec<ExerciseId> = plan.exercise_ids(day).collect();

        if next.completed_days.remove(&day) {
            for id in &exercises {
                next.completed_exercises.remove(id);
            }
            tracing::debug!("Day {} marked incomplete, cleared {} exercises", day, exercises.len());
        } else {
            next.completed_days.insert(day);
            next.completed_exercises.extend(exercises.iter().copied());
            tracing::debug!("Day {} marked complete, set {} exercises", day, exercises.len());
        }

        next
    }

    /// Flip a single exercise. Never touches `completed_days`.
    pub fn toggle_exercise(
        &self,
        plan: &WorkoutCurriculum,
        exercise: ExerciseId,
    ) -> (Self, ExerciseToggle) {
        let day_plan = plan.expect_day(exercise.day);
        assert!(
            exercise.index < day_plan.exercises.len(),
            "exercise {} is outside the current plan",
            exercise
        );

        let mut next = self.clone();
        if next.completed_exercises.remove(&exercise) {
            // Un-completing never demotes the owning day
            return (next, ExerciseToggle::Unchanged);
        }

        next.completed_exercises.insert(exercise);
        let day = exercise.day;
        let all_done = plan
            .exercise_ids(day)
            .all(|id| next.completed_exercises.contains(&id));

        let signal = if all_done && !next.completed_days.contains(&day) {
            tracing::debug!("All exercises of {} complete, day eligible", day);
            ExerciseToggle::DayEligibleForCompletion(day)
        } else {
            ExerciseToggle::Unchanged
        };

        (next, signal)
    }

    /// Commit a day after a pending-completion signal.
    ///
    /// Unlike `toggle_day` this is not a flip: an already-complete day is
    /// left as is.
    pub fn commit_day(&self, plan: &WorkoutCurriculum, day: DayId) -> Self {
        if self.is_day_complete(day) {
            return self.clone();
        }
        let mut next = self.clone();
        next.completed_days.insert(day);
        next.completed_exercises.extend(plan.exercise_ids(day));
        next
    }

    /// (completed, total) exercises of a day
    pub fn day_progress(&self, plan: &WorkoutCurriculum, day: DayId) -> (usize, usize) {
        let total = plan.expect_day(day).exercises.len();
        let done = plan
            .exercise_ids(day)
            .filter(|id| self.completed_exercises.contains(id))
            .count();
        (done, total)
    }

    /// (completed, workout) days of a week; rest days are not counted
    pub fn week_progress(&self, plan: &WorkoutCurriculum, week: usize) -> (usize, usize) {
        let schedule = match plan.weeks.get(week) {
            Some(w) => &w.schedule,
            None => panic!("week {} is outside the current plan", week),
        };

        schedule
            .iter()
            .enumerate()
            .filter(|(_, day)| !day.is_rest_day())
            .fold((0, 0), |(done, total), (d, _)| {
                let complete = self.completed_days.contains(&DayId::new(week, d));
                (done + usize::from(complete), total + 1)
            })
    }

    /// Completed workout days as a fraction of all workout days, 0.0..=1.0
    pub fn overall_progress(&self, plan: &WorkoutCurriculum) -> f64 {
        let (done, total) = (0..plan.weeks.len())
            .map(|w| self.week_progress(plan, w))
            .fold((0, 0), |(d, t), (wd, wt)| (d + wd, t + wt));
        if total == 0 {
            0.0
        } else {
            done as f64 / total as f64
        }
    }

    /// Drop ids that no longer address anything in `plan`
    pub fn retain_valid(&self, plan: &WorkoutCurriculum) -> Self {
        Self {
            completed_days: self
                .completed_days
                .iter()
                .copied()
                .filter(|id| plan.day(*id).is_some())
                .collect(),
            completed_exercises: self
                .completed_exercises
                .iter()
                .copied()
                .filter(|id| plan.exercise(*id).is_some())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixtures;

    const MONDAY: DayId = DayId { week: 0, day: 0 };
    const TUESDAY: DayId = DayId { week: 0, day: 1 };

    // Only cascade-consistent starts: every day is either fully complete
    // or has none of its exercises done.
    #[test]
    fn test_toggle_day_twice_restores_state() {
        let plan = fixtures::plan();
        let start = CompletionState::default()
            .toggle_day(&plan, TUESDAY)
            .toggle_day(&plan, DayId::new(1, 3));

        for day in plan.day_ids() {
            let twice = start.toggle_day(&plan, day).toggle_day(&plan, day);
            assert_eq!(twice, start, "double toggle of {} changed state", day);
        }
    }

    #[test]
    fn test_toggle_day_twice_drops_partial_exercises() {
        let plan = fixtures::plan();
        let (start, _) = CompletionState::default().toggle_exercise(&plan, MONDAY.exercise(0));

        let twice = start.toggle_day(&plan, MONDAY).toggle_day(&plan, MONDAY);
        assert_ne!(twice, start);
        assert_eq!(twice, CompletionState::default());
    }

    #[test]
    fn test_toggle_day_adds_and_removes_exactly_its_exercises() {
        let plan = fixtures::plan();
        let other = DayId::new(1, 0).exercise(0);
        let start = CompletionState::default().toggle_exercise(&plan, other).0;

        let done = start.toggle_day(&plan, TUESDAY);
        assert!(done.is_day_complete(TUESDAY));
        assert_eq!(done.completed_exercises.len(), start.completed_exercises.len() + 4);
        for i in 0..4 {
            assert!(done.is_exercise_complete(TUESDAY.exercise(i)));
        }

        let undone = done.toggle_day(&plan, TUESDAY);
        assert_eq!(undone.completed_exercises, start.completed_exercises);
        assert!(undone.is_exercise_complete(other));
    }

    #[test]
    fn test_toggle_day_from_partial_completes_all() {
        let plan = fixtures::plan();
        let state = CompletionState::default()
            .toggle_exercise(&plan, MONDAY.exercise(0))
            .0
            .toggle_day(&plan, MONDAY);
        assert_eq!(state.day_progress(&plan, MONDAY), (3, 3));
    }

    #[test]
    fn test_last_exercise_signals_once() {
        let plan = fixtures::plan();
        let state = CompletionState::default();

        let (state, a) = state.toggle_exercise(&plan, MONDAY.exercise(0));
        let (state, b) = state.toggle_exercise(&plan, MONDAY.exercise(1));
        assert_eq!(a, ExerciseToggle::Unchanged);
        assert_eq!(b, ExerciseToggle::Unchanged);

        let (state, c) = state.toggle_exercise(&plan, MONDAY.exercise(2));
        assert_eq!(c, ExerciseToggle::DayEligibleForCompletion(MONDAY));
        assert!(!state.is_day_complete(MONDAY));

        let state = state.commit_day(&plan, MONDAY);
        assert!(state.is_day_complete(MONDAY));
    }

    #[test]
    fn test_no_signal_when_day_already_complete() {
        let plan = fixtures::plan();
        let state = CompletionState::default().toggle_day(&plan, MONDAY);

        let (state, off) = state.toggle_exercise(&plan, MONDAY.exercise(2));
        let (_, on) = state.toggle_exercise(&plan, MONDAY.exercise(2));
        assert_eq!(off, ExerciseToggle::Unchanged);
        assert_eq!(on, ExerciseToggle::Unchanged);
    }

    #[test]
    fn test_uncompleting_exercise_keeps_day_complete() {
        let plan = fixtures::plan();
        let state = CompletionState::default().toggle_day(&plan, MONDAY);

        let (state, _) = state.toggle_exercise(&plan, MONDAY.exercise(1));
        assert!(state.is_day_complete(MONDAY));
        assert!(!state.is_exercise_complete(MONDAY.exercise(1)));
        assert_eq!(state.day_progress(&plan, MONDAY), (2, 3));
    }

    #[test]
    fn test_toggle_exercise_twice_restores_state() {
        let plan = fixtures::plan();
        let start = CompletionState::default().toggle_day(&plan, TUESDAY);
        for id in [MONDAY.exercise(0), TUESDAY.exercise(3)] {
            let (once, _) = start.toggle_exercise(&plan, id);
            let (twice, _) = once.toggle_exercise(&plan, id);
            assert_eq!(twice, start);
        }
    }

    #[test]
    fn test_single_exercise_day_signals_immediately() {
        let plan = fixtures::plan();
        let thursday = DayId::new(0, 3);
        let (_, signal) = CompletionState::default().toggle_exercise(&plan, thursday.exercise(0));
        assert_eq!(signal, ExerciseToggle::DayEligibleForCompletion(thursday));
    }

    #[test]
    fn test_commit_day_is_idempotent() {
        let plan = fixtures::plan();
        let once = CompletionState::default().commit_day(&plan, MONDAY);
        assert_eq!(once.commit_day(&plan, MONDAY), once);
    }

    #[test]
    fn test_week_progress_excludes_rest_days() {
        let plan = fixtures::plan();
        let state = CompletionState::default()
            .toggle_day(&plan, MONDAY)
            .toggle_day(&plan, DayId::new(0, 4)); // "Active rest"
        // Monday, Tuesday, Thursday are the workout days
        assert_eq!(state.week_progress(&plan, 0), (1, 3));
        assert!((state.overall_progress(&plan) - 1.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_retain_valid_drops_stale_ids() {
        let plan = fixtures::plan();
        let mut state = CompletionState::default().toggle_day(&plan, MONDAY);
        state.completed_days.insert(DayId::new(9, 0));
        state.completed_exercises.insert(MONDAY.exercise(10));

        let cleaned = state.retain_valid(&plan);
        assert_eq!(cleaned, CompletionState::default().toggle_day(&plan, MONDAY));
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_exercise_panics() {
        let plan = fixtures::plan();
        let _ = CompletionState::default().toggle_exercise(&plan, MONDAY.exercise(3));
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_day_panics() {
        let plan = fixtures::plan();
        let _ = CompletionState::default().toggle_day(&plan, DayId::new(0, 7));
    }
}
