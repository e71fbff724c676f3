//! Application state owner.
//!
//! `FitnessApp` holds every piece of mutable state and the injected
//! persistence. Each operation computes the next value, commits it in
//! memory, then mirrors it to storage. Storage failures never undo a
//! committed transition.

use crate::completion::{CompletionState, ExerciseToggle};
use crate::ledger::ProgressLedger;
use crate::logbook::{new_log_id, WorkoutLogBook};
use crate::mutator;
use crate::persistence::{Persistence, StorageKey};
use crate::provider::{validate_alternatives, validate_curriculum, ContentProvider};
use crate::store::KeyValueStore;
use crate::stores::{PlanStore, ProfileStore, VisualCache};
use crate::{
    DayId, Error, Exercise, ExerciseId, ProgressEntry, Result, UserProfile, WorkoutCurriculum,
    WorkoutLog,
};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Manual fields for a workout log; the id is assigned on commit
#[derive(Clone, Debug, Default)]
pub struct LogDraft {
    pub date: Option<NaiveDate>,
    pub day_id: Option<DayId>,
    pub day_name: String,
    pub focus: String,
    pub duration: u32,
    pub notes: Option<String>,
    pub image_url: Option<String>,
    pub calories: Option<u32>,
}

pub struct FitnessApp<S: KeyValueStore> {
    persistence: Persistence<S>,
    profile: ProfileStore,
    plan: PlanStore,
    completion: CompletionState,
    progress: ProgressLedger,
    logs: WorkoutLogBook,
    visuals: VisualCache,
}

impl<S: KeyValueStore> FitnessApp<S> {
    /// Restore every snapshot; anything unreadable falls back to empty
    pub fn load(persistence: Persistence<S>) -> Self {
        let profile = ProfileStore::load(&persistence);
        let plan = PlanStore::load(&persistence);

        let completed_days: BTreeSet<DayId> =
            persistence.load(StorageKey::CompletedDays, BTreeSet::new());
        let completed_exercises: BTreeSet<ExerciseId> =
            persistence.load(StorageKey::CompletedExercises, BTreeSet::new());
        let completion = CompletionState {
            completed_days,
            completed_exercises,
        };
        let completion = match plan.get() {
            Some(p) => completion.retain_valid(p),
            None => CompletionState::default(),
        };

        let progress = ProgressLedger::from_entries(persistence.load(StorageKey::Progress, vec![]));
        let logs = WorkoutLogBook::from_logs(persistence.load(StorageKey::WorkoutLogs, vec![]));
        let visuals = VisualCache::load(&persistence);

        tracing::info!(
            "Loaded state: plan={}, {} days done, {} progress entries, {} logs",
            plan.get().is_some(),
            completion.completed_days.len(),
            progress.len(),
            logs.len()
        );

        Self {
            persistence,
            profile,
            plan,
            completion,
            progress,
            logs,
            visuals,
        }
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.get()
    }

    pub fn plan(&self) -> Option<&Arc<WorkoutCurriculum>> {
        self.plan.get()
    }

    pub fn completion(&self) -> &CompletionState {
        &self.completion
    }

    pub fn progress(&self) -> &ProgressLedger {
        &self.progress
    }

    pub fn logs(&self) -> &WorkoutLogBook {
        &self.logs
    }

    pub fn visuals(&self) -> &VisualCache {
        &self.visuals
    }

    fn require_plan(&self) -> Result<Arc<WorkoutCurriculum>> {
        self.plan
            .get()
            .cloned()
            .ok_or_else(|| Error::State("no workout plan; run generate first".into()))
    }

    /// Ids from the CLI and other untrusted callers are range-checked here
    /// so the engine below can treat a bad index as a bug.
    fn check_day(plan: &WorkoutCurriculum, day: DayId) -> Result<()> {
        plan.day(day)
            .map(|_| ())
            .ok_or_else(|| Error::InvalidId(format!("{} is not in the plan", day)))
    }

    fn check_exercise(plan: &WorkoutCurriculum, exercise: ExerciseId) -> Result<()> {
        plan.exercise(exercise)
            .map(|_| ())
            .ok_or_else(|| Error::InvalidId(format!("{} is not in the plan", exercise)))
    }

    /// Empty sets are cleared from storage rather than written as `[]`
    fn commit_completion(&mut self, next: CompletionState) {
        self.completion = next;
        let days = &self.completion.completed_days;
        self.persistence
            .save_or_clear(StorageKey::CompletedDays, Some(days).filter(|d| !d.is_empty()));
        let exercises = &self.completion.completed_exercises;
        self.persistence.save_or_clear(
            StorageKey::CompletedExercises,
            Some(exercises).filter(|e| !e.is_empty()),
        );
    }

    fn commit_plan(&mut self, plan: Option<WorkoutCurriculum>) {
        self.plan.set(&mut self.persistence, plan);
    }

    /// Generate a new plan. On any failure nothing is changed.
    pub fn generate_plan<P: ContentProvider + ?Sized>(
        &mut self,
        provider: &P,
        profile: UserProfile,
        language: &str,
        today: NaiveDate,
    ) -> Result<Arc<WorkoutCurriculum>> {
        let mut plan = provider.generate_plan(&profile, language).map_err(|e| {
            tracing::warn!("Plan generation failed: {}", e);
            Error::from(e)
        })?;
        validate_curriculum(&plan).map_err(|e| {
            tracing::warn!("Rejected generated plan: {}", e);
            Error::from(e)
        })?;

        plan.start_date.get_or_insert(today);
        tracing::info!("Generated '{}' with {} weeks", plan.program_name, plan.weeks.len());

        self.profile.set(&mut self.persistence, Some(profile));
        self.commit_plan(Some(plan));
        self.commit_completion(CompletionState::default());
        self.require_plan()
    }

    /// Drop the plan, profile and completion. History is kept.
    pub fn reset(&mut self) {
        self.profile.set(&mut self.persistence, None);
        self.commit_plan(None);
        self.commit_completion(CompletionState::default());
        tracing::info!("Plan reset");
    }

    pub fn toggle_day(&mut self, day: DayId) -> Result<bool> {
        let plan = self.require_plan()?;
        Self::check_day(&plan, day)?;
        let next = self.completion.toggle_day(&plan, day);
        let complete = next.is_day_complete(day);
        self.commit_completion(next);
        Ok(complete)
    }

    pub fn toggle_exercise(&mut self, exercise: ExerciseId) -> Result<ExerciseToggle> {
        let plan = self.require_plan()?;
        Self::check_exercise(&plan, exercise)?;
        let (next, outcome) = self.completion.toggle_exercise(&plan, exercise);
        self.commit_completion(next);
        Ok(outcome)
    }

    /// Accept a pending-completion signal
    pub fn commit_day(&mut self, day: DayId) -> Result<()> {
        let plan = self.require_plan()?;
        Self::check_day(&plan, day)?;
        let next = self.completion.commit_day(&plan, day);
        self.commit_completion(next);
        Ok(())
    }

    pub fn move_exercise(&mut self, week: usize, day: usize, from: usize, to: usize) -> Result<()> {
        let plan = self.require_plan()?;
        let id = DayId::new(week, day);
        Self::check_exercise(&plan, id.exercise(from))?;
        Self::check_exercise(&plan, id.exercise(to))?;
        let next = mutator::move_exercise(&plan, week, day, from, to);
        self.commit_plan(Some(next));
        Ok(())
    }

    pub fn swap_exercise(&mut self, id: ExerciseId, replacement: Exercise) -> Result<()> {
        let plan = self.require_plan()?;
        Self::check_exercise(&plan, id)?;
        let next = mutator::swap_exercise(&plan, id.day.week, id.day.day, id.index, replacement);
        self.commit_plan(Some(next));
        Ok(())
    }

    /// Candidate replacements for an exercise, using the profile's equipment
    pub fn suggest_alternatives<P: ContentProvider + ?Sized>(
        &self,
        provider: &P,
        id: ExerciseId,
        language: &str,
    ) -> Result<Vec<Exercise>> {
        let plan = self.require_plan()?;
        Self::check_exercise(&plan, id)?;
        let name = &plan.expect_day(id.day).exercises[id.index].name;
        let equipment = self
            .profile
            .get()
            .map(|p| p.equipment.clone())
            .unwrap_or_default();

        let alternatives = provider.suggest_alternatives(name, &equipment, language)?;
        validate_alternatives(&alternatives)?;
        Ok(alternatives)
    }

    pub fn add_progress(&mut self, entry: ProgressEntry) {
        self.progress = self.progress.add(entry);
        self.persistence.save(StorageKey::Progress, &self.progress);
    }

    /// Record a log, newest first. Returns the assigned id.
    pub fn log_workout(&mut self, draft: LogDraft, today: NaiveDate) -> String {
        let log = WorkoutLog {
            id: new_log_id(),
            date: draft.date.unwrap_or(today),
            day_id: draft.day_id,
            day_name: draft.day_name,
            focus: draft.focus,
            duration: draft.duration,
            notes: draft.notes,
            image_url: draft.image_url,
            calories: draft.calories,
        };
        let id = log.id.clone();
        self.logs = self.logs.append(log);
        self.persistence.save(StorageKey::WorkoutLogs, &self.logs);
        id
    }

    /// Prefill a draft from an activity screenshot. On analysis failure
    /// the draft is returned unchanged for manual entry.
    pub fn prefill_from_image<P: ContentProvider + ?Sized>(
        provider: &P,
        image: &[u8],
        language: &str,
        mut draft: LogDraft,
    ) -> LogDraft {
        match provider.analyze_activity_image(image, language) {
            Ok(analysis) => {
                if let Some(activity) = analysis.activity_type {
                    draft.focus = activity;
                }
                if let Some(duration) = analysis.duration {
                    draft.duration = duration;
                }
                draft.calories = analysis.calories.or(draft.calories);
                draft.notes = analysis.summary.or(draft.notes);
            }
            Err(e) => tracing::warn!("Activity analysis failed, using manual entry: {}", e),
        }
        draft
    }

    /// Cached visual for an exercise, rendering and caching on a miss.
    /// A failed render leaves the slot empty so it can be retried.
    pub fn exercise_visual<P: ContentProvider + ?Sized>(
        &mut self,
        provider: &P,
        exercise_name: &str,
    ) -> Option<String> {
        if let Some(cached) = self.visuals.get(exercise_name) {
            return Some(cached.to_string());
        }
        match provider.render_exercise_visual(exercise_name) {
            Ok(Some(reference)) => {
                self.visuals
                    .insert(&mut self.persistence, exercise_name, reference.clone());
                Some(reference)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Visual for '{}' failed: {}", exercise_name, e);
                None
            }
        }
    }
}
