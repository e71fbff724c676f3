//! Boundary to the external content generator.
//!
//! The provider's internals are opaque. Whatever it returns is checked
//! for structural sanity here before it can reach application state.

use crate::{Exercise, UserProfile, WorkoutCurriculum};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

pub const DAYS_PER_WEEK: usize = 7;
pub const ALTERNATIVE_COUNT: usize = 3;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("malformed provider response: {0}")]
    Malformed(String),

    #[error("provider IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("provider JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Best-effort reading of an activity screenshot
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityAnalysis {
    #[serde(default)]
    pub activity_type: Option<String>,
    /// Minutes
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub calories: Option<u32>,
    #[serde(default)]
    pub summary: Option<String>,
}

pub trait ContentProvider {
    fn generate_plan(
        &self,
        profile: &UserProfile,
        language: &str,
    ) -> Result<WorkoutCurriculum, ProviderError>;

    fn suggest_alternatives(
        &self,
        exercise_name: &str,
        equipment: &[String],
        language: &str,
    ) -> Result<Vec<Exercise>, ProviderError>;

    fn analyze_activity_image(
        &self,
        image: &[u8],
        language: &str,
    ) -> Result<ActivityAnalysis, ProviderError>;

    /// None when no visual could be produced; callers may retry
    fn render_exercise_visual(&self, exercise_name: &str) -> Result<Option<String>, ProviderError>;
}

fn validate_exercise(exercise: &Exercise, at: &str) -> Result<(), ProviderError> {
    if exercise.name.trim().is_empty() {
        return Err(ProviderError::Malformed(format!("{}: exercise has no name", at)));
    }
    if exercise.sets == 0 {
        return Err(ProviderError::Malformed(format!(
            "{}: '{}' has zero sets",
            at, exercise.name
        )));
    }
    Ok(())
}

/// Structural checks on a generated curriculum
pub fn validate_curriculum(plan: &WorkoutCurriculum) -> Result<(), ProviderError> {
    if plan.weeks.is_empty() {
        return Err(ProviderError::Malformed("curriculum has no weeks".into()));
    }
    for (w, week) in plan.weeks.iter().enumerate() {
        if week.schedule.len() != DAYS_PER_WEEK {
            return Err(ProviderError::Malformed(format!(
                "week {} has {} days, expected {}",
                w,
                week.schedule.len(),
                DAYS_PER_WEEK
            )));
        }
        for (d, day) in week.schedule.iter().enumerate() {
            for (i, exercise) in day.exercises.iter().enumerate() {
                validate_exercise(exercise, &format!("w{}-d{}-ex{}", w, d, i))?;
            }
        }
    }
    Ok(())
}

/// Between one and `ALTERNATIVE_COUNT` named exercises
pub fn validate_alternatives(alternatives: &[Exercise]) -> Result<(), ProviderError> {
    if alternatives.is_empty() {
        return Err(ProviderError::Malformed("no alternatives returned".into()));
    }
    if alternatives.len() > ALTERNATIVE_COUNT {
        return Err(ProviderError::Malformed(format!(
            "{} alternatives returned, expected at most {}",
            alternatives.len(),
            ALTERNATIVE_COUNT
        )));
    }
    for (i, exercise) in alternatives.iter().enumerate() {
        validate_exercise(exercise, &format!("alternative {}", i))?;
    }
    Ok(())
}

/// Provider serving pre-generated content from JSON files.
///
/// The plan file holds a `WorkoutCurriculum`; the alternatives file maps
/// exercise name to a list of `Exercise`.
pub struct JsonFileProvider {
    plan_file: Option<PathBuf>,
    alternatives_file: Option<PathBuf>,
}

impl JsonFileProvider {
    pub fn new(plan_file: Option<PathBuf>, alternatives_file: Option<PathBuf>) -> Self {
        Self {
            plan_file,
            alternatives_file,
        }
    }
}

impl ContentProvider for JsonFileProvider {
    fn generate_plan(
        &self,
        profile: &UserProfile,
        language: &str,
    ) -> Result<WorkoutCurriculum, ProviderError> {
        let path = self
            .plan_file
            .as_ref()
            .ok_or_else(|| ProviderError::Unavailable("no plan file configured".into()))?;
        tracing::info!(
            "Loading plan from {:?} for {:?} goal ({})",
            path,
            profile.goal,
            language
        );
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn suggest_alternatives(
        &self,
        exercise_name: &str,
        _equipment: &[String],
        _language: &str,
    ) -> Result<Vec<Exercise>, ProviderError> {
        let path = self
            .alternatives_file
            .as_ref()
            .ok_or_else(|| ProviderError::Unavailable("no alternatives file configured".into()))?;
        let contents = std::fs::read_to_string(path)?;
        let mut by_name: HashMap<String, Vec<Exercise>> = serde_json::from_str(&contents)?;
        let mut alternatives = by_name.remove(exercise_name).unwrap_or_default();
        alternatives.truncate(ALTERNATIVE_COUNT);
        Ok(alternatives)
    }

    fn analyze_activity_image(
        &self,
        _image: &[u8],
        _language: &str,
    ) -> Result<ActivityAnalysis, ProviderError> {
        Err(ProviderError::Unavailable(
            "image analysis needs a generative provider".into(),
        ))
    }

    fn render_exercise_visual(&self, _exercise_name: &str) -> Result<Option<String>, ProviderError> {
        Ok(None)
    }
}
