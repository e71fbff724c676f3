//! Core domain types for the FitPlan system.
//!
//! This module defines the fundamental types used throughout the system:
//! - The user profile collected at onboarding
//! - The curriculum tree (weeks, days, exercises)
//! - Positional day/exercise identifiers
//! - Progress samples and workout log records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

// ============================================================================
// Profile Types
// ============================================================================

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Primary training goal
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FitnessGoal {
    WeightLoss,
    MuscleGain,
    Endurance,
    Flexibility,
    GeneralFitness,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

/// Profile collected at onboarding; replaced wholesale on regeneration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub age: u32,
    /// Height in centimetres
    pub height: f64,
    /// Weight in kilograms
    pub weight: f64,
    pub gender: Gender,
    pub goal: FitnessGoal,
    pub experience_level: ExperienceLevel,
    pub equipment: Vec<String>,
    pub days_per_week: u8,
    /// Session length in minutes
    pub session_duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub injuries: Option<String>,
}

impl UserProfile {
    /// Read a profile from a JSON file, as produced by onboarding
    pub fn load(path: &Path) -> crate::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let profile: UserProfile = serde_json::from_str(&contents)?;
        tracing::debug!("Loaded profile from {:?}", path);
        Ok(profile)
    }
}

// ============================================================================
// Curriculum Types
// ============================================================================

/// A single prescribed exercise
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub name: String,
    pub sets: u32,
    /// Free text, e.g. "8-12" or "30s"
    pub reps: String,
    /// Free text, parsed by the rest timer
    pub rest: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

/// One calendar day within a week
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    pub day_name: String,
    pub focus: String,
    pub estimated_duration: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

impl DayPlan {
    /// Rest days are excluded from completion accounting
    pub fn is_rest_day(&self) -> bool {
        self.exercises.is_empty() || self.focus.to_lowercase().contains("rest")
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPlan {
    pub week_number: u32,
    pub focus: String,
    /// One entry per calendar day
    pub schedule: Vec<DayPlan>,
}

/// The full multi-week program returned by generation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutCurriculum {
    pub program_name: String,
    pub description: String,
    #[serde(default)]
    pub nutrition_tips: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    pub weeks: Vec<WeeklyPlan>,
}

impl WorkoutCurriculum {
    /// Look up a day by id, returning None when out of range
    pub fn day(&self, id: DayId) -> Option<&DayPlan> {
        self.weeks.get(id.week)?.schedule.get(id.day)
    }

    /// Look up a day by id; panics on an out-of-range id
    pub fn expect_day(&self, id: DayId) -> &DayPlan {
        match self.day(id) {
            Some(day) => day,
            None => panic!("day {} is outside the current plan", id),
        }
    }

    pub fn exercise(&self, id: ExerciseId) -> Option<&Exercise> {
        self.day(id.day)?.exercises.get(id.index)
    }

    /// Every day id in plan order
    pub fn day_ids(&self) -> impl Iterator<Item = DayId> + '_ {
        self.weeks.iter().enumerate().flat_map(|(w, week)| {
            (0..week.schedule.len()).map(move |d| DayId::new(w, d))
        })
    }

    /// Every exercise id of a day, in order
    pub fn exercise_ids(&self, day: DayId) -> impl Iterator<Item = ExerciseId> {
        let count = self.expect_day(day).exercises.len();
        (0..count).map(move |i| ExerciseId::new(day, i))
    }

    pub fn exercise_count(&self) -> usize {
        self.weeks
            .iter()
            .flat_map(|w| &w.schedule)
            .map(|d| d.exercises.len())
            .sum()
    }
}

// ============================================================================
// Positional Identifiers
// ============================================================================

/// Positional day key, `w<week>-d<day>`.
///
/// Bound to the array position, not the day's content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DayId {
    pub week: usize,
    pub day: usize,
}

impl DayId {
    pub fn new(week: usize, day: usize) -> Self {
        Self { week, day }
    }

    pub fn exercise(self, index: usize) -> ExerciseId {
        ExerciseId::new(self, index)
    }
}

impl fmt::Display for DayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}-d{}", self.week, self.day)
    }
}

impl FromStr for DayId {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let invalid = || crate::Error::InvalidId(s.to_string());
        let (week, day) = s.split_once('-').ok_or_else(invalid)?;
        let week = week.strip_prefix('w').ok_or_else(invalid)?;
        let day = day.strip_prefix('d').ok_or_else(invalid)?;
        Ok(Self {
            week: week.parse().map_err(|_| invalid())?,
            day: day.parse().map_err(|_| invalid())?,
        })
    }
}

impl TryFrom<String> for DayId {
    type Error = crate::Error;

    fn try_from(value: String) -> crate::Result<Self> {
        value.parse()
    }
}

impl From<DayId> for String {
    fn from(id: DayId) -> Self {
        id.to_string()
    }
}

/// Positional exercise key, `<dayId>-ex<index>`.
///
/// Reordering or substituting an exercise leaves this key (and any
/// completion recorded under it) in place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExerciseId {
    pub day: DayId,
    pub index: usize,
}

impl ExerciseId {
    pub fn new(day: DayId, index: usize) -> Self {
        Self { day, index }
    }
}

impl fmt::Display for ExerciseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-ex{}", self.day, self.index)
    }
}

impl FromStr for ExerciseId {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let invalid = || crate::Error::InvalidId(s.to_string());
        let (day, index) = s.rsplit_once("-ex").ok_or_else(invalid)?;
        Ok(Self {
            day: day.parse().map_err(|_| invalid())?,
            index: index.parse().map_err(|_| invalid())?,
        })
    }
}

impl TryFrom<String> for ExerciseId {
    type Error = crate::Error;

    fn try_from(value: String) -> crate::Result<Self> {
        value.parse()
    }
}

impl From<ExerciseId> for String {
    fn from(id: ExerciseId) -> Self {
        id.to_string()
    }
}

// ============================================================================
// Progress and Log Types
// ============================================================================

/// A body-weight sample
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProgressEntry {
    pub date: NaiveDate,
    pub weight: f64,
}

/// A completed or externally logged session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutLog {
    pub id: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_id: Option<DayId>,
    pub day_name: String,
    pub focus: String,
    /// Minutes
    pub duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,
}
