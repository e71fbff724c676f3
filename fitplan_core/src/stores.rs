//! Holders for the profile, the curriculum and the visuals cache.
//!
//! Each value is replaced wholesale and mirrored to persistence on
//! every change; an absent value clears its key.

use crate::persistence::{Persistence, StorageKey};
use crate::store::KeyValueStore;
use crate::{UserProfile, WorkoutCurriculum};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct ProfileStore {
    profile: Option<UserProfile>,
}

impl ProfileStore {
    pub fn load<S: KeyValueStore>(persistence: &Persistence<S>) -> Self {
        Self {
            profile: persistence.load(StorageKey::Profile, None),
        }
    }

    pub fn get(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn set<S: KeyValueStore>(
        &mut self,
        persistence: &mut Persistence<S>,
        profile: Option<UserProfile>,
    ) {
        self.profile = profile;
        persistence.save_or_clear(StorageKey::Profile, self.profile.as_ref());
    }
}

/// Holds the current curriculum as a shared immutable snapshot
#[derive(Debug, Default)]
pub struct PlanStore {
    plan: Option<Arc<WorkoutCurriculum>>,
}

impl PlanStore {
    pub fn load<S: KeyValueStore>(persistence: &Persistence<S>) -> Self {
        let plan: Option<WorkoutCurriculum> = persistence.load(StorageKey::Plan, None);
        Self {
            plan: plan.map(Arc::new),
        }
    }

    pub fn get(&self) -> Option<&Arc<WorkoutCurriculum>> {
        self.plan.as_ref()
    }

    /// Replace the snapshot. Holders of the previous `Arc` keep seeing it.
    pub fn set<S: KeyValueStore>(
        &mut self,
        persistence: &mut Persistence<S>,
        plan: Option<WorkoutCurriculum>,
    ) {
        self.plan = plan.map(Arc::new);
        persistence.save_or_clear(StorageKey::Plan, self.plan.as_deref());
    }
}

/// Exercise name -> cached visual-aid reference
#[derive(Debug, Default)]
pub struct VisualCache {
    visuals: BTreeMap<String, String>,
}

impl VisualCache {
    pub fn load<S: KeyValueStore>(persistence: &Persistence<S>) -> Self {
        Self {
            visuals: persistence.load(StorageKey::ExerciseVisuals, BTreeMap::new()),
        }
    }

    pub fn get(&self, exercise_name: &str) -> Option<&str> {
        self.visuals.get(exercise_name).map(String::as_str)
    }

    pub fn insert<S: KeyValueStore>(
        &mut self,
        persistence: &mut Persistence<S>,
        exercise_name: &str,
        reference: String,
    ) {
        self.visuals.insert(exercise_name.to_string(), reference);
        persistence.save(StorageKey::ExerciseVisuals, &self.visuals);
    }

    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }
}
