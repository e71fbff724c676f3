//! Fail-soft snapshot persistence over a `KeyValueStore`.
//!
//! Reads degrade to a default and writes degrade to a logged no-op.
//! Nothing here returns an error: in-memory state stays authoritative.

use crate::store::KeyValueStore;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Snapshot keys, one independently loaded value each
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageKey {
    Profile,
    Plan,
    CompletedDays,
    CompletedExercises,
    Progress,
    WorkoutLogs,
    ExerciseVisuals,
}

impl StorageKey {
    pub const ALL: [StorageKey; 7] = [
        StorageKey::Profile,
        StorageKey::Plan,
        StorageKey::CompletedDays,
        StorageKey::CompletedExercises,
        StorageKey::Progress,
        StorageKey::WorkoutLogs,
        StorageKey::ExerciseVisuals,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StorageKey::Profile => "profile",
            StorageKey::Plan => "plan",
            StorageKey::CompletedDays => "completedDays",
            StorageKey::CompletedExercises => "completedExercises",
            StorageKey::Progress => "progress",
            StorageKey::WorkoutLogs => "workoutLogs",
            StorageKey::ExerciseVisuals => "exerciseVisuals",
        }
    }
}

pub struct Persistence<S> {
    store: S,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Load a snapshot, falling back to `default` on any failure
    pub fn load<T: DeserializeOwned>(&self, key: StorageKey, default: T) -> T {
        let raw = match self.store.get(key.as_str()) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!("No stored value for {}, using default", key.as_str());
                return default;
            }
            Err(e) => {
                tracing::warn!("Unable to read {}: {}. Using default.", key.as_str(), e);
                return default;
            }
        };

        match serde_json::from_str::<T>(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to parse {}: {}. Using default.", key.as_str(), e);
                default
            }
        }
    }

    /// Serialize and write; failures are logged and dropped
    pub fn save<T: Serialize + ?Sized>(&mut self, key: StorageKey, value: &T) {
        let contents = match serde_json::to_string(value) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::error!("Failed to serialize {}: {}", key.as_str(), e);
                return;
            }
        };

        if let Err(e) = self.store.set(key.as_str(), &contents) {
            tracing::error!("Failed to save {}: {}", key.as_str(), e);
        }
    }

    /// Save `Some`, clear on `None`
    pub fn save_or_clear<T: Serialize>(&mut self, key: StorageKey, value: Option<&T>) {
        match value {
            Some(value) => self.save(key, value),
            None => self.clear(key),
        }
    }

    pub fn clear(&mut self, key: StorageKey) {
        if let Err(e) = self.store.remove(key.as_str()) {
            tracing::error!("Failed to clear {}: {}", key.as_str(), e);
        }
    }
}
