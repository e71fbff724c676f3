#![forbid(unsafe_code)]

//! Core domain model and state engine for FitPlan.
//!
//! This crate provides:
//! - Domain types (profile, curriculum tree, positional ids, logs)
//! - Fail-soft persistence over a key/value store
//! - Completion tracking, plan edits, rest timer, progress and log history
//! - The provider boundary for externally generated content
//! - The `FitnessApp` controller that owns all of the above

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod store;
pub mod persistence;
pub mod stores;
pub mod completion;
pub mod mutator;
pub mod timer;
pub mod ledger;
pub mod logbook;
pub mod provider;
pub mod export;
pub mod controller;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use persistence::{Persistence, StorageKey};
pub use completion::{CompletionState, ExerciseToggle};
pub use timer::{parse_rest_seconds, RestTimer, TimerDriver, TimerState};
pub use ledger::ProgressLedger;
pub use logbook::WorkoutLogBook;
pub use provider::{ContentProvider, JsonFileProvider, ProviderError};
pub use controller::{FitnessApp, LogDraft};
