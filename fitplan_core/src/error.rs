//! Error types for the fitplan_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for fitplan_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The content provider failed or returned unusable output.
    /// Prior profile/plan state is left untouched when this is returned.
    #[error("Plan generation failed: {0}")]
    Generation(String),

    /// A day or exercise id string could not be parsed
    #[error("Invalid id: {0}")]
    InvalidId(String),

    /// Operation requires state that is not present (e.g. no plan loaded)
    #[error("State error: {0}")]
    State(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<crate::provider::ProviderError> for Error {
    fn from(err: crate::provider::ProviderError) -> Self {
        Error::Generation(err.to_string())
    }
}
