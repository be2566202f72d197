//! Error types
//!
//! `ConfigError` is fatal and surfaces at startup. `ScoringError` terminates
//! a single request or dashboard interaction.

use std::path::PathBuf;
use thiserror::Error;

/// Missing or malformed static configuration / artifacts
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Per-request scoring failure
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("unknown model: {0}")]
    UnknownModel(String),

    #[error("model invocation failed: {0}")]
    ModelInvocation(String),

    #[error("invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    Configuration(#[from] ConfigError),
}

pub type ScoringResult<T> = Result<T, ScoringError>;
