//! Application error types.
//!
//! All errors are explicit, typed, and recoverable - no panics allowed.

use std::path::PathBuf;

use bayesball_network::NetworkError;
use thiserror::Error;

/// Error type for the command-line front end.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read config '{path}': {reason}")]
    ConfigReadFailed { path: PathBuf, reason: String },

    #[error("TOML parse error in '{path}': {reason}")]
    ConfigParseFailed { path: PathBuf, reason: String },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid edit '{op}': {reason}")]
    InvalidEdit { op: String, reason: String },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Network(#[from] NetworkError),
}

impl Error {
    pub fn config_read_failed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ConfigReadFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn config_parse_failed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ConfigParseFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_edit(op: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEdit {
            op: op.into(),
            reason: reason.into(),
        }
    }

    /// Machine-readable error code (`SCREAMING_SNAKE_CASE`).
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ConfigReadFailed { .. } => "CONFIG_NOT_FOUND",
            Self::ConfigParseFailed { .. } => "CONFIG_PARSE_ERROR",
            Self::InvalidConfig(_) => "CONFIG_INVALID",
            Self::InvalidEdit { .. } => "INVALID_ARGUMENT",
            Self::Json(_) => "SERIALIZATION_FAILED",
            Self::Network(NetworkError::StateNotFound(_)) => "STATE_NOT_FOUND",
            Self::Network(NetworkError::NotAcyclic { .. }) => "NOT_A_DAG",
            Self::Network(NetworkError::InvalidEncoding { .. }) => "INVALID_MODEL_STRING",
        }
    }

    /// Semantic exit code.
    ///
    /// - 1: Validation errors (bad input, cyclic graph)
    /// - 2: Not found errors (missing state, missing config)
    /// - 3: System errors (serialization)
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::ConfigParseFailed { .. }
            | Self::InvalidConfig(_)
            | Self::InvalidEdit { .. }
            | Self::Network(
                NetworkError::NotAcyclic { .. } | NetworkError::InvalidEncoding { .. },
            ) => 1,
            Self::ConfigReadFailed { .. } | Self::Network(NetworkError::StateNotFound(_)) => 2,
            Self::Json(_) => 3,
        }
    }
}

/// Result type for front-end operations.
pub type Result<T> = std::result::Result<T, Error>;
