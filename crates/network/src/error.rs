//! Network-specific error types

use thiserror::Error;

use crate::model::StateIndex;

/// Errors raised by the analysis and decoding entry points.
///
/// Structural edits never produce these; they report whether they applied
/// through their return value instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("State not found: {0}")]
    StateNotFound(StateIndex),

    #[error("The graph is not a directed acyclic graph (cycles: {cycles:?})")]
    NotAcyclic { cycles: Vec<Vec<StateIndex>> },

    #[error("Invalid model string: {reason}")]
    InvalidEncoding { reason: String },
}

impl NetworkError {
    #[must_use]
    pub const fn state_not_found(index: StateIndex) -> Self {
        Self::StateNotFound(index)
    }

    #[must_use]
    pub const fn not_acyclic(cycles: Vec<Vec<StateIndex>>) -> Self {
        Self::NotAcyclic { cycles }
    }

    pub fn invalid_encoding(reason: impl Into<String>) -> Self {
        Self::InvalidEncoding {
            reason: reason.into(),
        }
    }
}

/// Result type for network operations
pub type NetworkResult<T> = std::result::Result<T, NetworkError>;
