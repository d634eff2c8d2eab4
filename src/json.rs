//! JSON output structures for `--format json`.
//!
//! This module provides consistent JSON output formats across all commands.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Standard JSON success response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSuccess<T> {
    pub success: bool,
    #[serde(flatten)]
    pub data: T,
}

impl<T> JsonSuccess<T> {
    /// Create a new success response
    pub const fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Standard JSON error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonError {
    pub success: bool,
    pub error: ErrorDetail,
}

/// Detailed error information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (`SCREAMING_SNAKE_CASE`)
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Semantic exit code (1-3)
    pub exit_code: i32,
}

impl From<&Error> for JsonError {
    fn from(error: &Error) -> Self {
        Self {
            success: false,
            error: ErrorDetail {
                code: error.code().to_string(),
                message: error.to_string(),
                exit_code: error.exit_code(),
            },
        }
    }
}
