//! Error types for the hebdomad habit engine
//!
//! This module provides structured error handling using thiserror for
//! error definitions and anyhow for interop at the edges.

use thiserror::Error;

/// Main error type for hebdomad operations
#[derive(Error, Debug)]
pub enum HebdomadError {
    /// Input rejected before any I/O (empty name, zero frequency,
    /// toggle date outside the supplied week, inverted un-archive target)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Habit id absent from the store
    #[error("Habit not found: {0}")]
    NotFound(String),

    /// Archive-range state that must not be silently repaired
    /// (e.g. more than one open range)
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Database operation failed
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Result type alias for hebdomad operations
pub type Result<T> = std::result::Result<T, HebdomadError>;

impl From<anyhow::Error> for HebdomadError {
    fn from(err: anyhow::Error) -> Self {
        HebdomadError::Other(err.to_string())
    }
}

impl HebdomadError {
    /// True for failures the caller is expected to recover from by rolling
    /// back optimistic state (as opposed to rejecting the input outright).
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            HebdomadError::Storage(_) | HebdomadError::Io(_) | HebdomadError::Other(_)
        )
    }
}
