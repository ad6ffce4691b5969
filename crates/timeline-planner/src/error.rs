//! Planner error types.

use thiserror::Error;

/// Errors raised by the plumbing around the planning core.
///
/// The core computations themselves never fail: malformed or out-of-window
/// coordinates clamp, and a rejected timer start is reported through
/// [`crate::timer::StartRejected`].
#[derive(Debug, Error)]
pub enum PlannerError {
    /// SQLite error.
    #[error("SQLite error: {0}")]
    Store(#[from] rusqlite::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML error.
    #[error("TOML error: {0}")]
    Toml(String),

    /// Referenced entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rejected user input.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Timer pulse channel closed.
    #[error("Pulse error: {0}")]
    Pulse(String),
}

impl From<toml::de::Error> for PlannerError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e.to_string())
    }
}

impl From<toml::ser::Error> for PlannerError {
    fn from(e: toml::ser::Error) -> Self {
        Self::Toml(e.to_string())
    }
}

/// Result type for planner operations.
pub type PlannerResult<T> = Result<T, PlannerError>;
