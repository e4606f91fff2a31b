//! Planner error types.

use crate::domain::{InvalidStop, TimeError};

/// Failures a route query can end in.
///
/// `InvalidInput` and `StopNotFound` are deterministic for a given input.
/// `UpstreamUnavailable` is safe to retry with backoff; the core itself
/// never retries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// The caller supplied something malformed
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The upstream planner knows no stop by this name
    #[error("no stop found matching {0:?}")]
    StopNotFound(String),

    /// The upstream planner could not be reached or answered badly
    #[error("upstream planner unavailable: {0}")]
    UpstreamUnavailable(String),
}

impl PlanError {
    /// Returns true if retrying the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PlanError::UpstreamUnavailable(_))
    }
}

impl From<TimeError> for PlanError {
    fn from(e: TimeError) -> Self {
        PlanError::InvalidInput(e.to_string())
    }
}

impl From<InvalidStop> for PlanError {
    fn from(e: InvalidStop) -> Self {
        PlanError::InvalidInput(e.to_string())
    }
}
