//! Error types for model construction.

use thiserror::Error;

/// Errors raised when building model-level quantities.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// Pendulum height offset must be strictly positive and finite.
    #[error("Invalid pendulum height offset: {0} (must be positive and finite)")]
    InvalidPendulumHeight(f64),

    /// Segment duration must be strictly positive and finite.
    #[error("Invalid segment duration: {0} (must be positive and finite)")]
    InvalidSegmentDuration(f64),
}
