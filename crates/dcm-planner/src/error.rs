//! Planner errors
//!
//! Every failure is a caller or input bug surfaced synchronously; nothing is
//! retried or recovered internally.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use dcm_core::ModelError;

/// Outputs produced by the planning pipeline, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    VrpTrajectory,
    DcmSetpoints,
    DcmTrajectory,
    ComSetpoints,
    ComTrajectory,
}

impl Stage {
    /// Stages whose outputs must exist before this stage can run
    pub fn prerequisites(&self) -> &'static [Stage] {
        match self {
            Stage::VrpTrajectory | Stage::DcmSetpoints => &[],
            Stage::DcmTrajectory => &[Stage::VrpTrajectory, Stage::DcmSetpoints],
            Stage::ComSetpoints => &[Stage::DcmSetpoints],
            Stage::ComTrajectory => &[
                Stage::VrpTrajectory,
                Stage::DcmTrajectory,
                Stage::ComSetpoints,
            ],
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::VrpTrajectory => "VRP trajectory",
            Stage::DcmSetpoints => "DCM setpoints",
            Stage::DcmTrajectory => "DCM trajectory",
            Stage::ComSetpoints => "COM setpoints",
            Stage::ComTrajectory => "COM trajectory",
        };
        f.write_str(name)
    }
}

/// Planner errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlannerError {
    #[error("At least two VRP setpoints are required, got {0}")]
    TooFewSetpoints(usize),
    #[error("Setpoint {index} has a non-finite component")]
    NonFiniteSetpoint { index: usize },
    #[error("Setpoint times must be strictly increasing: t[{index}] = {current} follows {previous}")]
    NonMonotonicTime {
        index: usize,
        previous: f64,
        current: f64,
    },
    #[error("Non-uniform segment duration at segment {index}: expected {expected}, got {got}")]
    NonUniformSpacing {
        index: usize,
        expected: f64,
        got: f64,
    },
    #[error("Model error: {0}")]
    Model(#[from] ModelError),
    #[error("Invalid boundary condition: {0}")]
    InvalidBoundary(String),
    #[error("{stage} requires {requires} to be computed first")]
    PrerequisiteNotComputed { stage: Stage, requires: Stage },
    #[error("{0} has not been computed")]
    StageNotComputed(Stage),
    #[error("Trajectory grid mismatch: expected {expected} samples, got {got}")]
    GridMismatch { expected: usize, got: usize },
    #[error("Numeric degeneracy in {stage}: {detail}")]
    NumericDegeneracy { stage: Stage, detail: String },
    #[error("Invalid interpolation density: {density} (at most {limit})")]
    InvalidDensity { density: usize, limit: usize },
    #[error("Invalid sample rate: {0} Hz (must be positive and finite)")]
    InvalidSampleRate(f64),
    #[error("Sampling at {rate_hz} Hz needs more than {limit} references")]
    TooManySamples { rate_hz: f64, limit: usize },
    #[error("Invalid plan: {0}")]
    InvalidPlan(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for PlannerError {
    fn from(err: serde_json::Error) -> Self {
        PlannerError::Serialization(err.to_string())
    }
}

/// Result type for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlannerError::TooFewSetpoints(1);
        assert_eq!(format!("{err}"), "At least two VRP setpoints are required, got 1");

        let err = PlannerError::PrerequisiteNotComputed {
            stage: Stage::ComTrajectory,
            requires: Stage::DcmTrajectory,
        };
        assert_eq!(
            format!("{err}"),
            "COM trajectory requires DCM trajectory to be computed first"
        );
    }

    #[test]
    fn test_model_error_conversion() {
        let err: PlannerError = ModelError::InvalidPendulumHeight(-1.0).into();
        assert!(matches!(err, PlannerError::Model(_)));
        assert!(format!("{err}").contains("-1"));
    }

    #[test]
    fn test_prerequisites_precede_stage() {
        let order = [
            Stage::VrpTrajectory,
            Stage::DcmSetpoints,
            Stage::DcmTrajectory,
            Stage::ComSetpoints,
            Stage::ComTrajectory,
        ];
        for (i, stage) in order.iter().enumerate() {
            for req in stage.prerequisites() {
                let pos = order.iter().position(|s| s == req).unwrap();
                assert!(pos < i, "{req} must run before {stage}");
            }
        }
    }
}
