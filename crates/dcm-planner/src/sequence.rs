//! Validated VRP setpoint sequences
//!
//! The model assumes every segment lasts the same time T, taken from the
//! first two setpoints. Everything downstream relies on the checks made
//! here, so malformed input is rejected before any stage runs.

use serde::Serialize;

use dcm_core::Setpoint;

use crate::error::{PlannerError, PlannerResult};

/// Relative tolerance on segment durations
pub const UNIFORM_SPACING_TOLERANCE: f64 = 1e-9;

/// VRP setpoints on a uniform, strictly increasing time grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VrpSequence {
    setpoints: Vec<Setpoint>,
    segment_duration: f64,
}

impl VrpSequence {
    pub fn new(setpoints: Vec<Setpoint>) -> PlannerResult<Self> {
        if setpoints.len() < 2 {
            return Err(PlannerError::TooFewSetpoints(setpoints.len()));
        }

        if let Some(index) = setpoints.iter().position(|s| !s.is_finite()) {
            return Err(PlannerError::NonFiniteSetpoint { index });
        }

        for (i, pair) in setpoints.windows(2).enumerate() {
            if pair[1].t <= pair[0].t {
                return Err(PlannerError::NonMonotonicTime {
                    index: i + 1,
                    previous: pair[0].t,
                    current: pair[1].t,
                });
            }
        }

        let segment_duration = setpoints[1].t - setpoints[0].t;
        let tolerance = UNIFORM_SPACING_TOLERANCE * segment_duration.max(1.0);
        for (i, pair) in setpoints.windows(2).enumerate().skip(1) {
            let duration = pair[1].t - pair[0].t;
            if (duration - segment_duration).abs() > tolerance {
                return Err(PlannerError::NonUniformSpacing {
                    index: i,
                    expected: segment_duration,
                    got: duration,
                });
            }
        }

        Ok(Self {
            setpoints,
            segment_duration,
        })
    }

    pub fn setpoints(&self) -> &[Setpoint] {
        &self.setpoints
    }

    pub fn len(&self) -> usize {
        self.setpoints.len()
    }

    /// Always false: a sequence holds at least two setpoints
    pub fn is_empty(&self) -> bool {
        self.setpoints.is_empty()
    }

    pub fn num_segments(&self) -> usize {
        self.setpoints.len() - 1
    }

    /// Segment duration T
    pub fn segment_duration(&self) -> f64 {
        self.segment_duration
    }

    pub fn first(&self) -> &Setpoint {
        &self.setpoints[0]
    }

    pub fn last(&self) -> &Setpoint {
        &self.setpoints[self.setpoints.len() - 1]
    }

    pub fn start_time(&self) -> f64 {
        self.first().t
    }

    pub fn end_time(&self) -> f64 {
        self.last().t
    }

    pub fn times(&self) -> Vec<f64> {
        self.setpoints.iter().map(|s| s.t).collect()
    }
}
