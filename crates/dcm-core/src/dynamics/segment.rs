//! Closed-form solutions over one segment
//!
//! Within a segment of duration T the VRP moves linearly from ν₀ to ν₁
//! (Eq. 10). Solving ξ̇ = (ξ - ν)/b backward from the segment's terminal
//! DCM ξ_T gives Eq. 11, and solving ẋ = (ξ - x)/b forward from the
//! segment's initial COM x₀ gives Eq. 13. Evaluating both at the segment
//! ends gives the setpoint recursions Eq. 12 and Eq. 14.
//!
//! With frac = b/T, ε = e^(-T/b) and elapsed time t ∈ [0, T]:
//!
//! ```text
//! ξ(t) = (1 - t/T - frac + frac·g)ν₀ + (t/T + frac - (frac+1)·g)ν₁ + g·ξ_T,   g = e^((t-T)/b)
//! x(t) = (1 - E - t/T + frac·s)ν₀ + (t/T - (frac+1)·s)ν₁ + s·ξ_T + E·x₀,      E = e^(-t/b), s = ε·sinh(t/b)
//! ```
//!
//! The product ε·sinh is always evaluated as a difference of decaying
//! exponentials so that short time constants never overflow `sinh`.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::dynamics::Pendulum;
use crate::error::ModelError;

/// Constants shared by every segment of a uniformly timed plan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentConstants {
    /// Natural time constant b [s]
    pub time_constant: f64,
    /// Segment duration T [s]
    pub duration: f64,
    /// b/T
    pub ratio: f64,
    /// e^(-T/b)
    pub decay: f64,
    /// e^(-T/b)·sinh(T/b)
    pub decay_sinh: f64,
}

impl SegmentConstants {
    pub fn new(time_constant: f64, duration: f64) -> Result<Self, ModelError> {
        if !time_constant.is_finite() || time_constant <= 0.0 {
            return Err(ModelError::InvalidPendulumHeight(time_constant));
        }
        if !duration.is_finite() || duration <= 0.0 {
            return Err(ModelError::InvalidSegmentDuration(duration));
        }

        let b = time_constant;
        let t = duration;
        Ok(Self {
            time_constant: b,
            duration: t,
            ratio: b / t,
            decay: (-t / b).exp(),
            // (1 - e^(-2T/b)) / 2
            decay_sinh: -0.5 * (-2.0 * t / b).exp_m1(),
        })
    }

    pub fn from_pendulum(pendulum: &Pendulum, duration: f64) -> Result<Self, ModelError> {
        Self::new(pendulum.time_constant, duration)
    }

    /// Eq. 10 weights (start, end) at elapsed time `t`
    pub fn vrp_weights(&self, t: f64) -> (f64, f64) {
        let s = t / self.duration;
        (1.0 - s, s)
    }

    /// Eq. 11 weights at elapsed time `t`
    pub fn dcm_weights(&self, t: f64) -> DcmWeights {
        let frac = self.ratio;
        let s = t / self.duration;
        let g = ((t - self.duration) / self.time_constant).exp();
        DcmWeights {
            vrp_start: 1.0 - s - frac + frac * g,
            vrp_end: s + frac - (frac + 1.0) * g,
            dcm_end: g,
        }
    }

    /// Eq. 12 weights: the DCM at a segment's start from its VRP endpoints
    /// and terminal DCM
    pub fn dcm_setpoint_weights(&self) -> DcmWeights {
        let frac = self.ratio;
        let e = self.decay;
        DcmWeights {
            vrp_start: 1.0 - frac + frac * e,
            vrp_end: frac - (frac + 1.0) * e,
            dcm_end: e,
        }
    }

    /// Eq. 13 weights at elapsed time `t`
    pub fn com_weights(&self, t: f64) -> ComWeights {
        let frac = self.ratio;
        let b = self.time_constant;
        let s = t / self.duration;
        let decay_t = (-t / b).exp();
        // e^(-T/b)·sinh(t/b)
        let decay_sinh_t =
            0.5 * (((t - self.duration) / b).exp() - (-(t + self.duration) / b).exp());
        ComWeights {
            vrp_start: 1.0 - decay_t - s + frac * decay_sinh_t,
            vrp_end: s - (frac + 1.0) * decay_sinh_t,
            dcm_end: decay_sinh_t,
            com_start: decay_t,
        }
    }

    /// Eq. 14 weights: the COM at a segment's end from its VRP endpoints,
    /// terminal DCM and initial COM
    pub fn com_setpoint_weights(&self) -> ComWeights {
        let frac = self.ratio;
        let e = self.decay;
        let es = self.decay_sinh;
        ComWeights {
            vrp_start: frac * es - e,
            vrp_end: 1.0 - (frac + 1.0) * es,
            dcm_end: es,
            com_start: e,
        }
    }
}

/// Weights of the DCM closed form
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DcmWeights {
    pub vrp_start: f64,
    pub vrp_end: f64,
    pub dcm_end: f64,
}

impl DcmWeights {
    pub fn apply(
        &self,
        vrp_start: &Vector3<f64>,
        vrp_end: &Vector3<f64>,
        dcm_end: &Vector3<f64>,
    ) -> Vector3<f64> {
        vrp_start * self.vrp_start + vrp_end * self.vrp_end + dcm_end * self.dcm_end
    }

    pub fn sum(&self) -> f64 {
        self.vrp_start + self.vrp_end + self.dcm_end
    }
}

/// Weights of the COM closed form
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComWeights {
    pub vrp_start: f64,
    pub vrp_end: f64,
    pub dcm_end: f64,
    pub com_start: f64,
}

impl ComWeights {
    pub fn apply(
        &self,
        vrp_start: &Vector3<f64>,
        vrp_end: &Vector3<f64>,
        dcm_end: &Vector3<f64>,
        com_start: &Vector3<f64>,
    ) -> Vector3<f64> {
        vrp_start * self.vrp_start
            + vrp_end * self.vrp_end
            + dcm_end * self.dcm_end
            + com_start * self.com_start
    }

    pub fn sum(&self) -> f64 {
        self.vrp_start + self.vrp_end + self.dcm_end + self.com_start
    }
}
