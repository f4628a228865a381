//! 3D DCM pendulum model
//!
//! The DCM ξ and the VRP ν are related to the COM x by
//!
//! ξ = x + b·ẋ
//! ẋ = -(x - ξ)/b
//! ξ̇ = (ξ - ν)/b
//!
//! where b = sqrt(Δz/g) is the natural time constant of a pendulum whose
//! VRP sits Δz below the COM.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::GRAVITY;

/// Pendulum parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pendulum {
    /// Height offset Δz between COM and VRP [m]
    pub height: f64,
    /// Natural time constant b [s]
    pub time_constant: f64,
}

impl Pendulum {
    /// Create from a positive, finite height offset
    pub fn new(height: f64) -> Result<Self, ModelError> {
        Ok(Self {
            height,
            time_constant: natural_time_constant(height)?,
        })
    }

    /// COM velocity implied by the current DCM: ẋ = (ξ - x)/b
    pub fn com_velocity(&self, com: &Vector3<f64>, dcm: &Vector3<f64>) -> Vector3<f64> {
        (dcm - com) / self.time_constant
    }

    /// DCM velocity driven by the current VRP: ξ̇ = (ξ - ν)/b
    pub fn dcm_velocity(&self, dcm: &Vector3<f64>, vrp: &Vector3<f64>) -> Vector3<f64> {
        (dcm - vrp) / self.time_constant
    }

    /// DCM of a COM state: ξ = x + b·ẋ
    pub fn dcm_from_com(&self, com: &Vector3<f64>, com_velocity: &Vector3<f64>) -> Vector3<f64> {
        com + com_velocity * self.time_constant
    }

    /// Total force on the COM implied by a VRP, per unit mass:
    /// F/m = (x - ν)/b²
    pub fn force_per_mass(&self, com: &Vector3<f64>, vrp: &Vector3<f64>) -> Vector3<f64> {
        (com - vrp) / (self.time_constant * self.time_constant)
    }
}

/// b = sqrt(Δz/g)
pub fn natural_time_constant(height: f64) -> Result<f64, ModelError> {
    if !height.is_finite() || height <= 0.0 {
        return Err(ModelError::InvalidPendulumHeight(height));
    }
    Ok((height / GRAVITY).sqrt())
}
