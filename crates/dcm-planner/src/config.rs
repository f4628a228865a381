//! Planner configuration
//!
//! Parameters fixed for the lifetime of one planning run.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use dcm_core::dynamics::{natural_time_constant, Pendulum};
use dcm_core::Setpoint;

use crate::error::{PlannerError, PlannerResult};
use crate::interpolate::MAX_INTERPOLATION_DENSITY;

/// Main planner configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Height offset Δz between COM and VRP [m]
    pub pendulum_height: f64,
    /// Interior samples inserted between consecutive setpoints
    pub interpolation_density: usize,
    /// Evaluate interior samples of the exponential interpolators on the
    /// rayon thread pool
    pub parallel: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            pendulum_height: 0.5,
            interpolation_density: 10,
            parallel: false,
        }
    }
}

impl PlannerConfig {
    pub fn new(pendulum_height: f64) -> Self {
        Self {
            pendulum_height,
            ..Self::default()
        }
    }

    pub fn with_density(mut self, density: usize) -> Self {
        self.interpolation_density = density;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> PlannerResult<()> {
        natural_time_constant(self.pendulum_height)?;
        if self.interpolation_density > MAX_INTERPOLATION_DENSITY {
            return Err(PlannerError::InvalidDensity {
                density: self.interpolation_density,
                limit: MAX_INTERPOLATION_DENSITY,
            });
        }
        Ok(())
    }

    /// b = sqrt(Δz/g)
    pub fn natural_time_constant(&self) -> PlannerResult<f64> {
        Ok(natural_time_constant(self.pendulum_height)?)
    }

    pub fn pendulum(&self) -> PlannerResult<Pendulum> {
        Ok(Pendulum::new(self.pendulum_height)?)
    }

    pub fn from_json(json: &str) -> PlannerResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> PlannerResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Boundary conditions of one plan
///
/// The DCM is pinned at the end of the plan and the COM at its start, which
/// is why the two setpoint recursions run in opposite directions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryConditions {
    /// COM position at the first setpoint time
    pub initial_com: Vector3<f64>,
    /// DCM position at the last setpoint time. `None` places the terminal
    /// DCM on the last VRP setpoint.
    #[serde(default)]
    pub terminal_dcm: Option<Vector3<f64>>,
}

impl BoundaryConditions {
    pub fn new(initial_com: Vector3<f64>) -> Self {
        Self {
            initial_com,
            terminal_dcm: None,
        }
    }

    pub fn with_terminal_dcm(mut self, terminal_dcm: Vector3<f64>) -> Self {
        self.terminal_dcm = Some(terminal_dcm);
        self
    }

    pub fn validate(&self) -> PlannerResult<()> {
        if !self.initial_com.iter().all(|v| v.is_finite()) {
            return Err(PlannerError::InvalidBoundary(format!(
                "initial COM {:?} is not finite",
                self.initial_com.as_slice()
            )));
        }
        if let Some(dcm) = &self.terminal_dcm {
            if !dcm.iter().all(|v| v.is_finite()) {
                return Err(PlannerError::InvalidBoundary(format!(
                    "terminal DCM {:?} is not finite",
                    dcm.as_slice()
                )));
            }
        }
        Ok(())
    }

    /// Terminal DCM stamped at the last VRP setpoint's time
    pub fn terminal_dcm_setpoint(&self, last_vrp: &Setpoint) -> Setpoint {
        let position = self.terminal_dcm.unwrap_or(last_vrp.position);
        Setpoint::new(last_vrp.t, position)
    }

    /// Initial COM stamped at the first VRP setpoint's time
    pub fn initial_com_setpoint(&self, first_vrp: &Setpoint) -> Setpoint {
        Setpoint::new(first_vrp.t, self.initial_com)
    }
}

/// One complete planning input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    #[serde(default)]
    pub config: PlannerConfig,
    pub vrp_setpoints: Vec<Setpoint>,
    pub boundary: BoundaryConditions,
}

impl PlanRequest {
    pub fn from_json(json: &str) -> PlannerResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> PlannerResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
