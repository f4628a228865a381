//! # DCM Core
//!
//! Model-level building blocks for bipedal motion planning with the
//! three-dimensional Divergent Component of Motion (DCM).
//!
//! The formulas follow the unified walking/running/jumping model of
//! Mesesan et al., "Unified Motion Planner for Walking, Running, and Jumping
//! Using the Three-Dimensional Divergent Component of Motion"
//! (IEEE Transactions on Robotics, 2023).
//!
//! ## Modules
//!
//! - [`setpoint`]: Time-stamped 3D waypoints
//! - [`trajectory`]: Dense time-sampled trajectories built from setpoints
//! - [`math`]: Interpolation helpers
//! - [`dynamics`]: Pendulum model and closed-form segment solutions
//! - [`error`]: Model construction errors

pub mod setpoint;
pub mod trajectory;
pub mod math;
pub mod dynamics;
pub mod error;

pub use setpoint::Setpoint;
pub use trajectory::Trajectory;
pub use error::ModelError;

/// Gravity constant [m/s²]
pub const GRAVITY: f64 = 9.81;

/// Number of dense samples for `n` setpoints with `density` interior
/// points per segment: `(f+1)·n - f`.
///
/// Returns `None` if the count does not fit in `usize`.
pub fn sample_count(num_setpoints: usize, density: usize) -> Option<usize> {
    if num_setpoints == 0 {
        return Some(0);
    }
    density
        .checked_add(1)?
        .checked_mul(num_setpoints)
        .map(|total| total - density)
}
