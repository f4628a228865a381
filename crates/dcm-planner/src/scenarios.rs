//! Canned VRP sequences
//!
//! Ready-made plan requests for walking, hopping and the reference ramp
//! used throughout the tests.
//!
//! Gravity is folded into the VRP: a COM standing still at height h has its
//! VRP at height h, and the pendulum height offset Δz is the COM height
//! above the contact point.

use nalgebra::Vector3;

use dcm_core::setpoint::from_rows;
use dcm_core::Setpoint;

use crate::config::{BoundaryConditions, PlanRequest, PlannerConfig};

/// Three setpoints climbing a straight ramp in one second per segment
///
/// Δz = 0.5, VRPs at t = 0, 1, 2 along x = 0, 2.5, 5 and z = 0, 5, 10,
/// initial COM (0, 0, 5), terminal DCM defaulted to the last VRP.
pub fn ramp_example() -> PlanRequest {
    PlanRequest {
        config: PlannerConfig::new(0.5).with_density(10),
        vrp_setpoints: from_rows(
            &[0.0, 1.0, 2.0],
            &[0.0, 2.5, 5.0],
            &[0.0, 0.0, 0.0],
            &[0.0, 5.0, 10.0],
        ),
        boundary: BoundaryConditions::new(Vector3::new(0.0, 0.0, 5.0)),
    }
}

/// Flat-ground walking parameters
#[derive(Debug, Clone, Copy)]
pub struct WalkParams {
    /// Number of single-support steps
    pub num_steps: usize,
    /// Forward advance per step [m]
    pub step_length: f64,
    /// Lateral distance between the feet [m]
    pub step_width: f64,
    /// Duration of one step [s]
    pub step_duration: f64,
    /// COM height above the ground [m]
    pub com_height: f64,
}

impl Default for WalkParams {
    fn default() -> Self {
        Self {
            num_steps: 6,
            step_length: 0.25,
            step_width: 0.2,
            step_duration: 0.7,
            com_height: 0.8,
        }
    }
}

/// Straight walk starting and ending with the VRP between the feet
///
/// Footsteps alternate left and right, starting with the left foot.
pub fn straight_walk(params: &WalkParams) -> PlanRequest {
    let h = params.com_height;
    let half_width = params.step_width / 2.0;
    let mut setpoints = Vec::with_capacity(params.num_steps + 2);

    setpoints.push(Setpoint::from_components(0.0, 0.0, 0.0, h));
    for k in 1..=params.num_steps {
        let side = if k % 2 == 1 { half_width } else { -half_width };
        setpoints.push(Setpoint::from_components(
            k as f64 * params.step_duration,
            k as f64 * params.step_length,
            side,
            h,
        ));
    }
    let last = params.num_steps + 1;
    setpoints.push(Setpoint::from_components(
        last as f64 * params.step_duration,
        params.num_steps as f64 * params.step_length,
        0.0,
        h,
    ));

    PlanRequest {
        config: PlannerConfig::new(h),
        vrp_setpoints: setpoints,
        boundary: BoundaryConditions::new(Vector3::new(0.0, 0.0, h)),
    }
}

/// Hopping parameters
#[derive(Debug, Clone, Copy)]
pub struct HopParams {
    /// Number of hops
    pub num_hops: usize,
    /// Forward advance per hop [m]
    pub hop_length: f64,
    /// Extra VRP height during the push-off [m]
    pub push_height: f64,
    /// Duration of one stance or push phase [s]
    pub phase_duration: f64,
    /// COM height above the ground [m]
    pub com_height: f64,
}

impl Default for HopParams {
    fn default() -> Self {
        Self {
            num_hops: 3,
            hop_length: 0.3,
            push_height: 0.15,
            phase_duration: 0.4,
            com_height: 0.8,
        }
    }
}

/// In-place or forward hopping: the VRP alternates between stance height
/// and a raised push-off point, producing vertical COM oscillation
pub fn hop_sequence(params: &HopParams) -> PlanRequest {
    let h = params.com_height;
    let phases = 2 * params.num_hops + 1;
    let setpoints = (0..phases)
        .map(|k| {
            let hop = (k / 2) as f64;
            let z = if k % 2 == 1 { h + params.push_height } else { h };
            let x = if k % 2 == 1 {
                (hop + 0.5) * params.hop_length
            } else {
                hop * params.hop_length
            };
            Setpoint::from_components(k as f64 * params.phase_duration, x, 0.0, z)
        })
        .collect();

    PlanRequest {
        config: PlannerConfig::new(h),
        vrp_setpoints: setpoints,
        boundary: BoundaryConditions::new(Vector3::new(0.0, 0.0, h)),
    }
}
