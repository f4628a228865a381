//! COM setpoints (Eq. 14) and COM trajectory (Eq. 13)
//!
//! The COM is pinned at the start of the plan, so setpoints are solved by a
//! forward recursion that mirrors the backward DCM recursion.

use tracing::debug;

use dcm_core::dynamics::SegmentConstants;
use dcm_core::{Setpoint, Trajectory};

use crate::config::BoundaryConditions;
use crate::error::{PlannerError, PlannerResult, Stage};
use crate::interpolate::{densify, ensure_finite, ensure_grid};
use crate::sequence::VrpSequence;

/// Solve COM setpoints at the VRP setpoint times.
///
/// The first entry is the initial boundary COM.
pub fn solve_setpoints(
    vrps: &VrpSequence,
    dcm_setpoints: &[Setpoint],
    constants: &SegmentConstants,
    boundary: &BoundaryConditions,
) -> PlannerResult<Vec<Setpoint>> {
    let vrp = vrps.setpoints();
    let n = vrp.len();
    if dcm_setpoints.len() != n {
        return Err(PlannerError::GridMismatch {
            expected: n,
            got: dcm_setpoints.len(),
        });
    }
    let weights = constants.com_setpoint_weights();

    let mut com: Vec<Setpoint> = vrp.to_vec();
    com[0] = boundary.initial_com_setpoint(&vrp[0]);

    for i in 1..n {
        com[i].position = weights.apply(
            &vrp[i - 1].position,
            &vrp[i].position,
            &dcm_setpoints[i].position,
            &com[i - 1].position,
        );
    }
    ensure_finite(Stage::ComSetpoints, &com)?;

    debug!(setpoints = n, "Solved COM setpoints");
    Ok(com)
}

/// Expand COM setpoints into a dense trajectory.
///
/// Each segment reads the VRP endpoints, the DCM at the segment's terminal
/// sample and the COM at the segment's first sample.
pub fn interpolate(
    vrp_trajectory: &Trajectory,
    dcm_trajectory: &Trajectory,
    com_setpoints: &[Setpoint],
    constants: &SegmentConstants,
    density: usize,
    parallel: bool,
) -> PlannerResult<Trajectory> {
    ensure_grid(vrp_trajectory, com_setpoints.len(), density)?;
    ensure_grid(dcm_trajectory, com_setpoints.len(), density)?;
    let vrp = vrp_trajectory.boundary_samples();
    let dcm = dcm_trajectory.boundary_samples();

    let trajectory = densify(com_setpoints, density, parallel, |segment, elapsed| {
        constants.com_weights(elapsed).apply(
            &vrp[segment].position,
            &vrp[segment + 1].position,
            &dcm[segment + 1].position,
            &com_setpoints[segment].position,
        )
    })?;
    ensure_finite(Stage::ComTrajectory, trajectory.samples())?;

    debug!(samples = trajectory.len(), parallel, "Interpolated COM trajectory");
    Ok(trajectory)
}
