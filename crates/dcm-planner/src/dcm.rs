//! DCM setpoints (Eq. 12) and DCM trajectory (Eq. 11)
//!
//! The DCM is pinned at the end of the plan, so setpoints are solved by a
//! backward recursion. Each step reads the DCM one setpoint later, which
//! makes the recursion strictly sequential.

use tracing::debug;

use dcm_core::dynamics::SegmentConstants;
use dcm_core::{Setpoint, Trajectory};

use crate::config::BoundaryConditions;
use crate::error::{PlannerResult, Stage};
use crate::interpolate::{densify, ensure_finite, ensure_grid};
use crate::sequence::VrpSequence;

/// Solve DCM setpoints at the VRP setpoint times.
///
/// The last entry is the terminal boundary DCM.
pub fn solve_setpoints(
    vrps: &VrpSequence,
    constants: &SegmentConstants,
    boundary: &BoundaryConditions,
) -> PlannerResult<Vec<Setpoint>> {
    let vrp = vrps.setpoints();
    let n = vrp.len();
    let weights = constants.dcm_setpoint_weights();

    let mut dcm: Vec<Setpoint> = vrp.to_vec();
    dcm[n - 1] = boundary.terminal_dcm_setpoint(&vrp[n - 1]);

    for i in (0..n - 1).rev() {
        dcm[i].position = weights.apply(
            &vrp[i].position,
            &vrp[i + 1].position,
            &dcm[i + 1].position,
        );
    }
    ensure_finite(Stage::DcmSetpoints, &dcm)?;

    debug!(setpoints = n, "Solved DCM setpoints");
    Ok(dcm)
}

/// Expand DCM setpoints into a dense trajectory on the VRP trajectory's grid.
///
/// Interior samples of a segment depend only on the segment's VRP endpoints
/// and its terminal DCM setpoint.
pub fn interpolate(
    vrp_trajectory: &Trajectory,
    dcm_setpoints: &[Setpoint],
    constants: &SegmentConstants,
    density: usize,
    parallel: bool,
) -> PlannerResult<Trajectory> {
    ensure_grid(vrp_trajectory, dcm_setpoints.len(), density)?;
    let vrp = vrp_trajectory.boundary_samples();

    let trajectory = densify(dcm_setpoints, density, parallel, |segment, elapsed| {
        constants.dcm_weights(elapsed).apply(
            &vrp[segment].position,
            &vrp[segment + 1].position,
            &dcm_setpoints[segment + 1].position,
        )
    })?;
    ensure_finite(Stage::DcmTrajectory, trajectory.samples())?;

    debug!(samples = trajectory.len(), parallel, "Interpolated DCM trajectory");
    Ok(trajectory)
}
