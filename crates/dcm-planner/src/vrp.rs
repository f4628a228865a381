//! VRP trajectory interpolation (Eq. 10)
//!
//! The VRP moves on a straight line between consecutive setpoints.

use tracing::debug;

use dcm_core::dynamics::SegmentConstants;
use dcm_core::math::blend;
use dcm_core::Trajectory;

use crate::error::{PlannerResult, Stage};
use crate::interpolate::{densify, ensure_finite};
use crate::sequence::VrpSequence;

/// Expand VRP setpoints into a dense, linearly interpolated trajectory.
///
/// Boundary samples are exact copies of the setpoints. Interior samples
/// blend the segment's endpoints by `elapsed / T`.
pub fn interpolate(
    vrps: &VrpSequence,
    constants: &SegmentConstants,
    density: usize,
) -> PlannerResult<Trajectory> {
    let setpoints = vrps.setpoints();
    let trajectory = densify(setpoints, density, false, |segment, elapsed| {
        let (_, s) = constants.vrp_weights(elapsed);
        blend(&setpoints[segment].position, &setpoints[segment + 1].position, s)
    })?;
    ensure_finite(Stage::VrpTrajectory, trajectory.samples())?;

    debug!(
        setpoints = vrps.len(),
        samples = trajectory.len(),
        "Interpolated VRP trajectory"
    );
    Ok(trajectory)
}
