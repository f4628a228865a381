//! Shared densification loop
//!
//! All three trajectories use the same grid: per segment, `density + 2`
//! evenly spaced times from the segment's start to its end. Boundary samples
//! are copied from the setpoints; only interior samples are evaluated.

use nalgebra::Vector3;
use rayon::prelude::*;

use dcm_core::math::linspace;
use dcm_core::{sample_count, Setpoint, Trajectory};

use crate::error::{PlannerError, PlannerResult, Stage};

/// Upper bound on interior samples per segment
pub const MAX_INTERPOLATION_DENSITY: usize = 100_000;

/// Sample count of the grid, rejecting densities that cannot be allocated
pub fn grid_len(num_setpoints: usize, density: usize) -> PlannerResult<usize> {
    let invalid = PlannerError::InvalidDensity {
        density,
        limit: MAX_INTERPOLATION_DENSITY,
    };
    if density > MAX_INTERPOLATION_DENSITY {
        return Err(invalid);
    }
    sample_count(num_setpoints, density).ok_or(invalid)
}

/// Build a dense trajectory over `setpoints`.
///
/// `interior(segment, elapsed)` returns the position of an interior sample
/// of segment `segment` (from setpoint `segment` to `segment + 1`) at
/// `elapsed` seconds after the segment start. Interior samples of a segment
/// are independent of each other, so with `parallel` they are evaluated on
/// the rayon pool; the result is identical either way.
pub fn densify<F>(
    setpoints: &[Setpoint],
    density: usize,
    parallel: bool,
    interior: F,
) -> PlannerResult<Trajectory>
where
    F: Fn(usize, f64) -> Vector3<f64> + Sync,
{
    let expected = grid_len(setpoints.len(), density)?;
    let mut samples = Vec::with_capacity(expected);

    if let Some(first) = setpoints.first() {
        samples.push(*first);
    }

    for (segment, pair) in setpoints.windows(2).enumerate() {
        let (start, end) = (&pair[0], &pair[1]);
        let times = linspace(start.t, end.t, density + 2);
        let interior_times = &times[1..=density];
        let interior = &interior;
        let eval = move |t: &f64| Setpoint::new(*t, interior(segment, *t - start.t));

        if parallel {
            samples.par_extend(interior_times.par_iter().map(eval));
        } else {
            samples.extend(interior_times.iter().map(eval));
        }
        samples.push(*end);
    }

    let got = samples.len();
    Trajectory::from_samples(samples, density).ok_or(PlannerError::GridMismatch { expected, got })
}

/// Reject NaN/Inf in a stage's output
pub fn ensure_finite(stage: Stage, samples: &[Setpoint]) -> PlannerResult<()> {
    match samples.iter().position(|s| !s.is_finite()) {
        Some(index) => Err(PlannerError::NumericDegeneracy {
            stage,
            detail: format!("sample {index} is not finite"),
        }),
        None => Ok(()),
    }
}

/// Check that a dense input trajectory sits on the expected grid
pub fn ensure_grid(
    trajectory: &Trajectory,
    num_setpoints: usize,
    density: usize,
) -> PlannerResult<()> {
    let expected = grid_len(num_setpoints, density)?;
    if trajectory.len() != expected || trajectory.density() != density {
        return Err(PlannerError::GridMismatch {
            expected,
            got: trajectory.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcm_core::setpoint::from_rows;

    fn setpoints() -> Vec<Setpoint> {
        from_rows(&[0.0, 2.0, 4.0], &[0.0, 1.0, 2.0], &[0.0; 3], &[0.0; 3])
    }

    #[test]
    fn test_layout() {
        let traj = densify(&setpoints(), 3, false, |seg, _| {
            Vector3::new(seg as f64, 0.0, 0.0)
        })
        .unwrap();
        assert_eq!(traj.len(), 9);
        assert_eq!(traj.samples()[0], setpoints()[0]);
        assert_eq!(traj.samples()[4], setpoints()[1]);
        assert_eq!(traj.samples()[8], setpoints()[2]);
        assert_eq!(traj.samples()[5].position.x, 1.0);
        assert_eq!(traj.samples()[1].t, 0.5);
    }

    #[test]
    fn test_elapsed_time() {
        let traj = densify(&setpoints(), 1, false, |_, elapsed| {
            Vector3::new(elapsed, 0.0, 0.0)
        })
        .unwrap();
        // Interior samples sit mid-segment
        assert_eq!(traj.samples()[1].position.x, 1.0);
        assert_eq!(traj.samples()[3].position.x, 1.0);
    }

    #[test]
    fn test_zero_density() {
        let traj = densify(&setpoints(), 0, false, |_, _| {
            Vector3::new(f64::NAN, 0.0, 0.0)
        })
        .unwrap();
        assert_eq!(traj.samples(), setpoints().as_slice());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let f = |seg: usize, elapsed: f64| {
            Vector3::new((elapsed * 1.7).exp(), seg as f64, elapsed.sin())
        };
        let a = densify(&setpoints(), 25, false, f).unwrap();
        let b = densify(&setpoints(), 25, true, f).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_density_limit() {
        let huge = usize::MAX - 1;
        assert!(matches!(
            densify(&setpoints(), huge, false, |_, _| Vector3::zeros()),
            Err(PlannerError::InvalidDensity { .. })
        ));
        assert_eq!(
            grid_len(3, MAX_INTERPOLATION_DENSITY + 1),
            Err(PlannerError::InvalidDensity {
                density: MAX_INTERPOLATION_DENSITY + 1,
                limit: MAX_INTERPOLATION_DENSITY,
            })
        );
        assert_eq!(grid_len(3, 10), Ok(31));
    }

    #[test]
    fn test_ensure_finite() {
        let mut samples = setpoints();
        assert!(ensure_finite(Stage::DcmSetpoints, &samples).is_ok());
        samples[2].position.z = f64::INFINITY;
        assert!(matches!(
            ensure_finite(Stage::DcmSetpoints, &samples),
            Err(PlannerError::NumericDegeneracy { stage: Stage::DcmSetpoints, .. })
        ));
    }

    #[test]
    fn test_ensure_grid() {
        let traj = densify(&setpoints(), 2, false, |_, _| Vector3::zeros()).unwrap();
        assert!(ensure_grid(&traj, 3, 2).is_ok());
        assert_eq!(
            ensure_grid(&traj, 3, 4),
            Err(PlannerError::GridMismatch { expected: 11, got: 7 })
        );
    }
}
