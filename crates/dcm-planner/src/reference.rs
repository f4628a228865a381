//! Controller references
//!
//! A lower-level controller samples the plan at its own tick rate rather
//! than on the dense interpolation grid. References are evaluated from the
//! closed-form segment solutions, so any time inside the plan is exact.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, PlannerResult};
use crate::planner::GaitPlan;

/// Upper bound on references produced by one [`GaitPlan::sample`] call
pub const MAX_REFERENCE_SAMPLES: usize = 1 << 24;

/// Reference for the tracking controller at one instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackingReference {
    /// Time [s]
    pub t: f64,
    /// VRP position [m]
    pub vrp: Vector3<f64>,
    /// DCM position [m]
    pub dcm: Vector3<f64>,
    /// COM position [m]
    pub com: Vector3<f64>,
    /// COM velocity [m/s]
    pub com_velocity: Vector3<f64>,
    /// DCM velocity [m/s]
    pub dcm_velocity: Vector3<f64>,
}

impl GaitPlan {
    /// Reference at time `t`, clamped to the plan's time span
    pub fn reference_at(&self, t: f64) -> TrackingReference {
        let t = t.clamp(self.start_time(), self.end_time());
        let (segment, elapsed) = self.locate(t);

        let c = &self.constants;
        let nu0 = &self.vrp_setpoints[segment].position;
        let nu1 = &self.vrp_setpoints[segment + 1].position;
        let xi_end = &self.dcm_setpoints[segment + 1].position;
        let x0 = &self.com_setpoints[segment].position;

        let (w0, w1) = c.vrp_weights(elapsed);
        let vrp = nu0 * w0 + nu1 * w1;
        let dcm = c.dcm_weights(elapsed).apply(nu0, nu1, xi_end);
        let com = c.com_weights(elapsed).apply(nu0, nu1, xi_end, x0);

        TrackingReference {
            t,
            vrp,
            dcm,
            com,
            com_velocity: self.pendulum.com_velocity(&com, &dcm),
            dcm_velocity: self.pendulum.dcm_velocity(&dcm, &vrp),
        }
    }

    /// References at a fixed controller rate over the whole plan
    pub fn sample(&self, rate_hz: f64) -> PlannerResult<Vec<TrackingReference>> {
        if !rate_hz.is_finite() || rate_hz <= 0.0 {
            return Err(PlannerError::InvalidSampleRate(rate_hz));
        }

        let dt = 1.0 / rate_hz;
        let intervals = (self.duration() * rate_hz).floor();
        let too_many = PlannerError::TooManySamples {
            rate_hz,
            limit: MAX_REFERENCE_SAMPLES,
        };
        if !intervals.is_finite() || intervals >= MAX_REFERENCE_SAMPLES as f64 {
            return Err(too_many);
        }
        let count = (intervals as usize).checked_add(1).ok_or(too_many)?;
        let start = self.start_time();

        Ok((0..count)
            .map(|k| self.reference_at(start + k as f64 * dt))
            .collect())
    }

    /// Segment index and elapsed time within it
    fn locate(&self, t: f64) -> (usize, f64) {
        let last_segment = self.vrp_setpoints.len() - 2;
        let offset = (t - self.start_time()) / self.constants.duration;
        let segment = (offset.floor().max(0.0) as usize).min(last_segment);
        let elapsed = (t - self.vrp_setpoints[segment].t).clamp(0.0, self.constants.duration);
        (segment, elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios;
    use approx::assert_relative_eq;

    fn plan() -> GaitPlan {
        crate::planner::DcmPlanner::from_request(scenarios::ramp_example())
            .unwrap()
            .plan()
            .unwrap()
    }

    #[test]
    fn test_reference_matches_setpoints() {
        let plan = plan();
        for i in 0..plan.vrp_setpoints().len() {
            let t = plan.vrp_setpoints()[i].t;
            let r = plan.reference_at(t);
            assert_relative_eq!(r.vrp, plan.vrp_setpoints()[i].position, epsilon = 1e-12);
            assert_relative_eq!(r.dcm, plan.dcm_setpoints()[i].position, epsilon = 1e-9);
            assert_relative_eq!(r.com, plan.com_setpoints()[i].position, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_reference_matches_dense_grid() {
        let plan = plan();
        for k in [1, 4, 7, 12, 15, 19] {
            let sample_t = plan.com_trajectory().samples()[k].t;
            let r = plan.reference_at(sample_t);
            assert_relative_eq!(r.com, plan.com_trajectory().samples()[k].position, epsilon = 1e-9);
            assert_relative_eq!(r.dcm, plan.dcm_trajectory().samples()[k].position, epsilon = 1e-9);
            assert_relative_eq!(r.vrp, plan.vrp_trajectory().samples()[k].position, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_reference_clamps() {
        let plan = plan();
        let before = plan.reference_at(-5.0);
        assert_eq!(before.t, 0.0);
        assert_relative_eq!(before.com, plan.com_setpoints()[0].position, epsilon = 1e-12);

        let after = plan.reference_at(100.0);
        assert_eq!(after.t, 2.0);
        assert_relative_eq!(after.dcm, plan.dcm_setpoints()[2].position, epsilon = 1e-12);
    }

    #[test]
    fn test_sample_rate() {
        let plan = plan();
        let refs = plan.sample(100.0).unwrap();
        assert_eq!(refs.len(), 201);
        assert_eq!(refs[0].t, 0.0);
        for w in refs.windows(2) {
            assert!(w[1].t > w[0].t);
        }

        assert_eq!(plan.sample(0.0), Err(PlannerError::InvalidSampleRate(0.0)));
        assert!(plan.sample(f64::NAN).is_err());
    }

    #[test]
    fn test_sample_rate_too_high() {
        let plan = plan();
        for rate in [1e20, f64::MAX, 1e7 * MAX_REFERENCE_SAMPLES as f64] {
            assert_eq!(
                plan.sample(rate),
                Err(PlannerError::TooManySamples {
                    rate_hz: rate,
                    limit: MAX_REFERENCE_SAMPLES,
                })
            );
        }
        // Ordinary controller rates are unaffected
        let refs = plan.sample(1000.0).unwrap();
        assert_eq!(refs.len(), 2001);
    }

    #[test]
    fn test_velocity_consistent_with_positions() {
        let plan = plan();
        let h = 1e-6;
        let t = 0.63;
        let a = plan.reference_at(t - h);
        let b = plan.reference_at(t + h);
        let mid = plan.reference_at(t);
        let fd = (b.com - a.com) / (2.0 * h);
        assert_relative_eq!(mid.com_velocity, fd, epsilon = 1e-4);
    }
}
