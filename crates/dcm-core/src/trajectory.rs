//! Dense trajectories
//!
//! A trajectory inserts `density` evenly time-spaced samples between every
//! pair of consecutive setpoints. Setpoint `i` lives at sample index
//! `i·(density + 1)` and is stored as an exact copy of the setpoint.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::math::blend;
use crate::setpoint::Setpoint;

/// Dense `(t, x, y, z)` samples over a setpoint grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TrajectoryData")]
pub struct Trajectory {
    /// Samples in time order
    samples: Vec<Setpoint>,
    /// Interior samples per segment
    density: usize,
}

impl Trajectory {
    /// Wrap samples laid out on a grid with the given density.
    ///
    /// Returns `None` if the sample count cannot be written as
    /// `(density + 1)·n - density` for some `n ≥ 1`.
    pub fn from_samples(samples: Vec<Setpoint>, density: usize) -> Option<Self> {
        let stride = density.checked_add(1)?;
        if samples.is_empty() || (samples.len() - 1) % stride != 0 {
            return None;
        }
        Some(Self { samples, density })
    }

    pub fn samples(&self) -> &[Setpoint] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Interior samples per segment
    pub fn density(&self) -> usize {
        self.density
    }

    /// Stride between consecutive setpoints in the sample array
    pub fn stride(&self) -> usize {
        self.density + 1
    }

    /// Number of setpoints the trajectory was built from
    pub fn num_setpoints(&self) -> usize {
        (self.samples.len() - 1) / self.stride() + 1
    }

    pub fn num_segments(&self) -> usize {
        self.num_setpoints() - 1
    }

    pub fn first(&self) -> Option<&Setpoint> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&Setpoint> {
        self.samples.last()
    }

    /// Sample at the `i`-th setpoint
    pub fn boundary(&self, i: usize) -> Option<&Setpoint> {
        self.samples.get(i * self.stride())
    }

    /// Samples at setpoint positions, i.e. every `density + 1`-th sample
    pub fn boundary_samples(&self) -> Vec<Setpoint> {
        self.samples.iter().step_by(self.stride()).copied().collect()
    }

    /// Samples of segment `i`, both boundary samples included
    pub fn segment(&self, i: usize) -> Option<&[Setpoint]> {
        if i >= self.num_segments() {
            return None;
        }
        let start = i * self.stride();
        Some(&self.samples[start..=start + self.stride()])
    }

    pub fn times(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.t).collect()
    }

    pub fn positions(&self) -> Vec<Vector3<f64>> {
        self.samples.iter().map(|s| s.position).collect()
    }

    /// Position at time `t` by linear lookup between dense samples.
    ///
    /// Times outside the trajectory clamp to the first or last sample.
    pub fn position_at(&self, t: f64) -> Option<Vector3<f64>> {
        let first = self.samples.first()?;
        let last = self.samples.last()?;

        if t <= first.t {
            return Some(first.position);
        }
        if t >= last.t {
            return Some(last.position);
        }

        // First sample strictly after t; t > first.t so idx ≥ 1
        let idx = self.samples.partition_point(|s| s.t <= t);
        let s0 = &self.samples[idx - 1];
        let s1 = &self.samples[idx];
        let alpha = (t - s0.t) / (s1.t - s0.t);

        Some(blend(&s0.position, &s1.position, alpha))
    }

    /// True if both trajectories share the exact same time grid
    pub fn same_grid(&self, other: &Trajectory) -> bool {
        self.density == other.density
            && self.samples.len() == other.samples.len()
            && self
                .samples
                .iter()
                .zip(&other.samples)
                .all(|(a, b)| a.t == b.t)
    }
}

/// Serialized form, checked through [`Trajectory::from_samples`] on decode
#[derive(Deserialize)]
struct TrajectoryData {
    samples: Vec<Setpoint>,
    density: usize,
}

impl TryFrom<TrajectoryData> for Trajectory {
    type Error = String;

    fn try_from(data: TrajectoryData) -> Result<Self, Self::Error> {
        let (len, density) = (data.samples.len(), data.density);
        Trajectory::from_samples(data.samples, density)
            .ok_or_else(|| format!("{len} samples do not lie on a grid of density {density}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp() -> Trajectory {
        // Two segments with one interior sample each
        let samples = vec![
            Setpoint::from_components(0.0, 0.0, 0.0, 0.0),
            Setpoint::from_components(0.5, 1.0, 0.0, 0.0),
            Setpoint::from_components(1.0, 2.0, 0.0, 0.0),
            Setpoint::from_components(1.5, 3.0, 0.0, 0.0),
            Setpoint::from_components(2.0, 4.0, 0.0, 0.0),
        ];
        Trajectory::from_samples(samples, 1).unwrap()
    }

    #[test]
    fn test_grid_layout() {
        let traj = ramp();
        assert_eq!(traj.len(), 5);
        assert_eq!(traj.stride(), 2);
        assert_eq!(traj.num_setpoints(), 3);
        assert_eq!(traj.num_segments(), 2);
        assert_eq!(traj.boundary(1).unwrap().t, 1.0);
        assert!(traj.boundary(3).is_none());

        let bounds = traj.boundary_samples();
        assert_eq!(bounds.len(), 3);
        assert_eq!(bounds[2].position.x, 4.0);
    }

    #[test]
    fn test_segment_slices() {
        let traj = ramp();
        let seg = traj.segment(1).unwrap();
        assert_eq!(seg.len(), 3);
        assert_eq!(seg[0].t, 1.0);
        assert_eq!(seg[2].t, 2.0);
        assert!(traj.segment(2).is_none());
    }

    #[test]
    fn test_rejects_bad_shape() {
        let samples = vec![Setpoint::from_components(0.0, 0.0, 0.0, 0.0); 4];
        assert!(Trajectory::from_samples(samples, 1).is_none());
        assert!(Trajectory::from_samples(Vec::new(), 0).is_none());
    }

    #[test]
    fn test_rejects_huge_density() {
        let samples = vec![Setpoint::from_components(0.0, 0.0, 0.0, 0.0); 3];
        assert!(Trajectory::from_samples(samples, usize::MAX).is_none());
    }

    #[test]
    fn test_decode_checks_shape() {
        let traj = ramp();
        let json = serde_json::to_string(&traj).unwrap();
        let decoded: Trajectory = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, traj);

        let empty = r#"{ "samples": [], "density": 1 }"#;
        assert!(serde_json::from_str::<Trajectory>(empty).is_err());

        let mut bad = traj.samples().to_vec();
        bad.pop();
        let json = serde_json::to_string(&bad).unwrap();
        let truncated = format!(r#"{{ "samples": {json}, "density": 1 }}"#);
        assert!(serde_json::from_str::<Trajectory>(&truncated).is_err());
    }

    #[test]
    fn test_position_lookup() {
        let traj = ramp();
        assert_relative_eq!(traj.position_at(0.25).unwrap().x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(traj.position_at(1.0).unwrap().x, 2.0, epsilon = 1e-12);
        assert_eq!(traj.position_at(-1.0).unwrap().x, 0.0);
        assert_eq!(traj.position_at(10.0).unwrap().x, 4.0);
    }

    #[test]
    fn test_same_grid() {
        let a = ramp();
        let mut samples = a.samples().to_vec();
        samples[1].position.y = 7.0;
        let b = Trajectory::from_samples(samples.clone(), 1).unwrap();
        assert!(a.same_grid(&b));

        samples[1].t = 0.4;
        let c = Trajectory::from_samples(samples, 1).unwrap();
        assert!(!a.same_grid(&c));
    }
}
