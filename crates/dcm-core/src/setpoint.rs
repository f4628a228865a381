//! Time-stamped waypoints
//!
//! A setpoint is a `(t, x, y, z)` tuple. VRP, DCM and COM setpoints of one
//! plan share the same timestamps.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// A single `(t, x, y, z)` waypoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Setpoint {
    /// Time stamp [s]
    pub t: f64,
    /// Position [m]
    pub position: Vector3<f64>,
}

impl Setpoint {
    pub fn new(t: f64, position: Vector3<f64>) -> Self {
        Self { t, position }
    }

    /// Build from raw components
    pub fn from_components(t: f64, x: f64, y: f64, z: f64) -> Self {
        Self {
            t,
            position: Vector3::new(x, y, z),
        }
    }

    /// Returns `[t, x, y, z]`
    pub fn to_array(&self) -> [f64; 4] {
        [self.t, self.position.x, self.position.y, self.position.z]
    }

    /// True if time and all position components are finite
    pub fn is_finite(&self) -> bool {
        self.t.is_finite() && self.position.iter().all(|v| v.is_finite())
    }
}

impl From<[f64; 4]> for Setpoint {
    fn from(v: [f64; 4]) -> Self {
        Self::from_components(v[0], v[1], v[2], v[3])
    }
}

/// Build setpoints from parallel component rows, the layout used when
/// setpoints are written as a 4×n table.
///
/// Rows shorter than `t` are ignored past their end.
pub fn from_rows(t: &[f64], x: &[f64], y: &[f64], z: &[f64]) -> Vec<Setpoint> {
    t.iter()
        .zip(x)
        .zip(y)
        .zip(z)
        .map(|(((&t, &x), &y), &z)| Setpoint::from_components(t, x, y, z))
        .collect()
}
