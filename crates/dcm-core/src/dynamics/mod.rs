//! Dynamics models
//!
//! Implements the 3D DCM pendulum model from the paper:
//! - Pendulum parameters and DCM/COM velocity relations
//! - Closed-form solutions over one segment of linear VRP motion

pub mod pendulum;
pub mod segment;

pub use pendulum::*;
pub use segment::*;
