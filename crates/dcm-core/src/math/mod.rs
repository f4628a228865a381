//! Mathematical utilities
//!
//! Interpolation helpers and a fixed-step integrator used to cross-check
//! the closed-form pendulum solutions.

pub mod interp;
pub mod integrator;

pub use interp::*;
pub use integrator::*;
