//! DCM Motion Planner
//!
//! Converts a sparse sequence of virtual repellent point (VRP) setpoints
//! into dense VRP, DCM and COM trajectories for bipedal walking, running
//! and jumping.
//!
//! This crate implements the closed-form planner from:
//! "Unified Motion Planner for Walking, Running, and Jumping Using the
//! Three-Dimensional Divergent Component of Motion"
//! (Mesesan et al., IEEE Transactions on Robotics, 2023)
//!
//! # Architecture
//!
//! The planner runs four stages in strict sequence:
//!
//! ```text
//! VRP setpoints ──► VRP trajectory                 (Eq. 10, linear)
//!               ──► DCM setpoints                  (Eq. 12, backward from ξ_end)
//!               ──► DCM trajectory                 (Eq. 11, exponential)
//!               ──► COM setpoints, COM trajectory  (Eq. 14 forward from x₀, Eq. 13)
//! ```
//!
//! # Components
//!
//! - [`config`]: Planner configuration and boundary conditions
//! - [`sequence`]: Validated VRP setpoint sequences
//! - [`vrp`], [`dcm`], [`com`]: Stage implementations
//! - [`planner`]: Staged planner and finished plan
//! - [`reference`]: Controller-rate references
//! - [`scenarios`]: Canned VRP sequences

pub mod config;
pub mod error;
pub mod sequence;
pub mod interpolate;
pub mod vrp;
pub mod dcm;
pub mod com;
pub mod planner;
pub mod reference;
pub mod scenarios;

// Re-exports
pub use config::{BoundaryConditions, PlanRequest, PlannerConfig};
pub use error::{PlannerError, PlannerResult, Stage};
pub use planner::{plan, DcmPlanner, GaitPlan, PlanStatistics};
pub use reference::TrackingReference;
pub use sequence::VrpSequence;
