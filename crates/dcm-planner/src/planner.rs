//! Staged DCM planner
//!
//! Main interface for turning VRP setpoints into VRP, DCM and COM
//! trajectories. Each stage output is written once and read-only afterward;
//! requesting a stage before its prerequisites fails with
//! [`PlannerError::PrerequisiteNotComputed`] instead of reading an empty
//! buffer.
//!
//! ```text
//! VRP setpoints ──► VRP trajectory ─────────────┐
//!       │                                       ▼
//!       └──► DCM setpoints (backward) ──► DCM trajectory ──┐
//!                   │                                      ▼
//!                   └──► COM setpoints (forward) ──► COM trajectory
//! ```

use std::time::Instant;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use dcm_core::dynamics::{Pendulum, SegmentConstants};
use dcm_core::{Setpoint, Trajectory};

use crate::com;
use crate::config::{BoundaryConditions, PlanRequest, PlannerConfig};
use crate::dcm;
use crate::error::{PlannerError, PlannerResult, Stage};
use crate::interpolate::ensure_grid;
use crate::sequence::{VrpSequence, UNIFORM_SPACING_TOLERANCE};
use crate::vrp;

/// Timing of the last full planning run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanStatistics {
    /// Number of VRP setpoints
    pub num_setpoints: usize,
    /// Samples per dense trajectory
    pub num_samples: usize,
    /// Wall time of the full pipeline [ms]
    pub plan_time_ms: f64,
}

/// Planner holding the intermediate output of every stage
///
/// One instance owns one full trajectory set. Stage methods return the
/// cached output if the stage already ran, so repeated calls are
/// bit-identical.
#[derive(Debug, Clone)]
pub struct DcmPlanner {
    config: PlannerConfig,
    boundary: BoundaryConditions,
    pendulum: Pendulum,
    constants: SegmentConstants,
    vrps: VrpSequence,

    vrp_trajectory: Option<Trajectory>,
    dcm_setpoints: Option<Vec<Setpoint>>,
    dcm_trajectory: Option<Trajectory>,
    com_setpoints: Option<Vec<Setpoint>>,
    com_trajectory: Option<Trajectory>,
}

impl DcmPlanner {
    /// Create a planner, validating every input up front
    pub fn new(
        config: PlannerConfig,
        vrp_setpoints: Vec<Setpoint>,
        boundary: BoundaryConditions,
    ) -> PlannerResult<Self> {
        config.validate()?;
        let pendulum = config.pendulum()?;
        boundary.validate()?;
        let vrps = VrpSequence::new(vrp_setpoints)?;
        let constants = SegmentConstants::from_pendulum(&pendulum, vrps.segment_duration())?;

        if config.interpolation_density == 0 {
            warn!("Interpolation density is 0, trajectories reduce to setpoints");
        }

        Ok(Self {
            config,
            boundary,
            pendulum,
            constants,
            vrps,
            vrp_trajectory: None,
            dcm_setpoints: None,
            dcm_trajectory: None,
            com_setpoints: None,
            com_trajectory: None,
        })
    }

    pub fn from_request(request: PlanRequest) -> PlannerResult<Self> {
        Self::new(request.config, request.vrp_setpoints, request.boundary)
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn boundary(&self) -> &BoundaryConditions {
        &self.boundary
    }

    pub fn pendulum(&self) -> &Pendulum {
        &self.pendulum
    }

    pub fn constants(&self) -> &SegmentConstants {
        &self.constants
    }

    pub fn vrp_setpoints(&self) -> &[Setpoint] {
        self.vrps.setpoints()
    }

    /// Segment duration T
    pub fn segment_duration(&self) -> f64 {
        self.vrps.segment_duration()
    }

    /// True once the given stage's output exists
    pub fn is_computed(&self, stage: Stage) -> bool {
        match stage {
            Stage::VrpTrajectory => self.vrp_trajectory.is_some(),
            Stage::DcmSetpoints => self.dcm_setpoints.is_some(),
            Stage::DcmTrajectory => self.dcm_trajectory.is_some(),
            Stage::ComSetpoints => self.com_setpoints.is_some(),
            Stage::ComTrajectory => self.com_trajectory.is_some(),
        }
    }

    fn require_prerequisites(&self, stage: Stage) -> PlannerResult<()> {
        match stage.prerequisites().iter().find(|req| !self.is_computed(**req)) {
            Some(&requires) => Err(PlannerError::PrerequisiteNotComputed { stage, requires }),
            None => Ok(()),
        }
    }

    /// Stage 1: dense VRP trajectory
    pub fn build_vrp_trajectory(&mut self) -> PlannerResult<&Trajectory> {
        if self.vrp_trajectory.is_none() {
            let trajectory = vrp::interpolate(
                &self.vrps,
                &self.constants,
                self.config.interpolation_density,
            )?;
            self.vrp_trajectory = Some(trajectory);
        }
        self.vrp_trajectory()
    }

    /// Stage 2: DCM setpoints by backward recursion
    pub fn build_dcm_setpoints(&mut self) -> PlannerResult<&[Setpoint]> {
        if self.dcm_setpoints.is_none() {
            let setpoints = dcm::solve_setpoints(&self.vrps, &self.constants, &self.boundary)?;
            self.dcm_setpoints = Some(setpoints);
        }
        self.dcm_setpoints()
    }

    /// Stage 3: dense DCM trajectory. Requires stages 1 and 2.
    pub fn build_dcm_trajectory(&mut self) -> PlannerResult<&Trajectory> {
        if self.dcm_trajectory.is_none() {
            self.require_prerequisites(Stage::DcmTrajectory)?;
            let trajectory = dcm::interpolate(
                self.vrp_trajectory()?,
                self.dcm_setpoints()?,
                &self.constants,
                self.config.interpolation_density,
                self.config.parallel,
            )?;
            self.dcm_trajectory = Some(trajectory);
        }
        self.dcm_trajectory()
    }

    /// Stage 4a: COM setpoints by forward recursion. Requires stage 2.
    pub fn build_com_setpoints(&mut self) -> PlannerResult<&[Setpoint]> {
        if self.com_setpoints.is_none() {
            self.require_prerequisites(Stage::ComSetpoints)?;
            let setpoints = com::solve_setpoints(
                &self.vrps,
                self.dcm_setpoints()?,
                &self.constants,
                &self.boundary,
            )?;
            self.com_setpoints = Some(setpoints);
        }
        self.com_setpoints()
    }

    /// Stage 4b: dense COM trajectory. Requires stages 1, 3 and 4a.
    pub fn build_com_trajectory(&mut self) -> PlannerResult<&Trajectory> {
        if self.com_trajectory.is_none() {
            self.require_prerequisites(Stage::ComTrajectory)?;
            let trajectory = com::interpolate(
                self.vrp_trajectory()?,
                self.dcm_trajectory()?,
                self.com_setpoints()?,
                &self.constants,
                self.config.interpolation_density,
                self.config.parallel,
            )?;
            self.com_trajectory = Some(trajectory);
        }
        self.com_trajectory()
    }

    pub fn vrp_trajectory(&self) -> PlannerResult<&Trajectory> {
        self.vrp_trajectory
            .as_ref()
            .ok_or(PlannerError::StageNotComputed(Stage::VrpTrajectory))
    }

    pub fn dcm_setpoints(&self) -> PlannerResult<&[Setpoint]> {
        self.dcm_setpoints
            .as_deref()
            .ok_or(PlannerError::StageNotComputed(Stage::DcmSetpoints))
    }

    pub fn dcm_trajectory(&self) -> PlannerResult<&Trajectory> {
        self.dcm_trajectory
            .as_ref()
            .ok_or(PlannerError::StageNotComputed(Stage::DcmTrajectory))
    }

    pub fn com_setpoints(&self) -> PlannerResult<&[Setpoint]> {
        self.com_setpoints
            .as_deref()
            .ok_or(PlannerError::StageNotComputed(Stage::ComSetpoints))
    }

    pub fn com_trajectory(&self) -> PlannerResult<&Trajectory> {
        self.com_trajectory
            .as_ref()
            .ok_or(PlannerError::StageNotComputed(Stage::ComTrajectory))
    }

    /// Run every remaining stage in order and return the finished plan
    pub fn plan(mut self) -> PlannerResult<GaitPlan> {
        let start_time = Instant::now();

        self.build_vrp_trajectory()?;
        self.build_dcm_setpoints()?;
        self.build_dcm_trajectory()?;
        self.build_com_setpoints()?;
        self.build_com_trajectory()?;

        let (
            Some(vrp_trajectory),
            Some(dcm_setpoints),
            Some(dcm_trajectory),
            Some(com_setpoints),
            Some(com_trajectory),
        ) = (
            self.vrp_trajectory,
            self.dcm_setpoints,
            self.dcm_trajectory,
            self.com_setpoints,
            self.com_trajectory,
        )
        else {
            return Err(PlannerError::StageNotComputed(Stage::ComTrajectory));
        };

        let statistics = PlanStatistics {
            num_setpoints: self.vrps.len(),
            num_samples: com_trajectory.len(),
            plan_time_ms: start_time.elapsed().as_secs_f64() * 1e3,
        };

        info!(
            setpoints = statistics.num_setpoints,
            density = self.config.interpolation_density,
            segment_duration = self.constants.duration,
            time_constant = self.constants.time_constant,
            plan_time_ms = statistics.plan_time_ms,
            "Planned DCM gait"
        );

        Ok(GaitPlan {
            pendulum: self.pendulum,
            constants: self.constants,
            density: self.config.interpolation_density,
            vrp_setpoints: self.vrps.setpoints().to_vec(),
            vrp_trajectory,
            dcm_setpoints,
            dcm_trajectory,
            com_setpoints,
            com_trajectory,
            statistics,
        })
    }
}

/// Plan VRP setpoints in one call
pub fn plan(
    config: PlannerConfig,
    vrp_setpoints: Vec<Setpoint>,
    boundary: BoundaryConditions,
) -> PlannerResult<GaitPlan> {
    DcmPlanner::new(config, vrp_setpoints, boundary)?.plan()
}

/// Complete output of one planning run
///
/// Decoding re-checks the setpoint sequence and the shared grid, so a
/// deserialized plan upholds the same invariants as a freshly planned one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "GaitPlanData")]
pub struct GaitPlan {
    pub(crate) pendulum: Pendulum,
    pub(crate) constants: SegmentConstants,
    pub(crate) density: usize,
    pub(crate) vrp_setpoints: Vec<Setpoint>,
    pub(crate) vrp_trajectory: Trajectory,
    pub(crate) dcm_setpoints: Vec<Setpoint>,
    pub(crate) dcm_trajectory: Trajectory,
    pub(crate) com_setpoints: Vec<Setpoint>,
    pub(crate) com_trajectory: Trajectory,
    pub(crate) statistics: PlanStatistics,
}

impl GaitPlan {
    pub fn pendulum(&self) -> &Pendulum {
        &self.pendulum
    }

    pub fn constants(&self) -> &SegmentConstants {
        &self.constants
    }

    pub fn density(&self) -> usize {
        self.density
    }

    pub fn vrp_setpoints(&self) -> &[Setpoint] {
        &self.vrp_setpoints
    }

    pub fn vrp_trajectory(&self) -> &Trajectory {
        &self.vrp_trajectory
    }

    pub fn dcm_setpoints(&self) -> &[Setpoint] {
        &self.dcm_setpoints
    }

    pub fn dcm_trajectory(&self) -> &Trajectory {
        &self.dcm_trajectory
    }

    pub fn com_setpoints(&self) -> &[Setpoint] {
        &self.com_setpoints
    }

    pub fn com_trajectory(&self) -> &Trajectory {
        &self.com_trajectory
    }

    pub fn statistics(&self) -> &PlanStatistics {
        &self.statistics
    }

    pub fn start_time(&self) -> f64 {
        self.vrp_setpoints[0].t
    }

    pub fn end_time(&self) -> f64 {
        self.vrp_setpoints[self.vrp_setpoints.len() - 1].t
    }

    pub fn duration(&self) -> f64 {
        self.end_time() - self.start_time()
    }

    /// COM velocity on the dense grid: ẋ = (ξ - x)/b
    pub fn com_velocities(&self) -> Vec<Vector3<f64>> {
        self.com_trajectory
            .samples()
            .iter()
            .zip(self.dcm_trajectory.samples())
            .map(|(x, xi)| self.pendulum.com_velocity(&x.position, &xi.position))
            .collect()
    }

    /// DCM velocity on the dense grid: ξ̇ = (ξ - ν)/b
    pub fn dcm_velocities(&self) -> Vec<Vector3<f64>> {
        self.dcm_trajectory
            .samples()
            .iter()
            .zip(self.vrp_trajectory.samples())
            .map(|(xi, nu)| self.pendulum.dcm_velocity(&xi.position, &nu.position))
            .collect()
    }

    pub fn to_json(&self) -> PlannerResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> PlannerResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Serialized form of [`GaitPlan`], validated on conversion
#[derive(Deserialize)]
struct GaitPlanData {
    pendulum: Pendulum,
    constants: SegmentConstants,
    density: usize,
    vrp_setpoints: Vec<Setpoint>,
    vrp_trajectory: Trajectory,
    dcm_setpoints: Vec<Setpoint>,
    dcm_trajectory: Trajectory,
    com_setpoints: Vec<Setpoint>,
    com_trajectory: Trajectory,
    statistics: PlanStatistics,
}

impl TryFrom<GaitPlanData> for GaitPlan {
    type Error = PlannerError;

    fn try_from(data: GaitPlanData) -> PlannerResult<Self> {
        let vrps = VrpSequence::new(data.vrp_setpoints)?;
        let n = vrps.len();

        Pendulum::new(data.pendulum.height)?;
        SegmentConstants::new(data.constants.time_constant, data.constants.duration)?;
        let duration = vrps.segment_duration();
        let tolerance = UNIFORM_SPACING_TOLERANCE * duration.max(1.0);
        if (data.constants.duration - duration).abs() > tolerance {
            return Err(PlannerError::InvalidPlan(format!(
                "segment duration {} does not match setpoint spacing {}",
                data.constants.duration, duration
            )));
        }

        for setpoints in [&data.dcm_setpoints, &data.com_setpoints] {
            if setpoints.len() != n {
                return Err(PlannerError::GridMismatch {
                    expected: n,
                    got: setpoints.len(),
                });
            }
        }
        for trajectory in [&data.vrp_trajectory, &data.dcm_trajectory, &data.com_trajectory] {
            ensure_grid(trajectory, n, data.density)?;
        }

        Ok(Self {
            pendulum: data.pendulum,
            constants: data.constants,
            density: data.density,
            vrp_setpoints: vrps.setpoints().to_vec(),
            vrp_trajectory: data.vrp_trajectory,
            dcm_setpoints: data.dcm_setpoints,
            dcm_trajectory: data.dcm_trajectory,
            com_setpoints: data.com_setpoints,
            com_trajectory: data.com_trajectory,
            statistics: data.statistics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios;

    fn planner() -> DcmPlanner {
        let request = scenarios::ramp_example();
        DcmPlanner::from_request(request).unwrap()
    }

    #[test]
    fn test_stage_order_enforced() {
        let mut p = planner();
        assert_eq!(
            p.build_dcm_trajectory().unwrap_err(),
            PlannerError::PrerequisiteNotComputed {
                stage: Stage::DcmTrajectory,
                requires: Stage::VrpTrajectory,
            }
        );
        assert_eq!(
            p.build_com_setpoints().unwrap_err(),
            PlannerError::PrerequisiteNotComputed {
                stage: Stage::ComSetpoints,
                requires: Stage::DcmSetpoints,
            }
        );

        p.build_vrp_trajectory().unwrap();
        assert!(matches!(
            p.build_dcm_trajectory(),
            Err(PlannerError::PrerequisiteNotComputed { requires: Stage::DcmSetpoints, .. })
        ));

        p.build_dcm_setpoints().unwrap();
        p.build_com_setpoints().unwrap();
        assert!(matches!(
            p.build_com_trajectory(),
            Err(PlannerError::PrerequisiteNotComputed { requires: Stage::DcmTrajectory, .. })
        ));
    }

    #[test]
    fn test_retrieval_before_compute() {
        let p = planner();
        assert_eq!(
            p.com_trajectory().unwrap_err(),
            PlannerError::StageNotComputed(Stage::ComTrajectory)
        );
        assert!(p.dcm_setpoints().is_err());
        assert!(!p.is_computed(Stage::VrpTrajectory));
    }

    #[test]
    fn test_stages_write_once() {
        let mut p = planner();
        let first = p.build_vrp_trajectory().unwrap().clone();
        let second = p.build_vrp_trajectory().unwrap().clone();
        assert_eq!(first, second);
        assert!(p.is_computed(Stage::VrpTrajectory));
    }

    #[test]
    fn test_plan_statistics() {
        let plan = planner().plan().unwrap();
        assert_eq!(plan.statistics().num_setpoints, 3);
        assert_eq!(plan.statistics().num_samples, 21);
        assert!(plan.statistics().plan_time_ms >= 0.0);
        assert_eq!(plan.duration(), 2.0);
    }

    #[test]
    fn test_invalid_inputs_rejected_at_construction() {
        let mut request = scenarios::ramp_example();
        request.config.pendulum_height = -0.5;
        assert!(matches!(
            DcmPlanner::from_request(request),
            Err(PlannerError::Model(_))
        ));

        let mut request = scenarios::ramp_example();
        request.vrp_setpoints.truncate(1);
        assert_eq!(
            DcmPlanner::from_request(request).unwrap_err(),
            PlannerError::TooFewSetpoints(1)
        );
    }

    #[test]
    fn test_velocities_on_grid() {
        let plan = planner().plan().unwrap();
        let com_vel = plan.com_velocities();
        let dcm_vel = plan.dcm_velocities();
        assert_eq!(com_vel.len(), plan.com_trajectory().len());
        assert_eq!(dcm_vel.len(), plan.dcm_trajectory().len());

        // Terminal DCM sits on the last VRP: no DCM motion at the end
        assert_eq!(dcm_vel[dcm_vel.len() - 1], Vector3::zeros());
    }

    #[test]
    fn test_json_roundtrip_preserves_plan() {
        let plan = planner().plan().unwrap();
        let restored = GaitPlan::from_json(&plan.to_json().unwrap()).unwrap();
        assert_eq!(restored.com_trajectory(), plan.com_trajectory());
        assert_eq!(restored.dcm_setpoints(), plan.dcm_setpoints());
    }

    fn edited_plan_json(edit: impl FnOnce(&mut serde_json::Value)) -> String {
        let plan = planner().plan().unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&plan.to_json().unwrap()).unwrap();
        edit(&mut value);
        value.to_string()
    }

    #[test]
    fn test_decode_rejects_empty_setpoints() {
        let json = edited_plan_json(|v| v["vrp_setpoints"] = serde_json::json!([]));
        assert!(matches!(
            GaitPlan::from_json(&json),
            Err(PlannerError::Serialization(_))
        ));
    }

    #[test]
    fn test_decode_rejects_truncated_trajectory() {
        let json = edited_plan_json(|v| {
            if let Some(samples) = v["com_trajectory"]["samples"].as_array_mut() {
                samples.truncate(5);
            }
        });
        assert!(GaitPlan::from_json(&json).is_err());

        // Well-formed trajectory on a different grid than the setpoints
        let json = edited_plan_json(|v| {
            if let Some(samples) = v["dcm_trajectory"]["samples"].as_array_mut() {
                samples.truncate(12);
            }
        });
        assert!(GaitPlan::from_json(&json).is_err());
    }

    #[test]
    fn test_decode_rejects_mismatched_setpoints() {
        let json = edited_plan_json(|v| {
            if let Some(setpoints) = v["com_setpoints"].as_array_mut() {
                setpoints.pop();
            }
        });
        assert!(GaitPlan::from_json(&json).is_err());

        let json = edited_plan_json(|v| v["constants"]["duration"] = serde_json::json!(0.5));
        assert!(GaitPlan::from_json(&json).is_err());
    }
}
