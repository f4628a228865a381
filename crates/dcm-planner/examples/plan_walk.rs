//! Plan a straight walk and a hop sequence, then print controller references
//!
//! Run with `RUST_LOG=dcm_planner=debug` to see per-stage logging.

use dcm_planner::scenarios::{hop_sequence, straight_walk, HopParams, WalkParams};
use dcm_planner::{DcmPlanner, PlanRequest, PlannerResult};

fn run(name: &str, request: PlanRequest) -> PlannerResult<()> {
    let plan = DcmPlanner::from_request(request)?.plan()?;
    let stats = plan.statistics();

    println!("=== {} ===", name);
    println!(
        "  {} setpoints -> {} samples in {:.3} ms",
        stats.num_setpoints, stats.num_samples, stats.plan_time_ms
    );
    println!(
        "  time constant b = {:.4} s, segment T = {:.3} s",
        plan.pendulum().time_constant,
        plan.constants().duration
    );

    println!("  {:>6} {:>22} {:>22}", "t", "COM", "DCM");
    for r in plan.sample(10.0)? {
        println!(
            "  {:6.2} ({:6.3}, {:6.3}, {:6.3}) ({:6.3}, {:6.3}, {:6.3})",
            r.t, r.com.x, r.com.y, r.com.z, r.dcm.x, r.dcm.y, r.dcm.z
        );
    }
    Ok(())
}

fn main() -> PlannerResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    run("straight walk", straight_walk(&WalkParams::default()))?;
    run("hop sequence", hop_sequence(&HopParams::default()))?;
    Ok(())
}
