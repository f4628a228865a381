//! Numerical integration
//!
//! Fixed-step Runge-Kutta for the first-order pendulum equations. The
//! planner itself uses closed-form solutions; this integrator exists to
//! check them against direct simulation of `ẋ = (ξ - x)/b`.

use nalgebra::Vector3;

/// One RK4 step of dx/dt = f(t, x) for a Vector3 state
///
/// # Arguments
/// * `x` - Current state
/// * `t` - Current time
/// * `dt` - Time step
/// * `f` - Derivative function f(t, x) -> dx/dt
pub fn rk4_vec3<F>(
    x: &Vector3<f64>,
    t: f64,
    dt: f64,
    f: F,
) -> Vector3<f64>
where
    F: Fn(f64, &Vector3<f64>) -> Vector3<f64>,
{
    let k1 = f(t, x);
    let k2 = f(t + dt / 2.0, &(x + k1 * dt / 2.0));
    let k3 = f(t + dt / 2.0, &(x + k2 * dt / 2.0));
    let k4 = f(t + dt, &(x + k3 * dt));

    x + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0)
}

/// Integrate from `t0` to `t1` with `steps` equal RK4 steps.
///
/// Negative spans integrate backward in time, which is how terminal-value
/// problems such as the DCM equation are simulated.
pub fn integrate_vec3<F>(
    x0: &Vector3<f64>,
    t0: f64,
    t1: f64,
    steps: usize,
    f: F,
) -> Vector3<f64>
where
    F: Fn(f64, &Vector3<f64>) -> Vector3<f64>,
{
    let steps = steps.max(1);
    let dt = (t1 - t0) / steps as f64;
    let mut x = *x0;
    let mut t = t0;
    for _ in 0..steps {
        x = rk4_vec3(&x, t, dt, &f);
        t += dt;
    }
    x
}
