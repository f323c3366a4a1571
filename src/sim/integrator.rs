use nalgebra::{UnitQuaternion, Vector3};

use crate::dynamics;
use crate::dynamics::state::AttitudeState;

// ---------------------------------------------------------------------------
// Attitude RK4 integrator with constant torque over the step
// ---------------------------------------------------------------------------

/// Single RK4 step with body torque held constant over the step.
pub fn rk4_step(
    state: &AttitudeState,
    inertia: &Vector3<f64>,
    torque: &Vector3<f64>,
    dt: f64,
) -> AttitudeState {
    let k1 = dynamics::derivatives(state, inertia, torque);
    let k2 = dynamics::derivatives(&state.apply(&k1, dt * 0.5), inertia, torque);
    let k3 = dynamics::derivatives(&state.apply(&k2, dt * 0.5), inertia, torque);
    let k4 = dynamics::derivatives(&state.apply(&k3, dt), inertia, torque);

    let new_quat_raw = state.quat.quaternion()
        + (k1.dquat + k2.dquat * 2.0 + k3.dquat * 2.0 + k4.dquat) * (dt / 6.0);

    AttitudeState {
        time: state.time + dt,
        quat: UnitQuaternion::new_normalize(new_quat_raw),
        omega: state.omega
            + (k1.domega + 2.0 * k2.domega + 2.0 * k3.domega + k4.domega) * (dt / 6.0),
    }
}
