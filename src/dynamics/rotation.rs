use nalgebra::{Quaternion, Vector3};

use super::state::{AttitudeState, Deriv};

// ---------------------------------------------------------------------------
// Rigid-body rotational equations of motion
// ---------------------------------------------------------------------------

/// Attitude derivatives for a rigid body with principal moments `inertia`
/// under body-frame torque `torque`.
pub fn derivatives(state: &AttitudeState, inertia: &Vector3<f64>, torque: &Vector3<f64>) -> Deriv {
    let w = state.omega;

    // --- Euler's equation: I * domega = torque - omega × (I * omega) ---
    let i_omega = inertia.component_mul(&w);
    let gyro = w.cross(&i_omega);
    let domega = (torque - gyro).component_div(inertia);

    // --- Quaternion kinematics: dq/dt = 0.5 * q * omega_quat ---
    let omega_quat = Quaternion::new(0.0, w.x, w.y, w.z);
    let dquat = state.quat.quaternion() * omega_quat * 0.5;

    Deriv { dquat, domega }
}

/// Instantaneous change of body rates from an angular impulse (body frame).
pub fn apply_impulse(state: &mut AttitudeState, inertia: &Vector3<f64>, impulse: &Vector3<f64>) {
    state.omega += impulse.component_div(inertia);
}

/// Rotational kinetic energy, J.
pub fn kinetic_energy(state: &AttitudeState, inertia: &Vector3<f64>) -> f64 {
    0.5 * state.omega.dot(&inertia.component_mul(&state.omega))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::UnitQuaternion;

    #[test]
    fn quat_deriv_zero_at_rest() {
        let s = AttitudeState::at_rest(UnitQuaternion::identity());
        let d = derivatives(&s, &Vector3::new(10.0, 10.0, 4.0), &Vector3::zeros());
        assert!(d.dquat.norm() < 1e-12, "No rotation → zero quat derivative");
        assert!(d.domega.norm() < 1e-12);
    }

    #[test]
    fn torque_accelerates_about_its_axis() {
        let s = AttitudeState::at_rest(UnitQuaternion::identity());
        let d = derivatives(&s, &Vector3::new(10.0, 5.0, 2.0), &Vector3::new(0.0, 0.0, 4.0));
        assert!((d.domega.z - 2.0).abs() < 1e-12);
        assert!(d.domega.x.abs() < 1e-12 && d.domega.y.abs() < 1e-12);
    }

    #[test]
    fn spin_about_principal_axis_is_steady() {
        let mut s = AttitudeState::at_rest(UnitQuaternion::identity());
        s.omega = Vector3::new(0.0, 0.3, 0.0);
        let d = derivatives(&s, &Vector3::new(10.0, 5.0, 2.0), &Vector3::zeros());
        assert!(d.domega.norm() < 1e-12, "no gyroscopic torque about a principal axis");
    }

    #[test]
    fn impulse_changes_rate() {
        let mut s = AttitudeState::at_rest(UnitQuaternion::identity());
        apply_impulse(&mut s, &Vector3::new(2.0, 2.0, 2.0), &Vector3::new(1.0, 0.0, 0.0));
        assert!((s.omega.x - 0.5).abs() < 1e-12);
        assert!((kinetic_energy(&s, &Vector3::new(2.0, 2.0, 2.0)) - 0.25).abs() < 1e-12);
    }
}
