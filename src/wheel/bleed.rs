use nalgebra::Vector3;

use super::curve::ResponseCurves;
use super::frame::{AxisValues, BodyAxes, ReferenceFrame};
use super::store::MomentumStore;

// ---------------------------------------------------------------------------
// Passive momentum bleed
// ---------------------------------------------------------------------------

/// Torque magnitude the wheel could exert about `reference_axis` at the
/// current orientation.
pub fn reference_axis_torque(
    reference_axis: &Vector3<f64>,
    body: &BodyAxes,
    nominal: &AxisValues,
) -> f64 {
    Vector3::new(
        body.pitch.dot(reference_axis) * nominal.pitch,
        body.yaw.dot(reference_axis) * nominal.yaw,
        body.roll.dot(reference_axis) * nominal.roll,
    )
    .norm()
}

/// Move `momentum` toward zero by `amount` without crossing it.
pub fn decay_toward_zero(momentum: f64, amount: f64) -> f64 {
    let amount = amount.max(0.0);
    if momentum > amount {
        momentum - amount
    } else if momentum < -amount {
        momentum + amount
    } else {
        0.0
    }
}

/// Apply one tick of bleed to every reference axis of the store.
pub fn apply_bleed(
    store: &mut MomentumStore,
    body: &BodyAxes,
    nominal: &AxisValues,
    curves: &ResponseCurves,
    frame: &ReferenceFrame,
    dt: f64,
) {
    for (idx, reference_axis) in frame.axes.iter().enumerate() {
        let torque = reference_axis_torque(reference_axis, body, nominal);
        let decay = torque * curves.bleed_scale(store.fraction(idx)) * dt;
        store.set_axis(idx, decay_toward_zero(store.axis(idx), decay));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wheel::curve::Curve;
    use approx::assert_relative_eq;
    use nalgebra::UnitQuaternion;
    use std::f64::consts::FRAC_PI_4;

    #[test]
    fn decay_never_crosses_zero() {
        assert_eq!(decay_toward_zero(0.3, 0.5), 0.0);
        assert_eq!(decay_toward_zero(-0.3, 0.5), 0.0);
        assert_eq!(decay_toward_zero(2.0, 0.5), 1.5);
        assert_eq!(decay_toward_zero(-2.0, 0.5), -1.5);
        assert_eq!(decay_toward_zero(0.5, 0.5), 0.0);
    }

    #[test]
    fn aligned_axis_uses_its_own_torque() {
        let body = BodyAxes::default();
        let nominal = AxisValues::new(3.0, 4.0, 5.0);
        assert_relative_eq!(reference_axis_torque(&Vector3::x(), &body, &nominal), 3.0);
        assert_relative_eq!(reference_axis_torque(&Vector3::z(), &body, &nominal), 5.0);
    }

    #[test]
    fn rotated_body_blends_axis_torques() {
        let q = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), FRAC_PI_4);
        let body = BodyAxes::from_attitude(&q);
        let nominal = AxisValues::new(2.0, 2.0, 9.0);
        // pitch and yaw both sit at 45 deg to reference X
        let t = reference_axis_torque(&Vector3::x(), &body, &nominal);
        assert_relative_eq!(t, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn bleed_scales_with_curve_and_dt() {
        let curves = ResponseCurves::new(Curve::default(), Curve::constant(0.1));
        let mut store = MomentumStore::with_momentum(10.0, Vector3::new(5.0, -5.0, 0.0));
        apply_bleed(
            &mut store,
            &BodyAxes::default(),
            &AxisValues::splat(10.0),
            &curves,
            &ReferenceFrame::default(),
            0.5,
        );
        assert_relative_eq!(*store.momentum(), Vector3::new(4.5, -4.5, 0.0), epsilon = 1e-12);
    }
}
