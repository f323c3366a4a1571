use nalgebra::Vector3;

use super::curve::ResponseCurves;
use super::frame::{project, ReferenceFrame};
use super::store::MomentumStore;

/// Ratio assigned to reference axes a control axis does not touch, so they
/// never bind.
pub const UNCONSTRAINED_RATIO: f64 = 1.0e6;

// ---------------------------------------------------------------------------
// Saturation torque limiter
// ---------------------------------------------------------------------------

/// Torque deliverable about `axis` given the current store.
///
/// The axis draws on every reference axis it has a component along; the most
/// saturated one (relative to its share) scales the whole output so no
/// reference axis over-delivers. Result is within `[0, nominal]`.
pub fn available_torque(
    axis: &Vector3<f64>,
    nominal: f64,
    store: &MomentumStore,
    curves: &ResponseCurves,
    frame: &ReferenceFrame,
) -> f64 {
    let nominal = if nominal.is_finite() { nominal.max(0.0) } else { 0.0 };
    let weights = project(axis, frame);
    let scale = limiting_scale(&weights, store, curves);
    let torque = weights.norm() * scale * nominal;
    if torque.is_finite() {
        torque.clamp(0.0, nominal)
    } else {
        0.0
    }
}

/// `min(ratio_a, ratio_b, ratio_c, 1)` for the given direction weights.
pub fn limiting_scale(
    weights: &Vector3<f64>,
    store: &MomentumStore,
    curves: &ResponseCurves,
) -> f64 {
    (0..3)
        .map(|i| {
            let w = weights[i];
            if w != 0.0 {
                (curves.torque_scale(store.fraction(i)) / w).abs()
            } else {
                UNCONSTRAINED_RATIO
            }
        })
        .fold(1.0, f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wheel::curve::Curve;
    use crate::wheel::frame::BodyAxes;
    use approx::assert_relative_eq;
    use nalgebra::UnitQuaternion;

    fn falling_curves() -> ResponseCurves {
        ResponseCurves::new(Curve::linear(&[(0.0, 1.0), (1.0, 0.0)]), Curve::default())
    }

    #[test]
    fn unsaturated_gives_nominal() {
        let store = MomentumStore::new(10.0);
        let t = available_torque(
            &Vector3::x(),
            5.0,
            &store,
            &falling_curves(),
            &ReferenceFrame::default(),
        );
        assert_relative_eq!(t, 5.0);
    }

    #[test]
    fn aligned_axis_follows_curve() {
        let store = MomentumStore::with_momentum(10.0, Vector3::new(-4.0, 0.0, 0.0));
        let t = available_torque(
            &Vector3::x(),
            5.0,
            &store,
            &falling_curves(),
            &ReferenceFrame::default(),
        );
        assert_relative_eq!(t, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn untouched_axes_do_not_bind() {
        // fully saturated on Y, but the command only uses X
        let store = MomentumStore::with_momentum(10.0, Vector3::new(0.0, 10.0, 0.0));
        let t = available_torque(
            &Vector3::x(),
            5.0,
            &store,
            &falling_curves(),
            &ReferenceFrame::default(),
        );
        assert_relative_eq!(t, 5.0);
    }

    #[test]
    fn worst_contributing_axis_binds() {
        // 45 deg between X and Y, X half saturated, Y empty
        let axis = Vector3::new(1.0, 1.0, 0.0).normalize();
        let store = MomentumStore::with_momentum(10.0, Vector3::new(5.0, 0.0, 0.0));
        let t = available_torque(&axis, 8.0, &store, &falling_curves(), &ReferenceFrame::default());
        // ratio_x = 0.5 / 0.7071 = 0.7071, ratio_y = 1 / 0.7071 > 1
        assert_relative_eq!(t, 8.0 * 0.5_f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn zero_limit_means_unsaturated() {
        let store = MomentumStore::with_momentum(0.0, Vector3::new(100.0, 100.0, 100.0));
        let t = available_torque(
            &Vector3::z(),
            2.0,
            &store,
            &falling_curves(),
            &ReferenceFrame::default(),
        );
        assert_relative_eq!(t, 2.0);
    }

    #[test]
    fn output_stays_in_bounds_over_orientations_and_states() {
        let curves = ResponseCurves::new(
            Curve::linear(&[(0.0, 1.2), (0.5, 0.4), (1.0, 0.0)]),
            Curve::default(),
        );
        let frame = ReferenceFrame::default();
        for step in 0..24 {
            let angle = step as f64 * 0.27;
            let q = UnitQuaternion::from_euler_angles(angle, angle * 0.5, -angle);
            let axes = BodyAxes::from_attitude(&q);
            for m in [-30.0, -7.5, 0.0, 3.3, 12.0] {
                let store = MomentumStore::with_momentum(10.0, Vector3::new(m, -m * 0.5, m * 0.1));
                for axis in [&axes.pitch, &axes.yaw, &axes.roll] {
                    let t = available_torque(axis, 7.0, &store, &curves, &frame);
                    assert!((0.0..=7.0).contains(&t), "torque {} out of bounds", t);
                }
            }
        }
    }
}
