use nalgebra::Vector3;

use super::frame::{project, AxisValues, BodyAxes, ControlAxis, ReferenceFrame};
use super::store::{ClampPolicy, MomentumStore};

// ---------------------------------------------------------------------------
// Input-driven momentum growth
// ---------------------------------------------------------------------------

/// Momentum added to the reference axes by one tick of control input.
///
/// Each control axis contributes `input * dt * available` along its body axis,
/// projected into the reference frame. `available` is the torque the wheel
/// can deliver at the current orientation.
pub fn input_momentum(
    command: &AxisValues,
    available: &AxisValues,
    body: &BodyAxes,
    frame: &ReferenceFrame,
    dt: f64,
) -> Vector3<f64> {
    ControlAxis::ALL
        .iter()
        .map(|&axis| {
            let delta = command.get(axis) * dt * available.get(axis);
            project(body.axis(axis), frame) * delta
        })
        .fold(Vector3::zeros(), |acc, d| acc + d)
}

/// Accumulate one tick of input into the store, then apply the clamp policy.
pub fn accumulate(
    store: &mut MomentumStore,
    command: &AxisValues,
    available: &AxisValues,
    body: &BodyAxes,
    frame: &ReferenceFrame,
    dt: f64,
    policy: ClampPolicy,
) {
    let delta = input_momentum(command, available, body, frame, dt);
    store.add(&delta);
    if policy == ClampPolicy::HardLimit {
        store.clamp_to_limit();
    }
}

/// Pilot commands are nominally in `[-1, 1]`; anything else is clamped and
/// non-finite values read as zero.
pub fn sanitize_command(command: &AxisValues) -> AxisValues {
    command.map(|v| if v.is_finite() { v.clamp(-1.0, 1.0) } else { 0.0 })
}
