use nalgebra::{Quaternion, UnitQuaternion, Vector3};

use crate::wheel::BodyAxes;

// ---------------------------------------------------------------------------
// Physical constants
// ---------------------------------------------------------------------------

pub const G0: f64 = 9.80665;

// ---------------------------------------------------------------------------
// Attitude state: orientation and body rates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct AttitudeState {
    pub time: f64,
    pub quat: UnitQuaternion<f64>,      // body→reference rotation
    pub omega: Vector3<f64>,            // rad/s, body frame angular velocity
}

impl AttitudeState {
    pub fn at_rest(quat: UnitQuaternion<f64>) -> Self {
        Self { time: 0.0, quat, omega: Vector3::zeros() }
    }

    pub fn apply(&self, d: &Deriv, dt: f64) -> AttitudeState {
        // Quaternion integration: q_new = normalize(q + dq * dt)
        let q_raw = self.quat.quaternion() + d.dquat * dt;
        AttitudeState {
            time: self.time + dt,
            quat: UnitQuaternion::new_normalize(q_raw),
            omega: self.omega + d.domega * dt,
        }
    }

    /// Control axes in the reference frame, as the wheels see them.
    pub fn body_axes(&self) -> BodyAxes {
        BodyAxes::from_attitude(&self.quat)
    }

    /// Angle (rad) between this attitude and `target`.
    pub fn angle_to(&self, target: &UnitQuaternion<f64>) -> f64 {
        self.quat.angle_to(target)
    }
}

// ---------------------------------------------------------------------------
// State derivative
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Deriv {
    pub dquat: Quaternion<f64>,   // raw derivative, not unit
    pub domega: Vector3<f64>,     // angular acceleration, body frame
}

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SimConfig {
    pub dt: f64,
    pub max_time: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 0.02,         // 50 Hz physics tick
            max_time: 120.0,
        }
    }
}
