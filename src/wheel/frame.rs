use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Control axes
// ---------------------------------------------------------------------------

/// The three control axes a wheel accepts commands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlAxis {
    Pitch,
    Yaw,
    Roll,
}

impl ControlAxis {
    pub const ALL: [ControlAxis; 3] = [ControlAxis::Pitch, ControlAxis::Yaw, ControlAxis::Roll];

    pub fn name(self) -> &'static str {
        match self {
            ControlAxis::Pitch => "pitch",
            ControlAxis::Yaw => "yaw",
            ControlAxis::Roll => "roll",
        }
    }
}

/// One scalar per control axis (commands, torques).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisValues {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

impl AxisValues {
    pub const fn new(pitch: f64, yaw: f64, roll: f64) -> Self {
        Self { pitch, yaw, roll }
    }

    pub const fn splat(v: f64) -> Self {
        Self { pitch: v, yaw: v, roll: v }
    }

    pub fn get(&self, axis: ControlAxis) -> f64 {
        match axis {
            ControlAxis::Pitch => self.pitch,
            ControlAxis::Yaw => self.yaw,
            ControlAxis::Roll => self.roll,
        }
    }

    pub fn set(&mut self, axis: ControlAxis, value: f64) {
        match axis {
            ControlAxis::Pitch => self.pitch = value,
            ControlAxis::Yaw => self.yaw = value,
            ControlAxis::Roll => self.roll = value,
        }
    }

    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self::new(f(self.pitch), f(self.yaw), f(self.roll))
    }

    pub fn mean(&self) -> f64 {
        (self.pitch + self.yaw + self.roll) / 3.0
    }

    /// Body-frame vector `(pitch, yaw, roll)` → `(x, y, z)`.
    pub fn to_body_vector(self) -> Vector3<f64> {
        Vector3::new(self.pitch, self.yaw, self.roll)
    }
}

// ---------------------------------------------------------------------------
// Body axes and the fixed reference frame
// ---------------------------------------------------------------------------

/// Control axes of the vehicle expressed in the fixed reference frame.
///
/// Body convention: pitch = body X, yaw = body Y, roll = body Z (nose).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyAxes {
    pub pitch: Vector3<f64>,
    pub yaw: Vector3<f64>,
    pub roll: Vector3<f64>,
}

impl BodyAxes {
    /// Axes of a vehicle with attitude `q` (body → reference rotation).
    pub fn from_attitude(q: &UnitQuaternion<f64>) -> Self {
        Self {
            pitch: q * Vector3::x(),
            yaw: q * Vector3::y(),
            roll: q * Vector3::z(),
        }
    }

    pub fn axis(&self, axis: ControlAxis) -> &Vector3<f64> {
        match axis {
            ControlAxis::Pitch => &self.pitch,
            ControlAxis::Yaw => &self.yaw,
            ControlAxis::Roll => &self.roll,
        }
    }
}

impl Default for BodyAxes {
    fn default() -> Self {
        Self::from_attitude(&UnitQuaternion::identity())
    }
}

/// Orthonormal basis the momentum store is kept in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceFrame {
    pub axes: [Vector3<f64>; 3],
}

impl ReferenceFrame {
    pub fn new(a: Vector3<f64>, b: Vector3<f64>, c: Vector3<f64>) -> Self {
        Self { axes: [a, b, c] }
    }
}

impl Default for ReferenceFrame {
    fn default() -> Self {
        Self::new(Vector3::x(), Vector3::y(), Vector3::z())
    }
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// Dot products of `v` against each reference axis.
pub fn project(v: &Vector3<f64>, frame: &ReferenceFrame) -> Vector3<f64> {
    Vector3::new(
        v.dot(&frame.axes[0]),
        v.dot(&frame.axes[1]),
        v.dot(&frame.axes[2]),
    )
}

/// Inverse of [`project`] for an orthonormal frame.
pub fn unproject(weights: &Vector3<f64>, frame: &ReferenceFrame) -> Vector3<f64> {
    frame.axes[0] * weights.x + frame.axes[1] * weights.y + frame.axes[2] * weights.z
}
