use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;

/// `|momentum| / limit`, or 0 when the limit is not a usable positive number.
pub fn saturation_fraction(momentum: f64, limit: f64) -> f64 {
    if limit > 0.0 && limit.is_finite() && momentum.is_finite() {
        momentum.abs() / limit
    } else {
        0.0
    }
}

/// Whether stored momentum is held inside `±saturation_limit`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClampPolicy {
    /// Momentum may exceed the limit; only curve lookups saturate.
    #[default]
    Unbounded,
    /// Each axis is clamped to the limit after input growth.
    HardLimit,
}

// ---------------------------------------------------------------------------
// Momentum store
// ---------------------------------------------------------------------------

/// Momentum held on each of the three reference axes.
#[derive(Debug, Clone, PartialEq)]
pub struct MomentumStore {
    momentum: Vector3<f64>,
    saturation_limit: f64,
}

impl MomentumStore {
    pub fn new(saturation_limit: f64) -> Self {
        Self { momentum: Vector3::zeros(), saturation_limit }
    }

    pub fn with_momentum(saturation_limit: f64, momentum: Vector3<f64>) -> Self {
        Self { momentum, saturation_limit }
    }

    pub fn momentum(&self) -> &Vector3<f64> {
        &self.momentum
    }

    pub fn axis(&self, idx: usize) -> f64 {
        self.momentum[idx]
    }

    pub fn saturation_limit(&self) -> f64 {
        self.saturation_limit
    }

    pub fn fraction(&self, idx: usize) -> f64 {
        saturation_fraction(self.momentum[idx], self.saturation_limit)
    }

    pub fn fractions(&self) -> Vector3<f64> {
        Vector3::new(self.fraction(0), self.fraction(1), self.fraction(2))
    }

    /// Display value: saturation in percent, capped at 100.
    pub fn display_percent(&self, idx: usize) -> f64 {
        self.fraction(idx).min(1.0) * 100.0
    }

    pub fn is_empty(&self) -> bool {
        self.momentum.iter().all(|m| *m == 0.0)
    }

    pub fn add(&mut self, delta: &Vector3<f64>) {
        self.momentum += delta;
    }

    pub fn set_axis(&mut self, idx: usize, value: f64) {
        self.momentum[idx] = value;
    }

    pub fn clamp_to_limit(&mut self) {
        let limit = self.saturation_limit.max(0.0);
        self.momentum.apply(|m| *m = m.clamp(-limit, limit));
    }

    pub fn snapshot(&self, decay_enabled: bool) -> MomentumSnapshot {
        MomentumSnapshot {
            x_moment: self.momentum.x,
            y_moment: self.momentum.y,
            z_moment: self.momentum.z,
            decay_enabled,
        }
    }

    /// Load persisted momenta verbatim. The limit stays as configured.
    pub fn restore(&mut self, snapshot: &MomentumSnapshot) -> Result<(), SnapshotError> {
        let m = snapshot.momentum();
        if let Some(idx) = m.iter().position(|v| !v.is_finite()) {
            return Err(SnapshotError::NonFinite(idx));
        }
        self.momentum = m;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Persisted form
// ---------------------------------------------------------------------------

/// The persisted part of a wheel. Everything else is rebuilt from config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MomentumSnapshot {
    pub x_moment: f64,
    pub y_moment: f64,
    pub z_moment: f64,
    #[serde(default = "default_decay")]
    pub decay_enabled: bool,
}

fn default_decay() -> bool {
    true
}

impl MomentumSnapshot {
    pub fn momentum(&self) -> Vector3<f64> {
        Vector3::new(self.x_moment, self.y_moment, self.z_moment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_guards_zero_limit() {
        assert_eq!(saturation_fraction(5.0, 0.0), 0.0);
        assert_eq!(saturation_fraction(5.0, -2.0), 0.0);
        assert_eq!(saturation_fraction(-5.0, 10.0), 0.5);
    }

    #[test]
    fn display_percent_caps_at_full() {
        let store = MomentumStore::with_momentum(10.0, Vector3::new(25.0, -5.0, 0.0));
        assert_eq!(store.fraction(0), 2.5);
        assert_eq!(store.display_percent(0), 100.0);
        assert_eq!(store.display_percent(1), 50.0);
    }

    #[test]
    fn clamp_holds_sign() {
        let mut store = MomentumStore::with_momentum(4.0, Vector3::new(9.0, -9.0, 1.0));
        store.clamp_to_limit();
        assert_eq!(*store.momentum(), Vector3::new(4.0, -4.0, 1.0));
    }

    #[test]
    fn restore_rejects_non_finite() {
        let mut store = MomentumStore::new(1.0);
        let snap = MomentumSnapshot { y_moment: f64::NAN, ..Default::default() };
        assert!(matches!(store.restore(&snap), Err(SnapshotError::NonFinite(1))));
        assert!(store.is_empty());
    }

    #[test]
    fn snapshot_without_decay_flag_defaults_on() {
        let snap: MomentumSnapshot =
            serde_json::from_str(r#"{"x_moment":1.5,"y_moment":0.0,"z_moment":-2.0}"#).unwrap();
        assert!(snap.decay_enabled);
        assert_eq!(snap.momentum(), Vector3::new(1.5, 0.0, -2.0));
    }
}
