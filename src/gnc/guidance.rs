use nalgebra::UnitQuaternion;

// ---------------------------------------------------------------------------
// Guidance: target attitude as a function of time
// ---------------------------------------------------------------------------

/// Piecewise-constant attitude program. Each entry `(t, q)` becomes the
/// target from time `t` onward.
#[derive(Debug, Clone)]
pub struct SlewSchedule {
    steps: Vec<(f64, UnitQuaternion<f64>)>,
}

impl SlewSchedule {
    pub fn hold(target: UnitQuaternion<f64>) -> Self {
        Self { steps: vec![(0.0, target)] }
    }

    pub fn then(mut self, time: f64, target: UnitQuaternion<f64>) -> Self {
        self.steps.push((time, target));
        self.steps.sort_by(|a, b| a.0.total_cmp(&b.0));
        self
    }

    /// Target at time `t`; before the first entry the first target applies.
    pub fn target_at(&self, t: f64) -> UnitQuaternion<f64> {
        self.steps
            .iter()
            .take_while(|(start, _)| *start <= t)
            .last()
            .or_else(|| self.steps.first())
            .map(|(_, q)| *q)
            .unwrap_or_else(UnitQuaternion::identity)
    }
}
