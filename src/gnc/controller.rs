use crate::dynamics::state::AttitudeState;
use crate::wheel::AxisValues;

/// Trait for attitude controllers.
///
/// Implement this to create custom pilots that can be plugged into the
/// simulation loop. Commands are per control axis in `[-1, 1]`; the wheels
/// sanitize anything outside that range.
pub trait Controller {
    /// Compute the wheel command from the current attitude.
    fn control(&mut self, state: &AttitudeState, dt: f64) -> AxisValues;

    /// Reset controller internal state (e.g., PID integrators).
    fn reset(&mut self) {}

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}

// ---------------------------------------------------------------------------
// Constant command (open loop)
// ---------------------------------------------------------------------------

/// Holds the same command every tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantCommand(pub AxisValues);

impl Controller for ConstantCommand {
    fn control(&mut self, _state: &AttitudeState, _dt: f64) -> AxisValues {
        self.0
    }

    fn name(&self) -> &str {
        "ConstantCommand"
    }
}
