use crate::dynamics::state::AttitudeState;
use crate::wheel::AxisValues;
use super::guidance::SlewSchedule;
use super::pid::Pid;

// ---------------------------------------------------------------------------
// Attitude hold: guidance + per-axis PID
// ---------------------------------------------------------------------------

/// Tracks a [`SlewSchedule`] with one PID per control axis.
///
/// The error is the rotation vector from the current attitude to the target,
/// in body axes, so pitch acts on body X, yaw on body Y and roll on body Z.
#[derive(Debug, Clone)]
pub struct AttitudeHold {
    pub schedule: SlewSchedule,
    pub pitch_pid: Pid,
    pub yaw_pid: Pid,
    pub roll_pid: Pid,
}

impl AttitudeHold {
    pub fn new(schedule: SlewSchedule) -> Self {
        // Tuned for a ~10 kg·m² craft with a few N·m of wheel torque
        let pid = Pid::new(2.0, 0.05, 4.0).with_output_limit(1.0);
        Self {
            schedule,
            pitch_pid: pid.clone(),
            yaw_pid: pid.clone(),
            roll_pid: pid,
        }
    }

    pub fn update(&mut self, state: &AttitudeState, dt: f64) -> AxisValues {
        let target = self.schedule.target_at(state.time);
        let error = (state.quat.inverse() * target).scaled_axis();
        AxisValues::new(
            self.pitch_pid.update(error.x, dt),
            self.yaw_pid.update(error.y, dt),
            self.roll_pid.update(error.z, dt),
        )
    }

    pub fn reset(&mut self) {
        self.pitch_pid.reset();
        self.yaw_pid.reset();
        self.roll_pid.reset();
    }
}

impl super::Controller for AttitudeHold {
    fn control(&mut self, state: &AttitudeState, dt: f64) -> AxisValues {
        self.update(state, dt)
    }

    fn reset(&mut self) {
        AttitudeHold::reset(self);
    }

    fn name(&self) -> &str {
        "AttitudeHold"
    }
}
