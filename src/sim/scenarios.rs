use nalgebra::{UnitQuaternion, Vector3};

use crate::dynamics::state::SimConfig;
use crate::gnc::SlewSchedule;
use crate::vehicle::presets;
use super::runner::Scenario;

/// A ready-to-run scenario with its attitude program.
#[derive(Debug, Clone)]
pub struct Demo {
    pub scenario: Scenario,
    pub schedule: SlewSchedule,
    pub config: SimConfig,
}

/// Pod slews 60° in pitch, holds against a steady disturbance until the
/// wheel loads up, then dumps momentum with monopropellant.
pub fn slew_and_dump() -> Demo {
    let mut scenario = Scenario::new(presets::pod());
    scenario.disturbance = Vector3::new(0.0, 0.15, 0.05);
    scenario.discharge_at = Some(60.0);

    let pitched = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 60.0_f64.to_radians());
    Demo {
        scenario,
        schedule: SlewSchedule::hold(UnitQuaternion::identity()).then(5.0, pitched),
        config: SimConfig { dt: 0.02, max_time: 90.0 },
    }
}

/// Probe stack spinning down from a tumble using both wheels.
pub fn detumble() -> Demo {
    let mut scenario = Scenario::new(presets::probe_stack());
    scenario.initial.omega = Vector3::new(0.05, -0.03, 0.08);
    Demo {
        scenario,
        schedule: SlewSchedule::hold(UnitQuaternion::identity()),
        config: SimConfig { dt: 0.02, max_time: 120.0 },
    }
}
