use nalgebra::Vector3;

use saturable_wheel::dynamics::state::{AttitudeState, SimConfig};
use saturable_wheel::gnc::Controller;
use saturable_wheel::sim::{self, Scenario};
use saturable_wheel::vehicle::CraftBuilder;
use saturable_wheel::wheel::{presets, AxisValues};

/// A bang-bang pilot that kicks the craft into a roll, coasts, then brakes
/// for the same duration.
struct BangBangPilot {
    kick_start: f64,
    kick_end: f64,
    brake_start: f64,
}

impl Controller for BangBangPilot {
    fn control(&mut self, state: &AttitudeState, _dt: f64) -> AxisValues {
        let t = state.time;
        let kick = self.kick_end - self.kick_start;
        let roll = if t >= self.kick_start && t < self.kick_end {
            1.0
        } else if t >= self.brake_start && t < self.brake_start + kick {
            -1.0
        } else {
            0.0
        };
        AxisValues::new(0.0, 0.0, roll)
    }

    fn name(&self) -> &str {
        "BangBang"
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    let craft = CraftBuilder::new("BangBang Demo")
        .inertia(Vector3::new(12.0, 12.0, 6.0))
        .wheel(presets::command_pod())
        .tank("MonoPropellant", 10.0, false)
        .build();

    let scenario = Scenario::new(craft);
    let config = SimConfig { dt: 0.02, max_time: 20.0 };

    let mut pilot = BangBangPilot { kick_start: 1.0, kick_end: 3.0, brake_start: 8.0 };

    println!("Simulating with {} pilot...", pilot.name());
    let run = sim::simulate_with(&scenario, &config, &mut pilot)?;

    let peak = run.samples.iter().map(|s| s.max_saturation()).fold(0.0_f64, f64::max);
    let last = run.samples.last().ok_or("no samples")?;

    println!("Peak saturation: {:.1}%", peak * 100.0);
    println!("Final roll rate: {:.4} rad/s", last.state.omega.z);
    println!("Stored momentum: {:.3} N·m·s", last.wheels[0].momentum.z);
    println!("Samples: {}", run.samples.len());
    Ok(())
}
