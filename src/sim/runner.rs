use nalgebra::{UnitQuaternion, Vector3};
use tracing::{debug, info};

use crate::discharge::ResourcePool;
use crate::dynamics::rotation::apply_impulse;
use crate::dynamics::state::{AttitudeState, SimConfig};
use crate::error::ConfigError;
use crate::gnc::{AttitudeHold, Controller, SlewSchedule};
use crate::vehicle::Craft;
use crate::wheel::integrator::sanitize_command;
use crate::wheel::{AxisValues, StepInput, Telemetry, WheelCluster};
use super::integrator::rk4_step;

// ---------------------------------------------------------------------------
// Scenario and samples
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Scenario {
    pub craft: Craft,
    pub initial: AttitudeState,
    /// Constant external torque, body frame, N·m.
    pub disturbance: Vector3<f64>,
    /// Engage discharge on every capable wheel at this time.
    pub discharge_at: Option<f64>,
    /// Hand discharged momentum back to the craft as an angular impulse.
    pub discharge_impulse: bool,
}

impl Scenario {
    pub fn new(craft: Craft) -> Self {
        Self {
            craft,
            initial: AttitudeState::at_rest(UnitQuaternion::identity()),
            disturbance: Vector3::zeros(),
            discharge_at: None,
            discharge_impulse: false,
        }
    }
}

/// One recorded tick.
#[derive(Debug, Clone)]
pub struct Sample {
    pub state: AttitudeState,
    pub command: AxisValues,
    /// Body torque the wheels applied (command × control torque).
    pub wheel_torque: Vector3<f64>,
    pub wheels: Vec<Telemetry>,
    /// Sum over every tank in the pool.
    pub resources: f64,
}

impl Sample {
    fn capture(
        state: &AttitudeState,
        command: AxisValues,
        wheel_torque: Vector3<f64>,
        cluster: &WheelCluster,
        pool: &ResourcePool,
    ) -> Self {
        Self {
            state: state.clone(),
            command,
            wheel_torque,
            wheels: cluster.wheels().iter().map(|w| w.telemetry()).collect(),
            resources: pool.tanks().iter().map(|t| t.amount).sum(),
        }
    }

    /// Highest saturation fraction over every wheel and axis.
    pub fn max_saturation(&self) -> f64 {
        self.wheels
            .iter()
            .map(|t| t.saturation.max())
            .fold(0.0_f64, f64::max)
    }

    pub fn discharging(&self) -> bool {
        self.wheels.iter().any(|t| t.discharge_engaged)
    }
}

/// Result of a run: the samples plus the wheels and tanks as they ended.
#[derive(Debug, Clone)]
pub struct Run {
    pub samples: Vec<Sample>,
    pub cluster: WheelCluster,
    pub pool: ResourcePool,
}

// ---------------------------------------------------------------------------
// Simulation loop
// ---------------------------------------------------------------------------

/// Simulate a scenario with a custom controller.
///
/// Per tick: controller → wheels (against the craft's resource pool) →
/// RK4 attitude step under wheel torque plus disturbance.
pub fn simulate_with(
    scenario: &Scenario,
    config: &SimConfig,
    controller: &mut dyn Controller,
) -> Result<Run, ConfigError> {
    let mut cluster = scenario.craft.build_cluster()?;
    let mut pool = scenario.craft.resource_pool();
    let inertia = scenario.craft.inertia;
    let mut state = scenario.initial.clone();

    let capacity = (config.max_time / config.dt) as usize + 1;
    let mut samples = Vec::with_capacity(capacity.min(200_000));
    samples.push(Sample::capture(&state, AxisValues::default(), Vector3::zeros(), &cluster, &pool));

    info!(
        craft = %scenario.craft.name,
        controller = controller.name(),
        wheels = cluster.wheels().len(),
        "simulation start"
    );

    let mut discharge_requested = false;
    while state.time + config.dt * 0.5 < config.max_time {
        if let Some(t) = scenario.discharge_at {
            if !discharge_requested && state.time >= t {
                let engaged = cluster.engage_discharge();
                debug!(time = state.time, engaged, "discharge requested");
                discharge_requested = true;
            }
        }

        let command = sanitize_command(&controller.control(&state, config.dt));
        let input = StepInput { body: state.body_axes(), command };
        let out = cluster.step(config.dt, &input, &mut pool);

        let wheel_torque = command.to_body_vector().component_mul(&out.control_torque.to_body_vector());
        let torque = wheel_torque + scenario.disturbance;
        state = rk4_step(&state, &inertia, &torque, config.dt);

        if scenario.discharge_impulse && out.reaction_impulse != Vector3::zeros() {
            let body_impulse = state.quat.inverse() * out.reaction_impulse;
            apply_impulse(&mut state, &inertia, &body_impulse);
        }

        samples.push(Sample::capture(&state, command, wheel_torque, &cluster, &pool));
    }

    info!(craft = %scenario.craft.name, ticks = samples.len() - 1, "simulation end");
    Ok(Run { samples, cluster, pool })
}

/// Simulate holding the initial attitude with the default [`AttitudeHold`].
pub fn simulate(scenario: &Scenario, config: &SimConfig) -> Result<Run, ConfigError> {
    let mut controller = AttitudeHold::new(SlewSchedule::hold(scenario.initial.quat));
    simulate_with(scenario, config, &mut controller)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gnc::ConstantCommand;
    use crate::vehicle::presets;

    #[test]
    fn sample_count_matches_duration() {
        let scenario = Scenario::new(presets::pod());
        let config = SimConfig { dt: 0.02, max_time: 2.0 };
        let run = simulate(&scenario, &config).unwrap();
        assert_eq!(run.samples.len(), 101);
        assert!((run.samples.last().unwrap().state.time - 2.0).abs() < 1e-9);
    }

    #[test]
    fn holding_still_stores_nothing() {
        let scenario = Scenario::new(presets::pod());
        let config = SimConfig { dt: 0.02, max_time: 5.0 };
        let run = simulate(&scenario, &config).unwrap();
        assert!(run.cluster.wheels()[0].store().is_empty());
        assert!(run.samples.iter().all(|s| s.state.omega.norm() < 1e-12));
    }

    #[test]
    fn constant_command_spins_up_and_saturates() {
        let scenario = Scenario::new(presets::pod());
        let config = SimConfig { dt: 0.02, max_time: 20.0 };
        let mut pilot = ConstantCommand(AxisValues::new(0.0, 0.0, 1.0));
        let run = simulate_with(&scenario, &config, &mut pilot).unwrap();

        let last = run.samples.last().unwrap();
        assert!(last.state.omega.z > 0.0);
        // stored momentum only grows while torque is commanded
        let roll: Vec<f64> = run.samples.iter().map(|s| s.wheels[0].momentum.z).collect();
        assert!(roll.windows(2).all(|w| w[1] >= w[0] - 1e-12));
        assert!(last.wheels[0].available_torque.roll < 5.0);
    }

    #[test]
    fn disturbance_then_discharge_draws_resources() {
        let mut scenario = Scenario::new(presets::pod());
        scenario.disturbance = Vector3::new(0.5, 0.0, 0.0);
        scenario.discharge_at = Some(10.0);
        let config = SimConfig { dt: 0.02, max_time: 15.0 };
        let run = simulate(&scenario, &config).unwrap();

        let start = run.samples[0].resources;
        let end = run.samples.last().unwrap().resources;
        assert!(end < start, "discharge should consume monopropellant");
        assert!(end >= 0.0);
    }

    #[test]
    fn invalid_craft_is_an_error() {
        let mut craft = presets::pod();
        craft.wheels[0].saturation_scale = -1.0;
        let scenario = Scenario::new(craft);
        assert!(simulate(&scenario, &SimConfig::default()).is_err());
    }
}
