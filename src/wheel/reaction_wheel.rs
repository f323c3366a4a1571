
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::discharge::{DischargeOutcome, ResourceDischargeCoordinator, ResourceSupply};
use crate::error::{ConfigError, SnapshotError};
use super::bleed::apply_bleed;
use super::config::WheelConfig;
use super::frame::{AxisValues, BodyAxes, ControlAxis};
use super::integrator::{accumulate, sanitize_command};
use super::limiter::available_torque;
use super::store::{MomentumSnapshot, MomentumStore};

/// Atmospheric density above which a wheel configured with
/// `default_active = false` starts disabled.
pub const ATMOSPHERE_DENSITY_THRESHOLD: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WheelState {
    Active,
    Disabled,
}

/// Host inputs for one tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct StepInput {
    pub body: BodyAxes,
    /// Pilot command per control axis, nominally in [-1, 1].
    pub command: AxisValues,
}

/// What the host reads back after a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutput {
    /// Torque to apply to the vehicle in place of the nominal values.
    pub control_torque: AxisValues,
    /// Torque the wheel could deliver (display value, ignores gating).
    pub available_torque: AxisValues,
    pub discharge: DischargeOutcome,
    /// Reference-frame momentum handed to the vehicle by discharge this tick.
    pub reaction_impulse: Vector3<f64>,
}

/// Read-only view for displays and logs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Telemetry {
    pub momentum: Vector3<f64>,
    pub saturation: Vector3<f64>,
    /// Saturation in percent, capped at 100.
    pub saturation_percent: Vector3<f64>,
    pub saturation_limit: f64,
    pub available_torque: AxisValues,
    pub nominal_torque: AxisValues,
    pub discharge_engaged: bool,
    pub state: WheelState,
    pub decay_enabled: bool,
}

// ---------------------------------------------------------------------------
// Reaction wheel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ReactionWheel {
    config: WheelConfig,
    store: MomentumStore,
    available: AxisValues,
    state: WheelState,
    decay_enabled: bool,
    discharge: Option<ResourceDischargeCoordinator>,
    log_clock: f64,
}

impl ReactionWheel {
    /// Build a wheel from its configuration.
    ///
    /// A discharge section that cannot be resolved leaves the wheel without
    /// discharge capability rather than failing.
    pub fn initialize(config: WheelConfig, atmospheric_density: f64) -> Result<Self, ConfigError> {
        config.validate()?;
        let limit = config.saturation_limit();

        let discharge = config.discharge.as_ref().and_then(|d| {
            match ResourceDischargeCoordinator::from_config(d, limit) {
                Ok(coordinator) => Some(coordinator),
                Err(e) => {
                    warn!(wheel = %config.name, error = %e, "momentum discharge unavailable");
                    None
                }
            }
        });

        let state = if !config.default_active && atmospheric_density > ATMOSPHERE_DENSITY_THRESHOLD {
            info!(wheel = %config.name, atmospheric_density, "starting disabled inside atmosphere");
            WheelState::Disabled
        } else {
            WheelState::Active
        };

        let mut wheel = Self {
            available: config.nominal_torque,
            store: MomentumStore::new(limit),
            state,
            decay_enabled: true,
            discharge,
            log_clock: 0.0,
            config,
        };
        wheel.refresh_torque(&BodyAxes::default());
        debug!(
            wheel = %wheel.config.name,
            saturation_limit = limit,
            can_discharge = wheel.can_force_discharge(),
            "wheel initialized"
        );
        Ok(wheel)
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &WheelConfig {
        &self.config
    }

    pub fn store(&self) -> &MomentumStore {
        &self.store
    }

    pub fn saturation_limit(&self) -> f64 {
        self.store.saturation_limit()
    }

    // --- wheel state -------------------------------------------------------

    pub fn state(&self) -> WheelState {
        self.state
    }

    pub fn set_state(&mut self, state: WheelState) {
        self.state = state;
    }

    pub fn toggle_active(&mut self) -> WheelState {
        self.state = match self.state {
            WheelState::Active => WheelState::Disabled,
            WheelState::Disabled => WheelState::Active,
        };
        self.state
    }

    pub fn decay_enabled(&self) -> bool {
        self.decay_enabled
    }

    pub fn set_decay_enabled(&mut self, enabled: bool) {
        self.decay_enabled = enabled;
    }

    // --- discharge ---------------------------------------------------------

    pub fn discharge(&self) -> Option<&ResourceDischargeCoordinator> {
        self.discharge.as_ref()
    }

    pub fn can_force_discharge(&self) -> bool {
        self.discharge.as_ref().is_some_and(|d| d.can_force_discharge())
    }

    pub fn is_discharging(&self) -> bool {
        self.discharge.as_ref().is_some_and(|d| d.is_engaged())
    }

    /// Flip discharge; returns whether it is now engaged. Applies from the
    /// next tick.
    pub fn toggle_discharge(&mut self) -> bool {
        self.discharge.as_mut().is_some_and(|d| d.toggle())
    }

    pub fn engage_discharge(&mut self) -> bool {
        self.discharge.as_mut().is_some_and(|d| d.engage())
    }

    pub fn disengage_discharge(&mut self) {
        if let Some(d) = self.discharge.as_mut() {
            d.disengage();
        }
    }

    // --- torque ------------------------------------------------------------

    pub fn available_torque(&self) -> AxisValues {
        self.available
    }

    /// Torque the host should apply: zero while disabled or discharging.
    pub fn control_torque(&self) -> AxisValues {
        if self.state == WheelState::Disabled || self.is_discharging() {
            AxisValues::default()
        } else {
            self.available
        }
    }

    /// Recompute available torque for the given orientation.
    pub fn refresh_torque(&mut self, body: &BodyAxes) {
        for axis in ControlAxis::ALL {
            let torque = available_torque(
                body.axis(axis),
                self.config.nominal_torque.get(axis),
                &self.store,
                &self.config.curves,
                &self.config.frame,
            );
            self.available.set(axis, torque);
        }
    }

    // --- tick --------------------------------------------------------------

    /// Advance the wheel by one fixed timestep.
    ///
    /// Order: discharge, input growth (skipped while disabled or while
    /// discharge was engaged at the start of the tick), bleed, torque refresh.
    pub fn step(
        &mut self,
        dt: f64,
        input: &StepInput,
        supply: &mut dyn ResourceSupply,
    ) -> StepOutput {
        if !(dt > 0.0) || !dt.is_finite() {
            warn!(wheel = %self.config.name, dt, "ignoring tick with unusable timestep");
            return StepOutput {
                control_torque: self.control_torque(),
                available_torque: self.available,
                discharge: DischargeOutcome::Idle,
                reaction_impulse: Vector3::zeros(),
            };
        }

        let command = sanitize_command(&input.command);
        let discharging = self.is_discharging();

        let discharge = match self.discharge.as_mut() {
            Some(coordinator) => coordinator.step(&mut self.store, dt, supply),
            None => DischargeOutcome::Idle,
        };
        let reaction_impulse = match &discharge {
            DischargeOutcome::Discharged(tick) => -tick.removed,
            _ => Vector3::zeros(),
        };

        if self.state == WheelState::Active && !discharging {
            self.refresh_torque(&input.body);
            accumulate(
                &mut self.store,
                &command,
                &self.available,
                &input.body,
                &self.config.frame,
                dt,
                self.config.clamp,
            );
        }

        if self.decay_enabled {
            apply_bleed(
                &mut self.store,
                &input.body,
                &self.config.nominal_torque,
                &self.config.curves,
                &self.config.frame,
                dt,
            );
        }

        self.refresh_torque(&input.body);
        self.tick_log(dt);

        StepOutput {
            control_torque: self.control_torque(),
            available_torque: self.available,
            discharge,
            reaction_impulse,
        }
    }

    fn tick_log(&mut self, dt: f64) {
        let Some(interval) = self.config.log_interval else {
            return;
        };
        self.log_clock += dt;
        if self.log_clock < interval {
            return;
        }
        self.log_clock %= interval;
        let m = self.store.momentum();
        debug!(
            wheel = %self.config.name,
            saturation_limit = self.store.saturation_limit(),
            momentum_x = m.x,
            momentum_y = m.y,
            momentum_z = m.z,
            pitch_torque = self.available.pitch,
            yaw_torque = self.available.yaw,
            roll_torque = self.available.roll,
            state = ?self.state,
            discharging = self.is_discharging(),
            "wheel telemetry"
        );
    }

    // --- telemetry / persistence -------------------------------------------

    pub fn telemetry(&self) -> Telemetry {
        Telemetry {
            momentum: *self.store.momentum(),
            saturation: self.store.fractions(),
            saturation_percent: Vector3::new(
                self.store.display_percent(0),
                self.store.display_percent(1),
                self.store.display_percent(2),
            ),
            saturation_limit: self.store.saturation_limit(),
            available_torque: self.available,
            nominal_torque: self.config.nominal_torque,
            discharge_engaged: self.is_discharging(),
            state: self.state,
            decay_enabled: self.decay_enabled,
        }
    }

    pub fn snapshot(&self) -> MomentumSnapshot {
        self.store.snapshot(self.decay_enabled)
    }

    pub fn restore(&mut self, snapshot: &MomentumSnapshot) -> Result<(), SnapshotError> {
        self.store.restore(snapshot)?;
        self.decay_enabled = snapshot.decay_enabled;
        self.refresh_torque(&BodyAxes::default());
        Ok(())
    }

    /// Human-readable summary of the wheel's ratings.
    pub fn info(&self) -> String {
        let t = &self.config.nominal_torque;
        let mut out = String::new();
        out.push_str(&format!("Pitch Torque: {:.1} N·m\n", t.pitch));
        out.push_str(&format!("Yaw Torque: {:.1} N·m\n", t.yaw));
        out.push_str(&format!("Roll Torque: {:.1} N·m\n", t.roll));
        out.push_str(&format!("Capacity: {:.1} N·m·s\n", self.store.saturation_limit()));

        match self.config.curves.bleed.value_range() {
            Some((min, max)) if min == max => {
                out.push_str(&format!("Bleed Rate: {:.1}%\n", max * 100.0));
            }
            Some((min, max)) => {
                out.push_str(&format!("Bleed Rate: min {:.1}%, max {:.1}%\n", min * 100.0, max * 100.0));
            }
            None => {
                out.push_str("Bleed Rate: none\n");
            }
        }

        if let Some(discharge) = self.discharge.as_ref() {
            out.push_str(&format!("Discharge Rate: {:.1}% / s\n", discharge.rate() * 100.0));
            out.push_str("Requires:\n");
            for consumer in discharge.consumers() {
                if consumer.rate <= 1.0 {
                    out.push_str(&format!(" - {}: {:.1} /min\n", consumer.resource, consumer.rate * 60.0));
                } else {
                    out.push_str(&format!(" - {}: {:.1} /s\n", consumer.resource, consumer.rate));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discharge::{DischargeConfig, DischargeSource, ResourcePool};
    use crate::wheel::config::WheelConfigBuilder;
    use crate::wheel::curve::Curve;
    use approx::assert_relative_eq;

    fn wheel_with_discharge() -> ReactionWheel {
        let cfg = WheelConfigBuilder::new("Test")
            .torque(10.0, 10.0, 10.0)
            .torque_curve(Curve::linear(&[(0.0, 1.0), (1.0, 0.0)]))
            .discharge(DischargeConfig::new(
                0.5,
                DischargeSource::ResourceList("MonoPropellant,1".into()),
            ))
            .build()
            .unwrap();
        ReactionWheel::initialize(cfg, 0.0).unwrap()
    }

    #[test]
    fn starts_disabled_in_atmosphere_when_configured() {
        let cfg = WheelConfigBuilder::new("W").default_active(false).build().unwrap();
        let in_air = ReactionWheel::initialize(cfg.clone(), 1.2).unwrap();
        let in_space = ReactionWheel::initialize(cfg, 0.0).unwrap();
        assert_eq!(in_air.state(), WheelState::Disabled);
        assert_eq!(in_space.state(), WheelState::Active);
    }

    #[test]
    fn malformed_discharge_disables_capability() {
        let cfg = WheelConfigBuilder::new("W")
            .discharge(DischargeConfig::new(0.1, DischargeSource::ResourceList("garbage".into())))
            .build()
            .unwrap();
        let mut wheel = ReactionWheel::initialize(cfg, 0.0).unwrap();
        assert!(!wheel.can_force_discharge());
        assert!(!wheel.toggle_discharge());
    }

    #[test]
    fn disabled_wheel_stores_nothing_and_outputs_zero() {
        let mut wheel = wheel_with_discharge();
        wheel.set_state(WheelState::Disabled);
        let input = StepInput { command: AxisValues::splat(1.0), ..Default::default() };
        let out = wheel.step(0.1, &input, &mut ResourcePool::new());
        assert!(wheel.store().is_empty());
        assert_eq!(out.control_torque, AxisValues::default());
        assert_relative_eq!(out.available_torque.pitch, 10.0);
    }

    #[test]
    fn discharge_gates_control_torque_and_input() {
        let mut wheel = wheel_with_discharge();
        let mut pool = ResourcePool::new().with_tank("MonoPropellant", 100.0, false);
        let push = StepInput { command: AxisValues::new(1.0, 0.0, 0.0), ..Default::default() };
        wheel.step(0.1, &push, &mut pool);
        let stored = wheel.store().axis(0);
        assert!(stored > 0.0);

        assert!(wheel.toggle_discharge());
        let out = wheel.step(0.1, &push, &mut pool);
        assert_eq!(out.control_torque, AxisValues::default());
        assert!(wheel.store().axis(0) < stored, "discharge should win over input");
        assert!(out.reaction_impulse.x < 0.0);
    }

    #[test]
    fn bad_timestep_is_ignored() {
        let mut wheel = wheel_with_discharge();
        let input = StepInput { command: AxisValues::splat(1.0), ..Default::default() };
        wheel.step(f64::NAN, &input, &mut ResourcePool::new());
        wheel.step(-0.1, &input, &mut ResourcePool::new());
        assert!(wheel.store().is_empty());
    }

    #[test]
    fn info_lists_capacity_and_resources() {
        let wheel = wheel_with_discharge();
        let info = wheel.info();
        assert!(info.contains("Capacity: 10.0"));
        assert!(info.contains("Bleed Rate: none"));
        assert!(info.contains("MonoPropellant: 60.0 /min"));
    }

    #[test]
    fn restore_sets_momentum_and_decay() {
        let mut wheel = wheel_with_discharge();
        let snap = MomentumSnapshot { x_moment: 5.0, y_moment: 0.0, z_moment: 0.0, decay_enabled: false };
        wheel.restore(&snap).unwrap();
        assert!(!wheel.decay_enabled());
        assert_relative_eq!(wheel.available_torque().pitch, 5.0, epsilon = 1e-12);
        assert_eq!(wheel.snapshot(), snap);
    }
}
