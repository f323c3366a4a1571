use nalgebra::Vector3;

use crate::discharge::{DischargeOutcome, ResourceSupply};
use super::frame::AxisValues;
use super::reaction_wheel::{ReactionWheel, StepInput, WheelState};

/// Summed result of stepping every wheel in a cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterOutput {
    pub control_torque: AxisValues,
    pub available_torque: AxisValues,
    pub reaction_impulse: Vector3<f64>,
    /// Per-wheel discharge outcome, in wheel order.
    pub discharge: Vec<DischargeOutcome>,
}

/// All wheels fitted to one vehicle.
///
/// Wheels share the resource supply but nothing else; each keeps its own
/// store and curves.
#[derive(Debug, Clone, Default)]
pub struct WheelCluster {
    pub name: String,
    forced_active: bool,
    wheels: Vec<ReactionWheel>,
}

impl WheelCluster {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), forced_active: false, wheels: Vec::new() }
    }

    pub fn with_wheel(mut self, wheel: ReactionWheel) -> Self {
        self.wheels.push(wheel);
        self
    }

    pub fn add_wheel(&mut self, wheel: ReactionWheel) {
        self.wheels.push(wheel);
    }

    pub fn wheels(&self) -> &[ReactionWheel] {
        &self.wheels
    }

    pub fn wheels_mut(&mut self) -> &mut [ReactionWheel] {
        &mut self.wheels
    }

    pub fn forced_active(&self) -> bool {
        self.forced_active
    }

    /// While set, every wheel is held active regardless of its own toggle.
    pub fn set_forced_active(&mut self, forced: bool) {
        self.forced_active = forced;
        if forced {
            for wheel in &mut self.wheels {
                wheel.set_state(WheelState::Active);
            }
        }
    }

    /// Engage discharge on every wheel that can; returns how many engaged.
    pub fn engage_discharge(&mut self) -> usize {
        self.wheels
            .iter_mut()
            .map(|w| w.engage_discharge())
            .filter(|engaged| *engaged)
            .count()
    }

    pub fn is_discharging(&self) -> bool {
        self.wheels.iter().any(ReactionWheel::is_discharging)
    }

    pub fn nominal_torque(&self) -> AxisValues {
        self.wheels
            .iter()
            .fold(AxisValues::default(), |acc, w| add(acc, w.config().nominal_torque))
    }

    pub fn step(
        &mut self,
        dt: f64,
        input: &StepInput,
        supply: &mut dyn ResourceSupply,
    ) -> ClusterOutput {
        let mut out = ClusterOutput {
            control_torque: AxisValues::default(),
            available_torque: AxisValues::default(),
            reaction_impulse: Vector3::zeros(),
            discharge: Vec::with_capacity(self.wheels.len()),
        };
        for wheel in &mut self.wheels {
            if self.forced_active {
                wheel.set_state(WheelState::Active);
            }
            let step = wheel.step(dt, input, supply);
            out.control_torque = add(out.control_torque, step.control_torque);
            out.available_torque = add(out.available_torque, step.available_torque);
            out.reaction_impulse += step.reaction_impulse;
            out.discharge.push(step.discharge);
        }
        out
    }
}

fn add(a: AxisValues, b: AxisValues) -> AxisValues {
    AxisValues::new(a.pitch + b.pitch, a.yaw + b.yaw, a.roll + b.roll)
}
