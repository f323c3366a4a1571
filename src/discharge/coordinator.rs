use nalgebra::Vector3;
use tracing::{info, warn};

use crate::error::DischargeSpecError;
use crate::wheel::store::MomentumStore;
use super::config::DischargeConfig;
use super::resource::{ResourceConsumer, ResourceId, ResourceSupply};

/// Delivered share below which a tick counts as starved mid-withdrawal.
const SHORT_DELIVERY: f64 = 0.99;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DischargeState {
    Disengaged,
    Engaged,
}

/// What one tick of discharge did.
#[derive(Debug, Clone, PartialEq)]
pub enum DischargeOutcome {
    /// Not engaged this tick.
    Idle,
    /// Stored momentum is (effectively) gone; discharge ended without drawing.
    NothingToRemove,
    /// A resource could not support the tick; discharge ended, nothing changed.
    Starved {
        resource: Option<ResourceId>,
        feasibility: f64,
    },
    Discharged(DischargeTick),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DischargeTick {
    /// Momentum taken off each reference axis.
    pub removed: Vector3<f64>,
    pub demand: f64,
    pub feasibility: f64,
    /// Smallest share of a requested withdrawal the supply actually handed over.
    pub delivered: f64,
    pub withdrawn: Vec<(ResourceId, f64)>,
    /// Store reached exactly zero and discharge ended.
    pub finished: bool,
}

// ---------------------------------------------------------------------------
// Resource discharge coordinator
// ---------------------------------------------------------------------------

/// Converts stored momentum into resource draw and removes it.
///
/// All resources are queried before any is withdrawn; the tick runs at the
/// fraction the scarcest resource can support, so no resource is drawn
/// beyond what the others can match. Consumers of the same resource are
/// checked against their combined requirement. Momentum removed is scaled
/// by what the supply actually delivered.
#[derive(Debug, Clone)]
pub struct ResourceDischargeCoordinator {
    consumers: Vec<ResourceConsumer>,
    rate: f64,
    min_demand: f64,
    min_feasibility: f64,
    state: DischargeState,
}

impl ResourceDischargeCoordinator {
    pub fn new(
        consumers: Vec<ResourceConsumer>,
        rate: f64,
        min_demand: f64,
        min_feasibility: f64,
    ) -> Self {
        Self {
            consumers,
            rate,
            min_demand,
            min_feasibility,
            state: DischargeState::Disengaged,
        }
    }

    pub fn from_config(
        config: &DischargeConfig,
        saturation_limit: f64,
    ) -> Result<Self, DischargeSpecError> {
        let consumers = config.resolve(saturation_limit)?;
        Ok(Self::new(consumers, config.rate, config.min_demand, config.min_feasibility))
    }

    pub fn consumers(&self) -> &[ResourceConsumer] {
        &self.consumers
    }

    /// Fraction of the saturation limit removable per second.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn state(&self) -> DischargeState {
        self.state
    }

    pub fn is_engaged(&self) -> bool {
        self.state == DischargeState::Engaged
    }

    pub fn can_force_discharge(&self) -> bool {
        self.rate > 0.0 && self.consumers.iter().any(|c| c.rate > 0.0)
    }

    /// Returns whether discharge is now engaged.
    pub fn engage(&mut self) -> bool {
        if self.can_force_discharge() && self.state == DischargeState::Disengaged {
            info!("momentum discharge engaged");
            self.state = DischargeState::Engaged;
        }
        self.is_engaged()
    }

    pub fn disengage(&mut self) {
        if self.state == DischargeState::Engaged {
            info!("momentum discharge disengaged");
        }
        self.state = DischargeState::Disengaged;
    }

    pub fn toggle(&mut self) -> bool {
        if self.is_engaged() {
            self.disengage();
            false
        } else {
            self.engage()
        }
    }

    /// Run one tick of discharge against `store`.
    pub fn step(
        &mut self,
        store: &mut MomentumStore,
        dt: f64,
        supply: &mut dyn ResourceSupply,
    ) -> DischargeOutcome {
        if !self.is_engaged() {
            return DischargeOutcome::Idle;
        }

        let max = self.rate * store.saturation_limit() * dt;
        if !(max > 0.0) || !max.is_finite() {
            self.disengage();
            return DischargeOutcome::NothingToRemove;
        }

        let delta = store.momentum().map(|m| m.clamp(-max, max));
        let demand = delta.abs().sum() / (3.0 * max);
        if demand < self.min_demand {
            self.disengage();
            return DischargeOutcome::NothingToRemove;
        }

        // Query every resource first: (consumer index, required)
        let required: Vec<f64> = self
            .consumers
            .iter()
            .map(|c| c.rate * demand * dt)
            .collect();
        let mut plan = Vec::with_capacity(self.consumers.len());
        let mut feasibility = 1.0_f64;
        let mut binding = None;
        for (idx, consumer) in self.consumers.iter().enumerate() {
            if !(required[idx] > 0.0) {
                continue;
            }
            // Consumers naming the same resource draw on the same tanks
            let shared: f64 = self
                .consumers
                .iter()
                .zip(&required)
                .filter(|(other, r)| other.resource == consumer.resource && **r > 0.0)
                .map(|(_, r)| r)
                .sum();
            let available = supply.available(&consumer.resource, consumer.flow_mode).max(0.0);
            let fraction = available / shared;
            if fraction < feasibility {
                feasibility = fraction;
                binding = Some(idx);
            }
            plan.push((idx, required[idx]));
        }

        if feasibility < self.min_feasibility {
            let resource = binding.map(|idx| self.consumers[idx].resource.clone());
            warn!(
                resource = resource.as_ref().map(ResourceId::as_str).unwrap_or("?"),
                feasibility,
                "momentum discharge halted due to lack of resources"
            );
            self.state = DischargeState::Disengaged;
            return DischargeOutcome::Starved { resource, feasibility };
        }

        let mut withdrawn = Vec::with_capacity(plan.len());
        let mut delivered = 1.0_f64;
        for (idx, required) in plan {
            let consumer = &self.consumers[idx];
            let amount = required * feasibility;
            let got = supply.withdraw(&consumer.resource, consumer.flow_mode, amount).max(0.0);
            if got < amount * (1.0 - 1.0e-9) {
                delivered = delivered.min(got / amount);
            }
            withdrawn.push((consumer.resource.clone(), got));
        }

        let removed = delta * (feasibility * delivered);
        for axis in 0..3 {
            store.set_axis(axis, store.axis(axis) - removed[axis]);
        }

        if delivered < SHORT_DELIVERY {
            warn!(delivered, "resource supply fell short; momentum discharge halted");
            self.state = DischargeState::Disengaged;
        }

        let finished = store.is_empty();
        if finished {
            info!("momentum discharge complete");
            self.state = DischargeState::Disengaged;
        }

        DischargeOutcome::Discharged(DischargeTick {
            removed,
            demand,
            feasibility,
            delivered,
            withdrawn,
            finished,
        })
    }
}
