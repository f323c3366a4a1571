use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Resource identifiers and flow scope
// ---------------------------------------------------------------------------

/// Name of a consumable resource (e.g. "MonoPropellant").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Which connected supply a resource may be drawn from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowMode {
    /// Only tanks local to the wheel's own part.
    NoFlow,
    /// Any tank on the vessel.
    #[default]
    AllVessel,
    /// Local tanks first, then the rest of the vessel.
    StackPriority,
}

/// One resource drawn while discharging.
///
/// `rate` is resource units per second at the full nominal discharge rate;
/// actual draw scales with demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceConsumer {
    pub resource: ResourceId,
    pub rate: f64,
    #[serde(default)]
    pub flow_mode: FlowMode,
}

impl ResourceConsumer {
    pub fn new(resource: impl Into<ResourceId>, rate: f64, flow_mode: FlowMode) -> Self {
        Self { resource: resource.into(), rate, flow_mode }
    }
}

// ---------------------------------------------------------------------------
// Supply collaborator
// ---------------------------------------------------------------------------

/// Query/withdraw access to the host's resource pool.
///
/// Implement this to connect the discharge coordinator to whatever holds
/// the propellant. A tick always queries every resource before withdrawing any.
pub trait ResourceSupply {
    /// Quantity currently reachable under `flow`.
    fn available(&self, resource: &ResourceId, flow: FlowMode) -> f64;

    /// Remove up to `amount`; returns what was actually removed.
    fn withdraw(&mut self, resource: &ResourceId, flow: FlowMode, amount: f64) -> f64;
}

// ---------------------------------------------------------------------------
// In-memory pool
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tank {
    pub resource: ResourceId,
    pub amount: f64,
    /// Local to the wheel's part (reachable under `NoFlow`).
    pub local: bool,
}

/// Tank list implementing [`ResourceSupply`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourcePool {
    tanks: Vec<Tank>,
}

impl ResourcePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tank(mut self, resource: impl Into<ResourceId>, amount: f64, local: bool) -> Self {
        self.add_tank(resource, amount, local);
        self
    }

    pub fn add_tank(&mut self, resource: impl Into<ResourceId>, amount: f64, local: bool) {
        self.tanks.push(Tank { resource: resource.into(), amount: amount.max(0.0), local });
    }

    pub fn tanks(&self) -> &[Tank] {
        &self.tanks
    }

    /// Everything held of `resource`, regardless of flow scope.
    pub fn total(&self, resource: &ResourceId) -> f64 {
        self.tanks.iter().filter(|t| &t.resource == resource).map(|t| t.amount).sum()
    }

    fn draw_order(&self, resource: &ResourceId, flow: FlowMode) -> Vec<usize> {
        let matching = |local: Option<bool>| {
            self.tanks
                .iter()
                .enumerate()
                .filter(move |(_, t)| &t.resource == resource && local.map_or(true, |l| t.local == l))
                .map(|(i, _)| i)
        };
        match flow {
            FlowMode::NoFlow => matching(Some(true)).collect(),
            FlowMode::AllVessel => matching(None).collect(),
            FlowMode::StackPriority => matching(Some(true)).chain(matching(Some(false))).collect(),
        }
    }
}

impl ResourceSupply for ResourcePool {
    fn available(&self, resource: &ResourceId, flow: FlowMode) -> f64 {
        self.draw_order(resource, flow).into_iter().map(|i| self.tanks[i].amount).sum()
    }

    fn withdraw(&mut self, resource: &ResourceId, flow: FlowMode, amount: f64) -> f64 {
        if !(amount > 0.0) || !amount.is_finite() {
            return 0.0;
        }
        let mut remaining = amount;
        for i in self.draw_order(resource, flow) {
            let tank = &mut self.tanks[i];
            let take = remaining.min(tank.amount);
            tank.amount -= take;
            remaining -= take;
            if remaining <= 0.0 {
                break;
            }
        }
        amount - remaining
    }
}
