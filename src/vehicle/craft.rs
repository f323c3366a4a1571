use nalgebra::Vector3;

use crate::discharge::{ResourceId, ResourcePool};
use crate::error::ConfigError;
use crate::wheel::{ReactionWheel, WheelCluster, WheelConfig};

// ---------------------------------------------------------------------------
// Craft: rigid body carrying wheels and tanks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Craft {
    pub name: String,
    pub inertia: Vector3<f64>,          // [Ixx, Iyy, Izz] principal moments, kg·m^2
    pub wheels: Vec<WheelConfig>,
    /// (resource, amount, local to the wheel part)
    pub tanks: Vec<(ResourceId, f64, bool)>,
    pub atmospheric_density: f64,       // kg/m^3 at start
}

impl Craft {
    /// Instantiate every wheel and group them.
    pub fn build_cluster(&self) -> Result<WheelCluster, ConfigError> {
        let mut cluster = WheelCluster::new(self.name.clone());
        for config in &self.wheels {
            cluster.add_wheel(ReactionWheel::initialize(config.clone(), self.atmospheric_density)?);
        }
        Ok(cluster)
    }

    pub fn resource_pool(&self) -> ResourcePool {
        let mut pool = ResourcePool::new();
        for (resource, amount, local) in &self.tanks {
            pool.add_tank(resource.clone(), *amount, *local);
        }
        pool
    }

    /// Sum of wheel capacities, N·m·s.
    pub fn total_capacity(&self) -> f64 {
        self.wheels.iter().map(WheelConfig::saturation_limit).sum()
    }
}

// ---------------------------------------------------------------------------
// Craft builder
// ---------------------------------------------------------------------------

pub struct CraftBuilder {
    name: String,
    inertia: Vector3<f64>,
    wheels: Vec<WheelConfig>,
    tanks: Vec<(ResourceId, f64, bool)>,
    atmospheric_density: f64,
}

impl CraftBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inertia: Vector3::new(10.0, 10.0, 4.0),
            wheels: vec![],
            tanks: vec![],
            atmospheric_density: 0.0,
        }
    }

    pub fn inertia(mut self, v: Vector3<f64>) -> Self { self.inertia = v; self }
    pub fn wheel(mut self, w: WheelConfig) -> Self { self.wheels.push(w); self }
    pub fn atmospheric_density(mut self, v: f64) -> Self { self.atmospheric_density = v; self }

    pub fn tank(mut self, resource: impl Into<ResourceId>, amount: f64, local: bool) -> Self {
        self.tanks.push((resource.into(), amount, local));
        self
    }

    pub fn build(self) -> Craft {
        Craft {
            name: self.name,
            inertia: self.inertia,
            wheels: self.wheels,
            tanks: self.tanks,
            atmospheric_density: self.atmospheric_density,
        }
    }
}

// ---------------------------------------------------------------------------
// Preset craft
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;
    use crate::wheel::presets as wheels;

    /// Small crewed pod with one monopropellant-dumping wheel.
    pub fn pod() -> Craft {
        CraftBuilder::new("Pod")
            .inertia(Vector3::new(12.0, 12.0, 6.0))
            .wheel(wheels::command_pod())
            .tank("MonoPropellant", 30.0, false)
            .build()
    }

    /// Probe on a bipropellant stage: probe wheel plus a large inline wheel.
    pub fn probe_stack() -> Craft {
        CraftBuilder::new("Probe Stack")
            .inertia(Vector3::new(80.0, 80.0, 25.0))
            .wheel(wheels::probe_core())
            .wheel(wheels::inline_large())
            .tank("LiquidFuel", 180.0, true)
            .tank("Oxidizer", 220.0, true)
            .tank("LiquidFuel", 360.0, false)
            .tank("Oxidizer", 440.0, false)
            .build()
    }
}
