use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::dynamics::state::G0;
use crate::error::DischargeSpecError;
use super::resource::{FlowMode, ResourceConsumer, ResourceId};

// ---------------------------------------------------------------------------
// Discharge thruster: momentum-removal rate → propellant draw
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Propellant {
    pub name: ResourceId,
    /// Share of the mass flow (normalised against the other propellants).
    pub ratio: f64,
    /// Mass per resource unit, kg.
    pub density: f64,
    #[serde(default)]
    pub flow_mode: FlowMode,
}

/// Small thruster pair used to dump wheel momentum.
///
/// Removing momentum at `R` N·m·s/s takes a thrust of `R / lever_arm`, which
/// burns `thrust / (isp * g0)` kg/s split across the propellants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DischargeThrusterSpec {
    pub isp: f64,          // s
    pub lever_arm: f64,    // m
    pub propellants: Vec<Propellant>,
}

impl DischargeThrusterSpec {
    /// Propellant mass flow needed to remove momentum at `removal_rate`.
    pub fn mass_flow(&self, removal_rate: f64) -> f64 {
        (removal_rate / self.lever_arm) / (self.isp * G0)
    }

    /// Per-resource consumption at `removal_rate`, in units/s.
    pub fn consumers(&self, removal_rate: f64) -> Result<Vec<ResourceConsumer>, DischargeSpecError> {
        if !(self.isp > 0.0) || !self.isp.is_finite() {
            return Err(DischargeSpecError::InvalidIsp(self.isp));
        }
        if !(self.lever_arm > 0.0) || !self.lever_arm.is_finite() {
            return Err(DischargeSpecError::InvalidLeverArm(self.lever_arm));
        }
        if self.propellants.is_empty() {
            return Err(DischargeSpecError::NoPropellants);
        }
        if let Some(p) = self.propellants.iter().find(|p| !(p.density > 0.0)) {
            return Err(DischargeSpecError::InvalidDensity(p.name.to_string()));
        }
        let ratio_sum: f64 = self.propellants.iter().map(|p| p.ratio.max(0.0)).sum();
        if !(ratio_sum > 0.0) || !ratio_sum.is_finite() {
            return Err(DischargeSpecError::InvalidRatios);
        }

        let mdot = self.mass_flow(removal_rate);
        Ok(self
            .propellants
            .iter()
            .map(|p| {
                let share = p.ratio.max(0.0) / ratio_sum;
                ResourceConsumer::new(p.name.clone(), mdot * share / p.density, p.flow_mode)
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// "Name,rate;Name,rate" resource lists
// ---------------------------------------------------------------------------

/// Parse a `Name,rate;Name,rate` list. Malformed pairs are skipped.
///
/// Rates are units/s at the full discharge rate and draw vessel-wide.
pub fn parse_resource_list(list: &str) -> Result<Vec<ResourceConsumer>, DischargeSpecError> {
    let mut consumers = Vec::new();
    for pair in list.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let fields: Vec<&str> = pair.split(',').map(str::trim).collect();
        match fields.as_slice() {
            [name, rate] if !name.is_empty() => match rate.parse::<f64>() {
                Ok(rate) if rate.is_finite() => {
                    consumers.push(ResourceConsumer::new(*name, rate, FlowMode::AllVessel));
                }
                _ => warn!(pair, "skipping resource entry with unreadable rate"),
            },
            _ => warn!(pair, "skipping malformed resource entry"),
        }
    }
    if consumers.is_empty() {
        return Err(DischargeSpecError::EmptyResourceList);
    }
    Ok(consumers)
}
