use serde::{Deserialize, Serialize};

use crate::error::DischargeSpecError;
use super::resource::ResourceConsumer;
use super::thruster::{parse_resource_list, DischargeThrusterSpec};

pub const DEFAULT_MIN_DEMAND: f64 = 1.0e-6;
pub const DEFAULT_MIN_FEASIBILITY: f64 = 0.01;

/// Where the discharge resource list comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DischargeSource {
    /// Derive consumption from a thruster's isp and propellant mix.
    Thruster(DischargeThrusterSpec),
    /// `Name,rate;Name,rate` with rates in units/s.
    ResourceList(String),
    Consumers(Vec<ResourceConsumer>),
}

/// Active momentum discharge settings for one wheel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DischargeConfig {
    /// Fraction of the saturation limit removable per second.
    pub rate: f64,
    pub source: DischargeSource,
    /// Demand below this (fraction of the nominal per-tick removal) ends discharge.
    #[serde(default = "default_min_demand")]
    pub min_demand: f64,
    /// Resource feasibility below this aborts the tick and ends discharge.
    #[serde(default = "default_min_feasibility")]
    pub min_feasibility: f64,
}

fn default_min_demand() -> f64 {
    DEFAULT_MIN_DEMAND
}

fn default_min_feasibility() -> f64 {
    DEFAULT_MIN_FEASIBILITY
}

impl DischargeConfig {
    pub fn new(rate: f64, source: DischargeSource) -> Self {
        Self {
            rate,
            source,
            min_demand: DEFAULT_MIN_DEMAND,
            min_feasibility: DEFAULT_MIN_FEASIBILITY,
        }
    }

    /// Momentum removable per second for a wheel with this limit.
    pub fn max_removal_rate(&self, saturation_limit: f64) -> f64 {
        self.rate * saturation_limit
    }

    /// Resolve the consumer list for a wheel with the given saturation limit.
    pub fn resolve(&self, saturation_limit: f64) -> Result<Vec<ResourceConsumer>, DischargeSpecError> {
        if !(self.rate > 0.0) || !self.rate.is_finite() {
            return Err(DischargeSpecError::InvalidRate(self.rate));
        }
        let consumers = match &self.source {
            DischargeSource::Thruster(spec) => {
                spec.consumers(self.max_removal_rate(saturation_limit))?
            }
            DischargeSource::ResourceList(list) => parse_resource_list(list)?,
            DischargeSource::Consumers(list) => list.clone(),
        };
        if !consumers.iter().any(|c| c.rate > 0.0) {
            return Err(DischargeSpecError::NoPositiveRate);
        }
        Ok(consumers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discharge::resource::FlowMode;

    #[test]
    fn resolves_resource_list() {
        let cfg = DischargeConfig::new(0.1, DischargeSource::ResourceList("MonoPropellant,0.4".into()));
        let consumers = cfg.resolve(100.0).unwrap();
        assert_eq!(consumers[0].rate, 0.4);
    }

    #[test]
    fn all_zero_rates_disable_discharge() {
        let cfg = DischargeConfig::new(
            0.1,
            DischargeSource::Consumers(vec![ResourceConsumer::new("Xenon", 0.0, FlowMode::NoFlow)]),
        );
        assert_eq!(cfg.resolve(10.0), Err(DischargeSpecError::NoPositiveRate));
    }

    #[test]
    fn zero_rate_is_rejected() {
        let cfg = DischargeConfig::new(0.0, DischargeSource::ResourceList("Xenon,1".into()));
        assert_eq!(cfg.resolve(10.0), Err(DischargeSpecError::InvalidRate(0.0)));
    }

    #[test]
    fn thresholds_default_when_missing() {
        let cfg: DischargeConfig =
            serde_json::from_str(r#"{"rate":0.2,"source":{"resource_list":"MonoPropellant,1"}}"#).unwrap();
        assert_eq!(cfg.min_demand, DEFAULT_MIN_DEMAND);
        assert_eq!(cfg.min_feasibility, DEFAULT_MIN_FEASIBILITY);
    }
}
