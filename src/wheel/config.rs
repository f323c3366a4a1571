use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::discharge::DischargeConfig;
use crate::error::ConfigError;
use super::curve::{Curve, ResponseCurves};
use super::frame::{AxisValues, ControlAxis, ReferenceFrame};
use super::store::ClampPolicy;

// ---------------------------------------------------------------------------
// Wheel configuration
// ---------------------------------------------------------------------------

/// Everything a wheel is built from. One value per wheel; nothing is shared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WheelConfig {
    pub name: String,
    pub nominal_torque: AxisValues,       // N·m per control axis
    #[serde(default = "default_scale")]
    pub saturation_scale: f64,            // s; capacity = mean torque * scale
    #[serde(default)]
    pub curves: ResponseCurves,
    #[serde(default)]
    pub clamp: ClampPolicy,
    #[serde(default)]
    pub frame: ReferenceFrame,
    #[serde(default)]
    pub discharge: Option<DischargeConfig>,
    /// When false the wheel starts disabled inside an atmosphere.
    #[serde(default = "default_true")]
    pub default_active: bool,
    /// Seconds between telemetry dumps at debug level; `None` disables them.
    #[serde(default)]
    pub log_interval: Option<f64>,
}

fn default_scale() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

impl WheelConfig {
    /// Momentum magnitude treated as 100% saturated on every reference axis.
    pub fn saturation_limit(&self) -> f64 {
        self.nominal_torque.mean() * self.saturation_scale
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for axis in ControlAxis::ALL {
            let value = self.nominal_torque.get(axis);
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidTorque { axis: axis.name(), value });
            }
        }
        if !self.saturation_scale.is_finite() || self.saturation_scale < 0.0 {
            return Err(ConfigError::InvalidSaturationScale(self.saturation_scale));
        }
        if let Some(interval) = self.log_interval {
            if !(interval > 0.0) {
                return Err(ConfigError::InvalidLogInterval(interval));
            }
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: WheelConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

pub struct WheelConfigBuilder {
    config: WheelConfig,
}

impl WheelConfigBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            config: WheelConfig {
                name: name.into(),
                nominal_torque: AxisValues::splat(5.0),
                saturation_scale: 1.0,
                curves: ResponseCurves::default(),
                clamp: ClampPolicy::Unbounded,
                frame: ReferenceFrame::default(),
                discharge: None,
                default_active: true,
                log_interval: None,
            },
        }
    }

    pub fn torque(mut self, pitch: f64, yaw: f64, roll: f64) -> Self {
        self.config.nominal_torque = AxisValues::new(pitch, yaw, roll);
        self
    }
    pub fn saturation_scale(mut self, v: f64) -> Self { self.config.saturation_scale = v; self }
    pub fn torque_curve(mut self, c: Curve) -> Self { self.config.curves.torque = c; self }
    pub fn bleed_curve(mut self, c: Curve) -> Self { self.config.curves.bleed = c; self }
    pub fn clamp(mut self, p: ClampPolicy) -> Self { self.config.clamp = p; self }
    pub fn frame(mut self, f: ReferenceFrame) -> Self { self.config.frame = f; self }
    pub fn discharge(mut self, d: DischargeConfig) -> Self { self.config.discharge = Some(d); self }
    pub fn default_active(mut self, v: bool) -> Self { self.config.default_active = v; self }
    pub fn log_interval(mut self, secs: f64) -> Self { self.config.log_interval = Some(secs); self }

    /// Both curves from the keyframe text format.
    pub fn curves_from_text(mut self, torque: &str, bleed: &str) -> Result<Self, ConfigError> {
        self.config.curves.torque = torque
            .parse()
            .map_err(|source| ConfigError::InvalidCurve { curve: "torque", source })?;
        self.config.curves.bleed = bleed
            .parse()
            .map_err(|source| ConfigError::InvalidCurve { curve: "bleed", source })?;
        Ok(self)
    }

    pub fn build(self) -> Result<WheelConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

// ---------------------------------------------------------------------------
// Preset wheels
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;
    use crate::discharge::{
        DischargeSource, DischargeThrusterSpec, FlowMode, Propellant,
    };

    /// Torque falls off slowly to half saturation, then steeply.
    pub fn standard_torque_curve() -> Curve {
        Curve::linear(&[(0.0, 1.0), (0.5, 0.9), (0.8, 0.5), (1.0, 0.05)])
    }

    /// Bleed grows with saturation.
    pub fn standard_bleed_curve() -> Curve {
        Curve::linear(&[(0.0, 0.005), (0.5, 0.01), (1.0, 0.04)])
    }

    /// Small probe core wheel, passive bleed only.
    pub fn probe_core() -> WheelConfig {
        WheelConfig {
            name: "Probe Core Wheel".into(),
            nominal_torque: AxisValues::splat(0.5),
            saturation_scale: 2.0,
            curves: ResponseCurves::new(standard_torque_curve(), Curve::constant(0.02)),
            clamp: ClampPolicy::Unbounded,
            frame: ReferenceFrame::default(),
            discharge: None,
            default_active: true,
            log_interval: None,
        }
    }

    /// Crew pod wheel dumping momentum with monopropellant.
    pub fn command_pod() -> WheelConfig {
        WheelConfig {
            name: "Command Pod Wheel".into(),
            nominal_torque: AxisValues::splat(5.0),
            saturation_scale: 1.5,
            curves: ResponseCurves::new(standard_torque_curve(), standard_bleed_curve()),
            clamp: ClampPolicy::Unbounded,
            frame: ReferenceFrame::default(),
            discharge: Some(DischargeConfig::new(
                0.1,
                DischargeSource::ResourceList("MonoPropellant,0.2".into()),
            )),
            default_active: true,
            log_interval: None,
        }
    }

    /// Large inline wheel with a bipropellant dump thruster pair.
    pub fn inline_large() -> WheelConfig {
        WheelConfig {
            name: "Large Inline Wheel".into(),
            nominal_torque: AxisValues::new(30.0, 30.0, 20.0),
            saturation_scale: 2.0,
            curves: ResponseCurves::new(standard_torque_curve(), standard_bleed_curve()),
            clamp: ClampPolicy::Unbounded,
            frame: ReferenceFrame::default(),
            discharge: Some(DischargeConfig::new(
                0.05,
                DischargeSource::Thruster(DischargeThrusterSpec {
                    isp: 240.0,
                    lever_arm: 1.25,
                    propellants: vec![
                        Propellant {
                            name: "LiquidFuel".into(),
                            ratio: 0.9,
                            density: 5.0,
                            flow_mode: FlowMode::StackPriority,
                        },
                        Propellant {
                            name: "Oxidizer".into(),
                            ratio: 1.1,
                            density: 5.0,
                            flow_mode: FlowMode::StackPriority,
                        },
                    ],
                }),
            )),
            default_active: false,
            log_interval: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_is_mean_torque_times_scale() {
        let cfg = WheelConfigBuilder::new("W")
            .torque(3.0, 6.0, 9.0)
            .saturation_scale(2.0)
            .build()
            .unwrap();
        assert_eq!(cfg.saturation_limit(), 12.0);
    }

    #[test]
    fn negative_torque_rejected() {
        let err = WheelConfigBuilder::new("W").torque(1.0, -1.0, 1.0).build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTorque { axis: "yaw", .. }));
    }

    #[test]
    fn bad_curve_text_names_curve() {
        let err = WheelConfigBuilder::new("W").curves_from_text("0 1\n1 0", "0 x").err().unwrap();
        assert!(matches!(err, ConfigError::InvalidCurve { curve: "bleed", .. }));
    }

    #[test]
    fn loads_minimal_json() {
        let cfg = WheelConfig::from_json_str(
            r#"{
                "name": "Json Wheel",
                "nominal_torque": { "pitch": 2.0, "yaw": 2.0, "roll": 2.0 },
                "curves": { "torque": [ { "time": 0.0, "value": 1.0 }, { "time": 1.0, "value": 0.0 } ] }
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.saturation_scale, 1.0);
        assert!(cfg.default_active);
        assert!(cfg.curves.bleed.is_empty());
        assert_eq!(cfg.saturation_limit(), 2.0);
    }

    #[test]
    fn presets_validate() {
        for cfg in [presets::probe_core(), presets::command_pod(), presets::inline_large()] {
            cfg.validate().unwrap();
        }
    }
}
