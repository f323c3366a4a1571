pub mod bleed;
pub mod cluster;
pub mod config;
pub mod curve;
pub mod frame;
pub mod integrator;
pub mod limiter;
pub mod reaction_wheel;
pub mod store;

pub use cluster::{ClusterOutput, WheelCluster};
pub use config::{presets, WheelConfig, WheelConfigBuilder};
pub use curve::{Curve, Keyframe, ResponseCurves};
pub use frame::{AxisValues, BodyAxes, ControlAxis, ReferenceFrame};
pub use reaction_wheel::{ReactionWheel, StepInput, StepOutput, Telemetry, WheelState};
pub use store::{ClampPolicy, MomentumSnapshot, MomentumStore};
