pub mod config;
pub mod coordinator;
pub mod resource;
pub mod thruster;

pub use config::{DischargeConfig, DischargeSource};
pub use coordinator::{DischargeOutcome, DischargeState, DischargeTick, ResourceDischargeCoordinator};
pub use resource::{FlowMode, ResourceConsumer, ResourceId, ResourcePool, ResourceSupply};
pub use thruster::{parse_resource_list, DischargeThrusterSpec, Propellant};
