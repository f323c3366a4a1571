pub mod rotation;
pub mod state;

pub use rotation::derivatives;
pub use state::{AttitudeState, Deriv, SimConfig, G0};
