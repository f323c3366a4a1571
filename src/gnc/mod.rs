pub mod controller;
pub mod guidance;
pub mod hold;
pub mod pid;

pub use controller::{ConstantCommand, Controller};
pub use guidance::SlewSchedule;
pub use hold::AttitudeHold;
pub use pid::Pid;
