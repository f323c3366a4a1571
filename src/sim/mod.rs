pub mod event;
pub mod integrator;
pub mod runner;
pub mod scenarios;

pub use event::{detect_events, DischargeDetector, EventDetector, EventKind, SaturationDetector, SimEvent};
pub use integrator::rk4_step;
pub use runner::{simulate, simulate_with, Run, Sample, Scenario};
