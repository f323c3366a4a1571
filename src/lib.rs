//! Saturating reaction-wheel momentum model.
//!
//! A wheel stores the momentum it hands to the craft on three fixed reference
//! axes. Stored momentum throttles available torque through a response curve,
//! bleeds off passively, and can be dumped actively by drawing resources.
//! The [`sim`] layer wraps wheels in a rigid-body attitude loop.

pub mod discharge;
pub mod dynamics;
pub mod error;
pub mod gnc;
pub mod io;
pub mod sim;
pub mod vehicle;
pub mod wheel;

pub use error::{ConfigError, CurveParseError, DischargeSpecError, SnapshotError};
pub use wheel::{ReactionWheel, StepInput, StepOutput, WheelConfig};
