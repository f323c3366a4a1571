use thiserror::Error;

/// Errors raised while building or loading a wheel configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid nominal torque on {axis}: {value} (must be finite and >= 0)")]
    InvalidTorque { axis: &'static str, value: f64 },

    #[error("Invalid saturation scale: {0} (must be finite and >= 0)")]
    InvalidSaturationScale(f64),

    #[error("Invalid {curve} curve: {source}")]
    InvalidCurve {
        curve: &'static str,
        #[source]
        source: CurveParseError,
    },

    #[error("Invalid log interval: {0} (must be > 0)")]
    InvalidLogInterval(f64),
}

/// Errors from the keyframe text format accepted by `Curve::from_str`.
#[derive(Debug, Error, PartialEq)]
pub enum CurveParseError {
    #[error("line {line}: expected 2 or 4 numbers, found {found}")]
    FieldCount { line: usize, found: usize },

    #[error("line {line}: '{token}' is not a number")]
    NotANumber { line: usize, token: String },

    #[error("line {line}: non-finite value")]
    NonFinite { line: usize },
}

/// Reasons a discharge specification cannot produce resource consumers.
#[derive(Debug, Error, PartialEq)]
pub enum DischargeSpecError {
    #[error("specific impulse must be > 0, got {0}")]
    InvalidIsp(f64),

    #[error("lever arm must be > 0, got {0}")]
    InvalidLeverArm(f64),

    #[error("discharge rate must be > 0, got {0}")]
    InvalidRate(f64),

    #[error("no propellants listed")]
    NoPropellants,

    #[error("propellant '{0}' has a non-positive density")]
    InvalidDensity(String),

    #[error("propellant ratios must sum to a positive value")]
    InvalidRatios,

    #[error("resource list has no usable entries")]
    EmptyResourceList,

    #[error("no consumer has a positive rate")]
    NoPositiveRate,
}

/// Errors from saving or restoring persisted wheel state.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot holds a non-finite momentum on axis {0}")]
    NonFinite(usize),
}
