use std::io::Write;

use nalgebra::UnitQuaternion;

use saturable_wheel::discharge::ResourcePool;
use saturable_wheel::io::{load_snapshot, save_snapshot};
use saturable_wheel::wheel::{
    presets, AxisValues, BodyAxes, MomentumSnapshot, ReactionWheel, StepInput, WheelCluster,
    WheelConfig,
};
use saturable_wheel::ConfigError;

fn input(i: usize) -> StepInput {
    let t = i as f64;
    StepInput {
        body: BodyAxes::from_attitude(&UnitQuaternion::from_euler_angles(0.02 * t, 0.5, -0.01 * t)),
        command: AxisValues::new((0.1 * t).sin(), 0.7, -(0.05 * t).cos()),
    }
}

#[test]
fn restored_wheel_reproduces_torque_output() {
    let config = presets::command_pod();
    let mut original = ReactionWheel::initialize(config.clone(), 0.0).unwrap();
    let mut pool = ResourcePool::new();
    for i in 0..40 {
        original.step(0.02, &input(i), &mut pool);
    }

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wheel.json");
    std::fs::write(&path, serde_json::to_string(&original.snapshot()).unwrap()).unwrap();
    let loaded: MomentumSnapshot =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

    let mut restored = ReactionWheel::initialize(config, 0.0).unwrap();
    restored.restore(&loaded).unwrap();
    assert_eq!(restored.store().momentum(), original.store().momentum());

    for i in 40..120 {
        let a = original.step(0.02, &input(i), &mut pool);
        let b = restored.step(0.02, &input(i), &mut pool);
        assert_eq!(a.available_torque, b.available_torque, "tick {}", i);
        assert_eq!(a.control_torque, b.control_torque, "tick {}", i);
    }
}

#[test]
fn decay_toggle_survives_persistence() {
    let mut wheel = ReactionWheel::initialize(presets::probe_core(), 0.0).unwrap();
    wheel.set_decay_enabled(false);
    let json = serde_json::to_string(&wheel.snapshot()).unwrap();
    let snap: MomentumSnapshot = serde_json::from_str(&json).unwrap();
    assert!(!snap.decay_enabled);
}

#[test]
fn cluster_snapshot_file_restores_every_wheel() {
    let mut cluster = WheelCluster::new("Stack")
        .with_wheel(ReactionWheel::initialize(presets::probe_core(), 0.0).unwrap())
        .with_wheel(ReactionWheel::initialize(presets::inline_large(), 0.0).unwrap());
    let mut pool = ResourcePool::new();
    for i in 0..30 {
        cluster.step(0.05, &input(i), &mut pool);
    }

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cluster.json");
    save_snapshot(&path, &cluster).unwrap();

    let mut fresh = WheelCluster::new("Stack")
        .with_wheel(ReactionWheel::initialize(presets::probe_core(), 0.0).unwrap())
        .with_wheel(ReactionWheel::initialize(presets::inline_large(), 0.0).unwrap());
    load_snapshot(&path).unwrap().restore(&mut fresh).unwrap();

    for (a, b) in cluster.wheels().iter().zip(fresh.wheels()) {
        assert_eq!(a.snapshot(), b.snapshot());
    }
}

#[test]
fn corrupt_snapshot_is_reported() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{\"wheels\": [{{\"name\": \"W\", \"x_moment\": \"lots\"}}]}}").unwrap();
    assert!(load_snapshot(file.path()).is_err());
}

#[test]
fn wheel_config_loads_from_json_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let json = serde_json::to_string_pretty(&presets::inline_large()).unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let loaded = WheelConfig::from_json_file(file.path()).unwrap();
    assert_eq!(loaded, presets::inline_large());

    let wheel = ReactionWheel::initialize(loaded, 0.0).unwrap();
    assert!(wheel.can_force_discharge());
}

#[test]
fn invalid_json_config_is_rejected() {
    let err = WheelConfig::from_json_str(r#"{"name": "W", "nominal_torque": {"pitch": -1.0, "yaw": 1.0, "roll": 1.0}}"#)
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidTorque { axis: "pitch", .. }));
    assert!(matches!(WheelConfig::from_json_str("{"), Err(ConfigError::Json(_))));
}
