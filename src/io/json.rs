use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;
use crate::sim::Sample;
use crate::wheel::{MomentumSnapshot, WheelCluster};

// ---------------------------------------------------------------------------
// Run summary
// ---------------------------------------------------------------------------

/// Summary statistics computed from a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub craft: String,
    pub duration_s: f64,
    pub max_saturation: f64,
    pub max_saturation_time_s: f64,
    pub max_rate_rad_s: f64,
    pub discharge_time_s: f64,
    pub resources_used: f64,
    pub final_momentum: Vec<[f64; 3]>,
}

impl RunSummary {
    /// Compute summary from samples. Returns `None` for an empty run.
    pub fn from_samples(craft: &str, samples: &[Sample]) -> Option<Self> {
        let first = samples.first()?;
        let last = samples.last()?;

        let peak = samples
            .iter()
            .max_by(|a, b| a.max_saturation().total_cmp(&b.max_saturation()))?;

        let max_rate = samples
            .iter()
            .map(|s| s.state.omega.norm())
            .fold(0.0_f64, f64::max);

        let discharge_time = samples
            .windows(2)
            .filter(|w| w[1].discharging())
            .map(|w| w[1].state.time - w[0].state.time)
            .sum();

        Some(RunSummary {
            craft: craft.to_string(),
            duration_s: last.state.time - first.state.time,
            max_saturation: peak.max_saturation(),
            max_saturation_time_s: peak.state.time,
            max_rate_rad_s: max_rate,
            discharge_time_s: discharge_time,
            resources_used: first.resources - last.resources,
            final_momentum: last.wheels.iter().map(|t| [t.momentum.x, t.momentum.y, t.momentum.z]).collect(),
        })
    }
}

/// Write run summary as pretty JSON to a writer.
pub fn write_summary<W: Write>(writer: &mut W, summary: &RunSummary) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, summary)?;
    writeln!(writer)?;
    Ok(())
}

/// Write run summary JSON to a file.
pub fn write_summary_file(path: impl AsRef<Path>, summary: &RunSummary) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, summary)
}

// ---------------------------------------------------------------------------
// Persisted wheel state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WheelRecord {
    pub name: String,
    #[serde(flatten)]
    pub snapshot: MomentumSnapshot,
}

/// Persisted momenta of every wheel in a cluster, in wheel order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSnapshot {
    pub wheels: Vec<WheelRecord>,
}

impl ClusterSnapshot {
    pub fn capture(cluster: &WheelCluster) -> Self {
        Self {
            wheels: cluster
                .wheels()
                .iter()
                .map(|w| WheelRecord { name: w.name().to_string(), snapshot: w.snapshot() })
                .collect(),
        }
    }

    /// Restore by position. Extra records or extra wheels are left alone.
    pub fn restore(&self, cluster: &mut WheelCluster) -> Result<(), SnapshotError> {
        for (wheel, record) in cluster.wheels_mut().iter_mut().zip(&self.wheels) {
            wheel.restore(&record.snapshot)?;
        }
        Ok(())
    }
}

pub fn save_snapshot(path: impl AsRef<Path>, cluster: &WheelCluster) -> Result<(), SnapshotError> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, &ClusterSnapshot::capture(cluster))?;
    Ok(())
}

pub fn load_snapshot(path: impl AsRef<Path>) -> Result<ClusterSnapshot, SnapshotError> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::state::AttitudeState;
    use crate::wheel::{presets, AxisValues, ReactionWheel};
    use nalgebra::{UnitQuaternion, Vector3};

    fn sample(time: f64, omega: f64, resources: f64) -> Sample {
        let mut state = AttitudeState::at_rest(UnitQuaternion::identity());
        state.time = time;
        state.omega = Vector3::new(omega, 0.0, 0.0);
        Sample {
            state,
            command: AxisValues::default(),
            wheel_torque: Vector3::zeros(),
            wheels: vec![],
            resources,
        }
    }

    #[test]
    fn summary_tracks_rate_and_resources() {
        let samples = vec![sample(0.0, 0.0, 10.0), sample(1.0, 0.3, 9.0), sample(2.0, 0.1, 8.5)];
        let s = RunSummary::from_samples("T", &samples).unwrap();
        assert!((s.max_rate_rad_s - 0.3).abs() < 1e-12);
        assert!((s.resources_used - 1.5).abs() < 1e-12);
        assert!((s.duration_s - 2.0).abs() < 1e-12);
        assert!(RunSummary::from_samples("T", &[]).is_none());
    }

    #[test]
    fn json_output_is_valid() {
        let samples = vec![sample(0.0, 0.0, 1.0), sample(1.0, 0.2, 1.0)];
        let summary = RunSummary::from_samples("Test", &samples).unwrap();
        let mut buf = Vec::new();
        write_summary(&mut buf, &summary).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["craft"], "Test");
        assert!(value["max_rate_rad_s"].is_number());
    }

    #[test]
    fn snapshot_file_round_trip() {
        let mut cluster = WheelCluster::new("C")
            .with_wheel(ReactionWheel::initialize(presets::probe_core(), 0.0).unwrap());
        cluster.wheels_mut()[0]
            .restore(&MomentumSnapshot { x_moment: 0.4, y_moment: -0.1, z_moment: 0.0, decay_enabled: false })
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wheels.json");
        save_snapshot(&path, &cluster).unwrap();

        let loaded = load_snapshot(&path).unwrap();
        assert_eq!(loaded, ClusterSnapshot::capture(&cluster));
        assert_eq!(loaded.wheels[0].name, "Probe Core Wheel");
    }
}
