pub mod csv;
pub mod json;

pub use csv::{write_telemetry, write_telemetry_file};
pub use json::{load_snapshot, save_snapshot, write_summary, write_summary_file, ClusterSnapshot, RunSummary};
