use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use saturable_wheel::gnc::AttitudeHold;
use saturable_wheel::io::{self, RunSummary};
use saturable_wheel::sim::{self, scenarios, DischargeDetector, EventKind, SaturationDetector};

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Reaction wheel saturation and momentum discharge simulator.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Scenario to run.
    #[arg(value_enum, default_value_t = Which::Slew)]
    scenario: Which,

    /// Write per-sample telemetry as CSV.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the run summary as JSON.
    #[arg(long)]
    json: Option<PathBuf>,

    /// Save the final wheel state.
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Which {
    /// Pitch slew under disturbance, then a momentum dump.
    Slew,
    /// Null an initial tumble.
    Detumble,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let demo = match cli.scenario {
        Which::Slew => scenarios::slew_and_dump(),
        Which::Detumble => scenarios::detumble(),
    };

    // -----------------------------------------------------------------------
    // Run simulation
    // -----------------------------------------------------------------------
    let mut controller = AttitudeHold::new(demo.schedule.clone());
    let run = sim::simulate_with(&demo.scenario, &demo.config, &mut controller)?;
    let craft = &demo.scenario.craft;

    let mut saturation = SaturationDetector::new(0.9);
    let mut discharge = DischargeDetector;
    let events = sim::detect_events(&run.samples, &mut [&mut saturation, &mut discharge]);

    let summary = RunSummary::from_samples(&craft.name, &run.samples)
        .ok_or("simulation produced no samples")?;

    // -----------------------------------------------------------------------
    // Print results
    // -----------------------------------------------------------------------
    println!();
    println!("====================================================================");
    println!("  REACTION WHEEL SIMULATION: {}", craft.name);
    println!("====================================================================");
    println!();
    println!("  Craft");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Inertia:       {:>6.1} {:>6.1} {:>6.1} kg·m^2",
        craft.inertia.x, craft.inertia.y, craft.inertia.z
    );
    println!("  Capacity:      {:>8.2} N·m·s total", craft.total_capacity());
    println!();

    for wheel in run.cluster.wheels() {
        println!("  {}", wheel.name());
        println!("  ──────────────────────────────────────────────────────────────────");
        for line in wheel.info().lines() {
            println!("    {line}");
        }
        println!();
    }

    println!("  Events");
    println!("  ──────────────────────────────────────────────────────────────────");
    if events.is_empty() {
        println!("  (none)");
    }
    for ev in &events {
        let label = match &ev.kind {
            EventKind::SaturationReached { wheel } => format!("SATURATED       wheel {wheel}"),
            EventKind::DischargeStarted { wheel } => format!("DISCHARGE ON    wheel {wheel}"),
            EventKind::DischargeFinished { wheel } => format!("DISCHARGE OFF   wheel {wheel}"),
            EventKind::Custom(text) => text.clone(),
        };
        println!("  t={:>7.2}s   {label}", ev.time);
    }
    println!();

    println!("  Performance Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Peak saturation: {:>6.1}%  at t={:.1}s",
        summary.max_saturation * 100.0,
        summary.max_saturation_time_s
    );
    println!("  Peak body rate:  {:>8.4} rad/s", summary.max_rate_rad_s);
    println!("  Discharging:     {:>8.1} s", summary.discharge_time_s);
    println!("  Resources used:  {:>8.3} units", summary.resources_used);
    println!();

    // -----------------------------------------------------------------------
    // Telemetry table (sampled)
    // -----------------------------------------------------------------------
    println!("  Telemetry");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>7}  {:>8}  {:>9}  {:>7}  {:>9}  {:>5}",
        "t (s)", "err(deg)", "rate(r/s)", "sat(%)", "res", "phase"
    );
    println!("  {}", "─".repeat(58));

    let sample_interval = (run.samples.len() / 30).max(1);
    for (i, s) in run.samples.iter().enumerate() {
        if i % sample_interval != 0 && i != run.samples.len() - 1 {
            continue;
        }
        let target = demo.schedule.target_at(s.state.time);
        let phase = if s.discharging() { "DUMP" } else { "HOLD" };
        println!(
            "  {:>7.2}  {:>8.2}  {:>9.4}  {:>7.1}  {:>9.3}  {:>5}",
            s.state.time,
            s.state.angle_to(&target).to_degrees(),
            s.state.omega.norm(),
            s.max_saturation().min(1.0) * 100.0,
            s.resources,
            phase
        );
    }
    println!();
    println!("  Simulation: {} steps, dt={} s", run.samples.len(), demo.config.dt);
    println!("====================================================================");
    println!();

    // -----------------------------------------------------------------------
    // Outputs
    // -----------------------------------------------------------------------
    if let Some(path) = &cli.csv {
        io::write_telemetry_file(path, &run.samples)?;
        println!("  telemetry → {}", path.display());
    }
    if let Some(path) = &cli.json {
        io::write_summary_file(path, &summary)?;
        println!("  summary   → {}", path.display());
    }
    if let Some(path) = &cli.snapshot {
        io::save_snapshot(path, &run.cluster)?;
        println!("  snapshot  → {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_slew_without_outputs() {
        let cli = Cli::try_parse_from(["saturable-wheel"]).unwrap();
        assert!(matches!(cli.scenario, Which::Slew));
        assert!(cli.csv.is_none() && cli.json.is_none() && cli.snapshot.is_none());
    }

    #[test]
    fn parses_scenario_and_output_paths() {
        let cli = Cli::try_parse_from(["saturable-wheel", "detumble", "--csv", "run.csv", "--snapshot", "w.json"])
            .unwrap();
        assert!(matches!(cli.scenario, Which::Detumble));
        assert_eq!(cli.csv, Some(PathBuf::from("run.csv")));
        assert_eq!(cli.snapshot, Some(PathBuf::from("w.json")));
        assert!(Cli::try_parse_from(["saturable-wheel", "orbit"]).is_err());
    }
}
