use saturable_wheel::gnc::AttitudeHold;
use saturable_wheel::io::{self, ClusterSnapshot};
use saturable_wheel::sim::{self, scenarios, DischargeDetector, SaturationDetector};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    let demo = scenarios::slew_and_dump();
    let mut hold = AttitudeHold::new(demo.schedule.clone());
    let run = sim::simulate_with(&demo.scenario, &demo.config, &mut hold)?;

    let mut saturation = SaturationDetector::new(0.5);
    let mut discharge = DischargeDetector;
    for ev in sim::detect_events(&run.samples, &mut [&mut saturation, &mut discharge]) {
        println!("t={:>6.2}s  {:?}", ev.time, ev.kind);
    }

    let path = std::env::temp_dir().join("slew_and_dump_wheels.json");
    io::save_snapshot(&path, &run.cluster)?;

    // A fresh craft picks up where this one left off
    let mut cluster = demo.scenario.craft.build_cluster()?;
    io::load_snapshot(&path)?.restore(&mut cluster)?;
    assert_eq!(ClusterSnapshot::capture(&cluster), ClusterSnapshot::capture(&run.cluster));

    for wheel in cluster.wheels() {
        let t = wheel.telemetry();
        println!(
            "{}: momentum [{:.3}, {:.3}, {:.3}]  saturation {:.0}%",
            wheel.name(),
            t.momentum.x,
            t.momentum.y,
            t.momentum.z,
            t.saturation_percent.max()
        );
    }
    println!("snapshot written to {}", path.display());
    Ok(())
}
