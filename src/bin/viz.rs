use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints};

use saturable_wheel::gnc::{AttitudeHold, SlewSchedule};
use saturable_wheel::sim::{self, scenarios, Sample};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    let demo = scenarios::slew_and_dump();
    let mut controller = AttitudeHold::new(demo.schedule.clone());
    let run = sim::simulate_with(&demo.scenario, &demo.config, &mut controller)?;

    let app = WheelViz {
        samples: run.samples,
        craft: demo.scenario.craft.name.clone(),
        schedule: demo.schedule,
    };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Reaction Wheel Simulator", options, Box::new(|_| Ok(Box::new(app))))?;
    Ok(())
}

struct WheelViz {
    samples: Vec<Sample>,
    craft: String,
    schedule: SlewSchedule,
}

impl eframe::App for WheelViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let step = (self.samples.len() / 2000).max(1);
        let sampled: Vec<&Sample> = self.samples.iter().step_by(step).collect();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.heading(format!("Craft: {}", self.craft));
            let peak = self.samples.iter().map(Sample::max_saturation).fold(0.0_f64, f64::max);
            let used = match (self.samples.first(), self.samples.last()) {
                (Some(a), Some(b)) => a.resources - b.resources,
                _ => 0.0,
            };
            ui.label(format!(
                "Peak saturation: {:.0}%  |  Resources used: {:.2}  |  Wheels: {}  |  Run: {:.0} s",
                peak * 100.0,
                used,
                self.samples.first().map_or(0, |s| s.wheels.len()),
                self.samples.last().map_or(0.0, |s| s.state.time),
            ));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let half_w = available.x / 2.0 - 8.0;
            let half_h = available.y / 2.0 - 8.0;

            ui.horizontal(|ui| {
                // Stored momentum per reference axis (first wheel)
                ui.vertical(|ui| {
                    ui.label("Stored momentum (N·m·s)");
                    Plot::new("momentum")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            for (axis, name) in ["X", "Y", "Z"].iter().enumerate() {
                                let points: PlotPoints = sampled
                                    .iter()
                                    .filter_map(|s| s.wheels.first().map(|t| [s.state.time, t.momentum[axis]]))
                                    .collect();
                                plot_ui.line(Line::new(*name, points));
                            }
                        });
                });

                // Saturation
                ui.vertical(|ui| {
                    ui.label("Saturation (%)");
                    let points: PlotPoints = sampled
                        .iter()
                        .map(|s| [s.state.time, s.max_saturation() * 100.0])
                        .collect();
                    Plot::new("saturation")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Saturation", points));
                        });
                });
            });

            ui.horizontal(|ui| {
                // Pointing error
                ui.vertical(|ui| {
                    ui.label("Pointing error (deg)");
                    let points: PlotPoints = sampled
                        .iter()
                        .map(|s| {
                            let target = self.schedule.target_at(s.state.time);
                            [s.state.time, s.state.angle_to(&target).to_degrees()]
                        })
                        .collect();
                    Plot::new("error")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Error", points));
                        });
                });

                // Applied wheel torque
                ui.vertical(|ui| {
                    ui.label("Wheel torque (N·m)");
                    Plot::new("torque")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            for (axis, name) in ["Pitch", "Yaw", "Roll"].iter().enumerate() {
                                let points: PlotPoints = sampled
                                    .iter()
                                    .map(|s| [s.state.time, s.wheel_torque[axis]])
                                    .collect();
                                plot_ui.line(Line::new(*name, points));
                            }
                        });
                });
            });
        });
    }
}
