use std::io::{self, Write};
use std::path::Path;

use crate::sim::Sample;

/// Write run telemetry in CSV format.
///
/// Columns: time, quat_w, quat_x, quat_y, quat_z, omega_x, omega_y, omega_z,
///          cmd_pitch, cmd_yaw, cmd_roll, torque_x, torque_y, torque_z,
///          then per wheel `wN_hx, wN_hy, wN_hz, wN_sat, wN_discharging`,
///          and finally the pooled resource total.
pub fn write_telemetry<W: Write>(writer: &mut W, samples: &[Sample]) -> io::Result<()> {
    let wheel_count = samples.first().map_or(0, |s| s.wheels.len());

    write!(
        writer,
        "time,quat_w,quat_x,quat_y,quat_z,omega_x,omega_y,omega_z,\
         cmd_pitch,cmd_yaw,cmd_roll,torque_x,torque_y,torque_z"
    )?;
    for i in 0..wheel_count {
        write!(writer, ",w{i}_hx,w{i}_hy,w{i}_hz,w{i}_sat,w{i}_discharging")?;
    }
    writeln!(writer, ",resources")?;

    for s in samples {
        let q = s.state.quat.quaternion();
        write!(
            writer,
            "{:.4},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},\
             {:.4},{:.4},{:.4},{:.4},{:.4},{:.4}",
            s.state.time,
            q.w, q.i, q.j, q.k,
            s.state.omega.x, s.state.omega.y, s.state.omega.z,
            s.command.pitch, s.command.yaw, s.command.roll,
            s.wheel_torque.x, s.wheel_torque.y, s.wheel_torque.z,
        )?;
        for t in s.wheels.iter().take(wheel_count) {
            write!(
                writer,
                ",{:.5},{:.5},{:.5},{:.4},{}",
                t.momentum.x,
                t.momentum.y,
                t.momentum.z,
                t.saturation.max(),
                u8::from(t.discharge_engaged),
            )?;
        }
        writeln!(writer, ",{:.4}", s.resources)?;
    }

    Ok(())
}

/// Write telemetry to a CSV file at the given path.
pub fn write_telemetry_file(path: impl AsRef<Path>, samples: &[Sample]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_telemetry(&mut file, samples)
}
