//! Plain CSV writers.
//!
//! Numbers are written with 16 significant digits so files round-trip through
//! other tools without loss.

use std::io::{self, Write};

use crate::calculator::{ImpedanceSpectrum, SweepResult};
use crate::constants::frequency_from_angular;
use crate::sweep::{magnitudes, phases_deg};
use crate::wake::WakeFunction;

/// Writes `omega,f_hz,re,im,abs,phase_deg` rows for one spectrum.
pub fn write_spectrum_csv<W: Write>(mut w: W, spectrum: &ImpedanceSpectrum) -> io::Result<()> {
    writeln!(w, "omega,f_hz,re,im,abs,phase_deg")?;
    let magnitude = magnitudes(spectrum.values());
    let phase = phases_deg(spectrum.values());
    for (i, (omega, z)) in spectrum.omegas().iter().zip(spectrum.values()).enumerate() {
        writeln!(
            w,
            "{:.16e},{:.16e},{:.16e},{:.16e},{:.16e},{:.6}",
            omega,
            frequency_from_angular(*omega),
            z.re,
            z.im,
            magnitude[i],
            phase[i]
        )?;
    }
    Ok(())
}

/// Writes every plane of every swept mode side by side.
///
/// Columns are `omega,f_hz` followed by `<mode>_<plane>_re,<mode>_<plane>_im`
/// pairs. Failed samples are written as `NaN`.
pub fn write_sweep_csv<W: Write>(mut w: W, result: &SweepResult) -> io::Result<()> {
    let columns: Vec<_> = result
        .modes()
        .iter()
        .flat_map(|m| m.mode.planes().iter().map(move |p| (m, *p)))
        .collect();

    write!(w, "omega,f_hz")?;
    for (m, plane) in &columns {
        write!(w, ",m{}_{plane}_re,m{}_{plane}_im", m.mode.index(), m.mode.index())?;
    }
    writeln!(w)?;

    for (k, omega) in result.omegas().iter().enumerate() {
        write!(w, "{:.16e},{:.16e}", omega, frequency_from_angular(*omega))?;
        for (m, plane) in &columns {
            match m.samples[k].as_ref().ok().and_then(|z| z.component(*plane)) {
                Some(z) => write!(w, ",{:.16e},{:.16e}", z.re, z.im)?,
                None => write!(w, ",NaN,NaN")?,
            }
        }
        writeln!(w)?;
    }
    Ok(())
}

/// Writes `t,w` rows for one wake function.
pub fn write_wake_csv<W: Write>(mut w: W, wake: &WakeFunction) -> io::Result<()> {
    writeln!(w, "t,w")?;
    for (t, value) in wake.times().iter().zip(wake.values()) {
        writeln!(w, "{t:.16e},{value:.16e}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use num_complex::Complex;

    use super::*;
    use crate::calculator::ImpedanceCalculator;
    use crate::materials::MaterialProperties;
    use crate::mode::{Mode, Plane};
    use crate::sweep::FrequencyGrid;
    use crate::wall::{Layer, Wall};
    use crate::yokoya::ChamberShape;

    #[test]
    fn spectrum_csv_has_header_and_one_row_per_sample() {
        let spectrum = ImpedanceSpectrum::new(
            Plane::Longitudinal,
            vec![1.0, 2.0],
            vec![Complex::new(1.0, 1.0), Complex::new(0.0, -2.0)],
        )
        .unwrap();
        let mut buf = Vec::new();
        write_spectrum_csv(&mut buf, &spectrum).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "omega,f_hz,re,im,abs,phase_deg");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].ends_with(",45.000000"));
        assert!(lines[2].ends_with(",-90.000000"));
    }

    #[test]
    fn sweep_csv_marks_failed_samples() {
        let wall = Wall::new(
            0.02,
            1.0,
            vec![Layer::semi_infinite(MaterialProperties::conductor(1.0e6))],
        )
        .unwrap();
        let calc = ImpedanceCalculator::new(&wall, ChamberShape::Circular);
        let grid = FrequencyGrid::new(vec![0.0, 1.0e6]).unwrap();
        let result = calc.sweep(&grid, &[Mode::LONGITUDINAL, Mode::DIPOLE]).unwrap();
        let mut buf = Vec::new();
        write_sweep_csv(&mut buf, &result).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0].split(',').count(), 2 + 2 * 5);
        assert!(lines[0].starts_with("omega,f_hz,m0_long_re,m0_long_im,m1_driving_x_re"));
        assert!(lines[1].contains("NaN"));
        assert!(!lines[2].contains("NaN"));
    }

    #[test]
    fn wake_csv_rows() {
        let wake = WakeFunction::new(Plane::Longitudinal, vec![0.0, 1.0e-9], vec![2.0, 1.0]).unwrap();
        let mut buf = Vec::new();
        write_wake_csv(&mut buf, &wake).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().next(), Some("t,w"));
        assert_eq!(text.lines().count(), 3);
    }
}
