//! Chamber-shape scaling and two-sided spectra through the full pipeline.

use approx::assert_relative_eq;
use std::f64::consts::PI;

use tlwall::calculator::ImpedanceCalculator;
use tlwall::constants::angular_frequency;
use tlwall::errors::ErrorKind;
use tlwall::io::write_spectrum_csv;
use tlwall::mode::{Mode, Plane};
use tlwall::sweep::{linspace, FrequencyGrid};
use tlwall::wake::impedance_to_wake;
use tlwall::yokoya::ChamberShape;

mod common;
use common::{copper_pipe, copper_shell};

#[test]
fn flat_chamber_scales_the_round_pipe_result() {
    let wall = copper_pipe();
    let omega = angular_frequency(1.0e6);
    let round = ImpedanceCalculator::new(&wall, ChamberShape::Circular)
        .evaluate(omega, Mode::DIPOLE)
        .unwrap();
    let flat = ImpedanceCalculator::new(&wall, ChamberShape::FlatPlates)
        .evaluate(omega, Mode::DIPOLE)
        .unwrap();

    let z0 = round.component(Plane::DrivingX).unwrap();
    let factors = [
        (Plane::DrivingX, PI * PI / 24.0),
        (Plane::DrivingY, PI * PI / 12.0),
        (Plane::DetuningX, -PI * PI / 24.0),
        (Plane::DetuningY, PI * PI / 24.0),
    ];
    for (plane, factor) in factors {
        let z = flat.component(plane).unwrap();
        assert_relative_eq!(z.re, factor * z0.re, max_relative = 1e-12);
        assert_relative_eq!(z.im, factor * z0.im, max_relative = 1e-12);
    }

    let long_round = ImpedanceCalculator::new(&wall, ChamberShape::Circular)
        .evaluate(omega, Mode::LONGITUDINAL)
        .unwrap();
    let long_flat = ImpedanceCalculator::new(&wall, ChamberShape::FlatPlates)
        .evaluate(omega, Mode::LONGITUDINAL)
        .unwrap();
    assert_eq!(long_round, long_flat);
}

#[test]
fn elliptical_driving_terms_lie_between_the_limits() {
    let wall = copper_pipe();
    let omega = angular_frequency(1.0e6);
    let round = ImpedanceCalculator::new(&wall, ChamberShape::Circular)
        .evaluate(omega, Mode::DIPOLE)
        .unwrap()
        .component(Plane::DrivingX)
        .unwrap();
    let shape = ChamberShape::Elliptical { aspect_ratio: 2.0 };
    let z = ImpedanceCalculator::new(&wall, shape)
        .evaluate(omega, Mode::DIPOLE)
        .unwrap();

    let x = z.component(Plane::DrivingX).unwrap().re / round.re;
    let dx = z.component(Plane::DetuningX).unwrap().re / round.re;
    let dy = z.component(Plane::DetuningY).unwrap().re / round.re;
    assert!(x < 1.0 && x > PI * PI / 24.0);
    assert!(dx < 0.0);
    assert_relative_eq!(dx, -dy, max_relative = 1e-12);
}

#[test]
fn higher_modes_need_a_round_pipe() {
    let wall = copper_pipe();
    let calc = ImpedanceCalculator::new(&wall, ChamberShape::FlatPlates);
    let grid = FrequencyGrid::logspace_hz(1.0e3, 1.0e6, 4).unwrap();
    let err = calc.sweep(&grid, &[Mode::QUADRUPOLE]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);

    let round = ImpedanceCalculator::new(&wall, ChamberShape::Circular);
    assert!(round.sweep(&grid, &[Mode::QUADRUPOLE]).unwrap().is_complete());
}

#[test]
fn two_sided_sweep_is_hermitian_in_every_plane() {
    let wall = copper_shell(tlwall::materials::MaterialModel::PerfectConductor);
    let calc = ImpedanceCalculator::new(&wall, ChamberShape::Elliptical { aspect_ratio: 1.5 });
    let grid = FrequencyGrid::logspace_hz(1.0e2, 1.0e9, 50)
        .unwrap()
        .mirrored()
        .unwrap();
    let result = calc.sweep(&grid, &[Mode::LONGITUDINAL, Mode::DIPOLE]).unwrap();
    assert!(result.is_complete());
    for sweep in result.modes() {
        for &plane in sweep.mode.planes() {
            let spectrum = result.spectrum(sweep.mode, plane).unwrap();
            assert!(spectrum.is_two_sided());
            spectrum.check_conjugate_symmetry(0.0).unwrap();
        }
    }
}

#[test]
fn wall_to_wake_pipeline_writes_csv() {
    let wall = copper_pipe();
    let calc = ImpedanceCalculator::new(&wall, ChamberShape::Circular);
    let positive = FrequencyGrid::logspace_hz(1.0e3, 1.0e12, 800).unwrap();
    let spectrum = calc
        .two_sided_spectrum(&positive, Mode::DIPOLE, Plane::DrivingX)
        .unwrap();

    let times = linspace(0.0, 1.0e-9, 51);
    let wake = impedance_to_wake(&spectrum, &times).unwrap();
    assert_eq!(wake.values()[0], 0.0);
    // The resistive-wall dipole wake is positive and finite after the source.
    assert!(wake.values()[1..].iter().all(|w| w.is_finite() && *w > 0.0));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dipole.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    write_spectrum_csv(&mut file, &spectrum).unwrap();
    drop(file);
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 1 + spectrum.len());
}
