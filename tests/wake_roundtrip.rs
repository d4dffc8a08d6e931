//! Wake transforms checked against the broad-band resonator and a resistive wall.

use std::f64::consts::PI;

use num_complex::Complex;

use tlwall::calculator::{ImpedanceCalculator, ImpedanceSpectrum};
use tlwall::materials::MaterialModel;
use tlwall::mode::{Mode, Plane};
use tlwall::sweep::{linspace, logspace, FrequencyGrid};
use tlwall::wake::{
    impedance_to_wake, LowFrequencyPolicy, TransformMethod, WakeConfig, WakeTransform, Window,
};
use tlwall::yokoya::ChamberShape;

mod common;
use common::{copper_shell, resonator_spectrum, resonator_wake};

const R_SHUNT: f64 = 1.0e3;
const Q: f64 = 1.0;
const OMEGA_R: f64 = 2.0 * PI * 1.0e9;

fn resonator_grid() -> Vec<f64> {
    logspace(1.0e-3 * OMEGA_R, 200.0 * OMEGA_R, 2000)
}

#[test]
fn longitudinal_resonator_wake_from_log_grid() {
    let spectrum = resonator_spectrum(R_SHUNT, Q, OMEGA_R, &resonator_grid());
    let times = linspace(0.0, 80.0 / OMEGA_R, 801);
    let wake = impedance_to_wake(&spectrum, &times).unwrap();

    let peak = OMEGA_R * R_SHUNT;
    for (t, w) in wake.times().iter().zip(wake.values()) {
        let exact = resonator_wake(R_SHUNT, Q, OMEGA_R, *t);
        assert!((w - exact).abs() < 1e-2 * peak, "t = {t:e}: {w} vs {exact}");
    }
    // Right-hand limit at the origin.
    assert!((wake.values()[0] - peak).abs() < 1e-2 * peak);
}

#[test]
fn wake_vanishes_before_the_source() {
    let spectrum = resonator_spectrum(R_SHUNT, Q, OMEGA_R, &resonator_grid());
    let times = linspace(-5.0 / OMEGA_R, -1.0 / OMEGA_R, 5);
    let wake = impedance_to_wake(&spectrum, &times).unwrap();
    assert!(wake.values().iter().all(|w| *w == 0.0));
}

#[test]
fn transverse_resonator_wake_starts_at_zero() {
    let positive = resonator_grid();
    let values = positive
        .iter()
        .map(|w| {
            let detune = Q * (w / OMEGA_R - OMEGA_R / w);
            Complex::new(R_SHUNT * OMEGA_R / w, 0.0) / Complex::new(1.0, detune)
        })
        .collect();
    let spectrum = ImpedanceSpectrum::new(Plane::DrivingX, positive, values)
        .unwrap()
        .two_sided()
        .unwrap();

    let times = linspace(0.0, 40.0 / OMEGA_R, 401);
    let wake = impedance_to_wake(&spectrum, &times).unwrap();

    let alpha = OMEGA_R / (2.0 * Q);
    let omega_bar = (OMEGA_R * OMEGA_R - alpha * alpha).sqrt();
    let amplitude = R_SHUNT * OMEGA_R * OMEGA_R / (Q * omega_bar);
    assert_eq!(wake.values()[0], 0.0);
    for (t, w) in wake.times().iter().zip(wake.values()).skip(1) {
        let exact = amplitude * (-alpha * t).exp() * (omega_bar * t).sin();
        assert!((w - exact).abs() < 1e-2 * amplitude, "t = {t:e}: {w} vs {exact}");
    }
}

#[test]
fn resonator_survives_the_round_trip() {
    let spectrum = resonator_spectrum(R_SHUNT, Q, OMEGA_R, &resonator_grid());
    let times = linspace(0.0, 80.0 / OMEGA_R, 2001);
    let error = WakeTransform::default().round_trip_error(&spectrum, &times).unwrap();
    assert!(error < 2e-2, "round-trip error {error}");
}

#[test]
fn copper_shell_dipole_survives_the_round_trip() {
    let wall = copper_shell(MaterialModel::PerfectConductor);
    let calc = ImpedanceCalculator::new(&wall, ChamberShape::Circular);
    let grid = FrequencyGrid::logspace_hz(0.1, 1.0e10, 3000).unwrap();
    let spectrum = calc
        .two_sided_spectrum(&grid, Mode::DIPOLE, Plane::DrivingX)
        .unwrap();

    // The wake rises within 1/ω_max and decays over the copper diffusion time (~0.1 ms).
    let mut times = vec![0.0];
    times.extend(logspace(1.0e-14, 1.0e-1, 5000));
    let transform = WakeTransform::new(
        WakeConfig::default()
            .with_window(Window::Hann)
            .with_low_frequency(LowFrequencyPolicy::Truncate),
    )
    .unwrap();

    let error = transform.round_trip_error(&spectrum, &times).unwrap();
    assert!(error < 1e-2, "round-trip error {error}");
}

#[test]
fn fft_and_filon_agree_on_a_uniform_grid() {
    let delta = 0.02 * OMEGA_R;
    let positive: Vec<f64> = (1..=10_000).map(|k| f64::from(k) * delta).collect();
    let spectrum = resonator_spectrum(R_SHUNT, Q, OMEGA_R, &positive);
    let times = linspace(0.0, 40.0 / OMEGA_R, 201);

    let filon = impedance_to_wake(&spectrum, &times).unwrap();
    let fft = WakeTransform::new(WakeConfig::default().with_method(TransformMethod::Fft { padding: 4 }))
        .unwrap()
        .impedance_to_wake(&spectrum, &times)
        .unwrap();

    let peak = OMEGA_R * R_SHUNT;
    for ((t, a), b) in times.iter().zip(filon.values()).zip(fft.values()) {
        let exact = resonator_wake(R_SHUNT, Q, OMEGA_R, *t);
        assert!((a - b).abs() < 5e-3 * peak, "t = {t:e}");
        assert!((b - exact).abs() < 1e-2 * peak, "t = {t:e}");
    }
}
