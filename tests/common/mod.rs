//! Shared builders for the integration tests.

#![allow(dead_code)]

use num_complex::Complex;
use tlwall::calculator::ImpedanceSpectrum;
use tlwall::materials::{MaterialModel, MaterialProperties};
use tlwall::mode::Plane;
use tlwall::wall::{Layer, Wall};

pub const COPPER: f64 = 5.9e7;
pub const RADIUS: f64 = 0.025;
pub const LENGTH: f64 = 1.0;

/// Thick copper pipe, b = 25 mm, L = 1 m.
pub fn copper_pipe() -> Wall {
    Wall::new(
        RADIUS,
        LENGTH,
        vec![Layer::semi_infinite(MaterialProperties::conductor(COPPER))],
    )
    .unwrap()
}

/// 2 mm of copper on the given backing.
pub fn copper_shell(backing: MaterialModel) -> Wall {
    Wall::new(
        RADIUS,
        LENGTH,
        vec![
            Layer::new(2.0e-3, MaterialProperties::conductor(COPPER)),
            Layer::semi_infinite(backing),
        ],
    )
    .unwrap()
}

/// Broad-band resonator Z = R / (1 + jQ(ω/ωr - ωr/ω)) mirrored onto a two-sided grid.
pub fn resonator_spectrum(r_shunt: f64, q: f64, omega_r: f64, positive: &[f64]) -> ImpedanceSpectrum {
    let values = positive
        .iter()
        .map(|w| {
            let detune = q * (w / omega_r - omega_r / w);
            Complex::new(r_shunt, 0.0) / Complex::new(1.0, detune)
        })
        .collect();
    ImpedanceSpectrum::new(Plane::Longitudinal, positive.to_vec(), values)
        .unwrap()
        .two_sided()
        .unwrap()
}

/// Longitudinal wake of the resonator for t > 0.
pub fn resonator_wake(r_shunt: f64, q: f64, omega_r: f64, t: f64) -> f64 {
    let alpha = omega_r / (2.0 * q);
    let omega_bar = (omega_r * omega_r - alpha * alpha).sqrt();
    2.0 * alpha * r_shunt * (-alpha * t).exp() * ((omega_bar * t).cos() - alpha / omega_bar * (omega_bar * t).sin())
}

pub fn relative_error(value: f64, reference: f64) -> f64 {
    ((value - reference) / reference).abs()
}
