//! FFT evaluation of the wake on uniformly spaced spectra.
//!
//! With ω_k = kΔ the trapezoidal cosine/sine sums are the real/imaginary part of
//! one inverse DFT, evaluated on t_n = 2πn / (NΔ). Zero padding refines the time
//! step; requested times are read off by linear interpolation. The sums repeat
//! with period 2π/Δ and only t ≤ π/Δ is alias free.

use std::f64::consts::PI;

use num_complex::Complex;
use rustfft::FftPlanner;

use super::filon::Kernel;
use crate::errors::{ImpedanceError, Result};
use crate::math::{CScalar, Scalar};

/// Relative tolerance on ω_k = kΔ.
const UNIFORM_TOLERANCE: Scalar = 1e-6;

/// (2/π) ∫₀^ωmax f(ω) k(ωt) dω by trapezoidal sums, for every requested time.
///
/// `nodes` must start at zero and be uniformly spaced.
pub(crate) fn uniform_transform(
    nodes: &[Scalar],
    fs: &[Scalar],
    times: &[Scalar],
    kernel: Kernel,
    padding: usize,
) -> Result<Vec<Scalar>> {
    if nodes.len() < 2 || nodes[0] != 0.0 {
        return Err(ImpedanceError::input(
            "FFT transform needs a grid starting at zero (hold the first sample or include ω = 0)",
        ));
    }
    let delta = nodes[1];
    let uniform = nodes
        .iter()
        .enumerate()
        .all(|(k, w)| (w - k as Scalar * delta).abs() <= UNIFORM_TOLERANCE * delta.max(*w));
    if !uniform {
        return Err(ImpedanceError::input(
            "FFT transform needs uniformly spaced frequencies ω_k = kΔ",
        ));
    }

    let t_alias = PI / delta;
    if let Some(t) = times.iter().find(|t| **t > t_alias) {
        return Err(ImpedanceError::input(format!(
            "time {t:e} s exceeds the alias-free window π/Δ = {t_alias:e} s"
        )));
    }

    let last = nodes.len() - 1;
    let size = 2 * nodes.len() * padding.max(1);
    let mut buffer: Vec<CScalar> = vec![Complex::new(0.0, 0.0); size];
    for (k, f) in fs.iter().enumerate() {
        let weight = if k == 0 || k == last { 0.5 } else { 1.0 };
        buffer[k] = Complex::new(weight * f, 0.0);
    }

    let mut planner = FftPlanner::new();
    planner.plan_fft_inverse(size).process(&mut buffer);

    let scale = 2.0 / PI * delta;
    let samples: Vec<Scalar> = buffer[..=size / 2]
        .iter()
        .map(|z| match kernel {
            Kernel::Cosine => scale * z.re,
            Kernel::Sine => scale * z.im,
        })
        .collect();
    let dt = 2.0 * PI / (size as Scalar * delta);
    log::debug!("FFT wake: {size} points, dt = {dt:e} s");

    Ok(times
        .iter()
        .map(|&t| {
            if t < 0.0 {
                return 0.0;
            }
            let pos = t / dt;
            let i = (pos.floor() as usize).min(samples.len() - 2);
            let frac = pos - i as Scalar;
            samples[i] + frac * (samples[i + 1] - samples[i])
        })
        .collect())
}
