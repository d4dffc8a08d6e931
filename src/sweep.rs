//! Frequency grids and spectrum post-processing helpers.

use crate::constants::angular_frequency;
use crate::errors::{ImpedanceError, Result};
use crate::math::{CScalar, Scalar};

/// `n` evenly spaced values from `start` to `stop`, both included.
#[must_use]
pub fn linspace(start: Scalar, stop: Scalar, n: usize) -> Vec<Scalar> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n as Scalar - 1.0);
            (0..n).map(|i| start + step * i as Scalar).collect()
        }
    }
}

/// Generates `n` logarithmically spaced samples between `start` and `stop`.
/// Both ends must be positive.
#[must_use]
pub fn logspace(start: Scalar, stop: Scalar, n: usize) -> Vec<Scalar> {
    let log_start = start.log10();
    let log_stop = stop.log10();
    linspace(log_start, log_stop, n)
        .into_iter()
        .map(|e| 10f64.powf(e))
        .collect()
}

/// Strictly increasing sequence of angular frequencies (rad/s).
///
/// A grid is either non-negative (for spectral analysis) or two-sided, i.e.
/// symmetric about zero; only two-sided grids feed the wake transform.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyGrid {
    omegas: Vec<Scalar>,
}

/// Relative tolerance for pairing +ω with -ω.
const MIRROR_TOLERANCE: Scalar = 1e-9;

impl FrequencyGrid {
    /// Validates a list of angular frequencies.
    pub fn new(omegas: Vec<Scalar>) -> Result<Self> {
        if omegas.is_empty() {
            return Err(ImpedanceError::input("frequency grid is empty"));
        }
        if let Some(w) = omegas.iter().find(|w| !w.is_finite()) {
            return Err(ImpedanceError::input(format!(
                "frequency grid contains a non-finite value ({w})"
            )));
        }
        if let Some(i) = (1..omegas.len()).find(|&i| omegas[i] <= omegas[i - 1]) {
            return Err(ImpedanceError::input(format!(
                "frequency grid must be strictly increasing (index {i}: {} after {})",
                omegas[i],
                omegas[i - 1]
            )));
        }
        Ok(Self { omegas })
    }

    /// `n` linearly spaced frequencies between `start_hz` and `stop_hz`.
    pub fn linspace_hz(start_hz: Scalar, stop_hz: Scalar, n: usize) -> Result<Self> {
        Self::new(
            linspace(start_hz, stop_hz, n)
                .into_iter()
                .map(angular_frequency)
                .collect(),
        )
    }

    /// `n` log-spaced frequencies between `start_hz` and `stop_hz` (both > 0).
    pub fn logspace_hz(start_hz: Scalar, stop_hz: Scalar, n: usize) -> Result<Self> {
        if !(start_hz > 0.0 && stop_hz > 0.0) {
            return Err(ImpedanceError::input(format!(
                "log-spaced grid needs positive bounds, got [{start_hz}, {stop_hz}]"
            )));
        }
        Self::new(
            logspace(start_hz, stop_hz, n)
                .into_iter()
                .map(angular_frequency)
                .collect(),
        )
    }

    /// Angular frequencies.
    #[must_use]
    pub fn omegas(&self) -> &[Scalar] {
        &self.omegas
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.omegas.len()
    }

    /// Always false for a validated grid.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.omegas.is_empty()
    }

    /// True when no sample is negative.
    #[must_use]
    pub fn is_non_negative(&self) -> bool {
        self.omegas[0] >= 0.0
    }

    /// True when the grid is symmetric about zero (an optional zero sample sits in the middle).
    #[must_use]
    pub fn is_two_sided(&self) -> bool {
        let n = self.omegas.len();
        if n < 2 || self.omegas[0] >= 0.0 {
            return false;
        }
        (0..n / 2).all(|i| mirrors(self.omegas[i], self.omegas[n - 1 - i]))
            && (n % 2 == 0 || self.omegas[n / 2] == 0.0)
    }

    /// Two-sided grid built from a strictly positive one: `[-ω_n, ..., -ω_1, ω_1, ..., ω_n]`.
    pub fn mirrored(&self) -> Result<Self> {
        if self.omegas[0] <= 0.0 {
            return Err(ImpedanceError::input(
                "only strictly positive grids can be mirrored",
            ));
        }
        let omegas = self
            .omegas
            .iter()
            .rev()
            .map(|w| -w)
            .chain(self.omegas.iter().copied())
            .collect();
        Ok(Self { omegas })
    }

    /// Strictly positive half of the grid.
    #[must_use]
    pub fn positive_half(&self) -> Vec<Scalar> {
        self.omegas.iter().copied().filter(|w| *w > 0.0).collect()
    }
}

/// True when `a` and `b` are ±ω pairs within the mirror tolerance.
pub(crate) fn mirrors(negative: Scalar, positive: Scalar) -> bool {
    (negative + positive).abs() <= MIRROR_TOLERANCE * positive.abs().max(negative.abs())
}

/// |Z| of every sample.
#[must_use]
pub fn magnitudes(values: &[CScalar]) -> Vec<Scalar> {
    values.iter().map(|z| z.norm()).collect()
}

/// arg Z of every sample in degrees, in (-180, 180].
#[must_use]
pub fn phases_deg(values: &[CScalar]) -> Vec<Scalar> {
    values.iter().map(|z| z.arg().to_degrees()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn linspace_includes_both_ends() {
        assert_eq!(linspace(-1.0, 1.0, 5), vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
        assert_eq!(linspace(3.0, 4.0, 1), vec![3.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn logspace_covers_decades() {
        let grid = FrequencyGrid::logspace_hz(1.0e3, 1.0e9, 7).unwrap();
        assert_eq!(grid.len(), 7);
        assert_relative_eq!(grid.omegas()[3], angular_frequency(1.0e6), max_relative = 1e-12);
        assert!(grid.is_non_negative());
        assert!(!grid.is_two_sided());
    }

    #[test]
    fn non_increasing_grid_is_rejected() {
        assert!(FrequencyGrid::new(vec![1.0, 1.0]).is_err());
        assert!(FrequencyGrid::new(vec![2.0, 1.0]).is_err());
        assert!(FrequencyGrid::new(Vec::new()).is_err());
        assert!(FrequencyGrid::logspace_hz(0.0, 1.0, 3).is_err());
    }

    #[test]
    fn mirrored_grid_is_two_sided() {
        let grid = FrequencyGrid::linspace_hz(1.0, 4.0, 4).unwrap().mirrored().unwrap();
        assert_eq!(grid.len(), 8);
        assert!(grid.is_two_sided());
        assert_eq!(grid.positive_half().len(), 4);
        assert!(FrequencyGrid::new(vec![-2.0, 0.0, 2.0]).unwrap().is_two_sided());
        assert!(!FrequencyGrid::new(vec![-2.0, 1.0, 2.0]).unwrap().is_two_sided());
    }

    #[test]
    fn skin_effect_samples_sit_at_forty_five_degrees() {
        let zs = [CScalar::new(3.0, 3.0), CScalar::new(0.0, -2.0), CScalar::new(-1.0, 0.0)];
        let m = magnitudes(&zs);
        let p = phases_deg(&zs);
        assert_relative_eq!(m[0], 18.0_f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(m[1], 2.0, epsilon = 1e-12);
        assert_relative_eq!(p[0], 45.0, epsilon = 1e-12);
        assert_relative_eq!(p[1], -90.0, epsilon = 1e-12);
        assert_relative_eq!(p[2], 180.0, epsilon = 1e-12);
    }
}
