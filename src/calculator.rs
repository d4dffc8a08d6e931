//! Impedance spectra over a frequency grid.
//!
//! [`ImpedanceCalculator`] runs the solver and the shape corrector once per
//! (frequency, mode) pair. Samples are independent, so with the `parallel`
//! feature they are spread over the rayon pool; results always come back in grid
//! order. A failing sample is stored next to the successful ones instead of
//! aborting the sweep.
//!
//! Negative frequencies are never solved directly: the value at -ω is the complex
//! conjugate of the value at |ω|, which makes every two-sided spectrum produced
//! here exactly Hermitian.

use crate::errors::{ImpedanceError, Result};
use crate::math::{CScalar, Scalar};
use crate::mode::{Mode, Plane};
use crate::sweep::{mirrors, FrequencyGrid};
use crate::wall::Wall;
use crate::yokoya::{BeamImpedance, ChamberShape, ShapeCorrector};

/// Solver and corrector bound to one wall.
#[derive(Debug, Clone, Copy)]
pub struct ImpedanceCalculator<'a> {
    wall: &'a Wall,
    corrector: ShapeCorrector<'a>,
}

impl<'a> ImpedanceCalculator<'a> {
    /// Calculator for `wall` in a chamber of the given shape (builtin Yokoya table).
    #[must_use]
    pub fn new(wall: &'a Wall, shape: ChamberShape) -> Self {
        Self {
            wall,
            corrector: ShapeCorrector::new(shape),
        }
    }

    /// Calculator with an explicit corrector, e.g. one backed by a custom table.
    #[must_use]
    pub const fn with_corrector(wall: &'a Wall, corrector: ShapeCorrector<'a>) -> Self {
        Self { wall, corrector }
    }

    /// The wall being evaluated.
    #[must_use]
    pub const fn wall(&self) -> &'a Wall {
        self.wall
    }

    /// The shape corrector.
    #[must_use]
    pub const fn corrector(&self) -> &ShapeCorrector<'a> {
        &self.corrector
    }

    /// Beam-coupling impedance at one frequency.
    pub fn evaluate(&self, omega: Scalar, mode: Mode) -> Result<BeamImpedance> {
        if omega < 0.0 {
            return self.evaluate(-omega, mode).map(|z| z.conj());
        }
        self.corrector.evaluate(self.wall, omega, mode)
    }

    /// Evaluates every (frequency, mode) pair of the request.
    ///
    /// Request-level problems (no modes, a mode the chamber shape does not
    /// support) are returned as errors. Per-sample failures are kept in the result.
    pub fn sweep(&self, grid: &FrequencyGrid, modes: &[Mode]) -> Result<SweepResult> {
        if modes.is_empty() {
            return Err(ImpedanceError::input("no modes requested"));
        }
        for &mode in modes {
            self.corrector.mode_factors(mode)?;
        }
        log::debug!(
            "sweeping {} frequencies x {} modes ({:?} chamber)",
            grid.len(),
            modes.len(),
            self.corrector.shape()
        );

        let modes = modes
            .iter()
            .map(|&mode| {
                let samples = self.evaluate_all(grid.omegas(), mode);
                let failed = samples.iter().filter(|s| s.is_err()).count();
                if failed > 0 {
                    log::warn!("{mode}: {failed} of {} samples failed", samples.len());
                }
                ModeSweep { mode, samples }
            })
            .collect();

        Ok(SweepResult {
            omegas: grid.omegas().to_vec(),
            modes,
        })
    }

    /// Spectrum of one plane on `grid`, failing on the first bad sample.
    pub fn spectrum(&self, grid: &FrequencyGrid, mode: Mode, plane: Plane) -> Result<ImpedanceSpectrum> {
        self.sweep(grid, &[mode])?.spectrum(mode, plane)
    }

    /// Two-sided spectrum built from a strictly positive grid by conjugate mirroring.
    pub fn two_sided_spectrum(
        &self,
        positive: &FrequencyGrid,
        mode: Mode,
        plane: Plane,
    ) -> Result<ImpedanceSpectrum> {
        self.spectrum(positive, mode, plane)?.two_sided()
    }

    fn evaluate_all(&self, omegas: &[Scalar], mode: Mode) -> Vec<Result<BeamImpedance>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            omegas
                .par_iter()
                .map(|&omega| self.evaluate(omega, mode))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            omegas
                .iter()
                .map(|&omega| self.evaluate(omega, mode))
                .collect()
        }
    }
}

/// Samples of one mode, in grid order.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeSweep {
    /// Azimuthal mode.
    pub mode: Mode,
    /// One entry per grid frequency.
    pub samples: Vec<Result<BeamImpedance>>,
}

/// A failed (frequency, mode) evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleFailure {
    /// Angular frequency of the sample.
    pub omega: Scalar,
    /// Mode of the sample.
    pub mode: Mode,
    /// Why it failed.
    pub error: ImpedanceError,
}

/// Output of [`ImpedanceCalculator::sweep`].
#[derive(Debug, Clone, PartialEq)]
pub struct SweepResult {
    omegas: Vec<Scalar>,
    modes: Vec<ModeSweep>,
}

impl SweepResult {
    /// Grid the sweep ran on.
    #[must_use]
    pub fn omegas(&self) -> &[Scalar] {
        &self.omegas
    }

    /// Per-mode samples in request order.
    #[must_use]
    pub fn modes(&self) -> &[ModeSweep] {
        &self.modes
    }

    /// Every failed sample.
    #[must_use]
    pub fn failures(&self) -> Vec<SampleFailure> {
        self.modes
            .iter()
            .flat_map(|m| {
                m.samples
                    .iter()
                    .zip(&self.omegas)
                    .filter_map(move |(s, &omega)| {
                        s.as_ref().err().map(|e| SampleFailure {
                            omega,
                            mode: m.mode,
                            error: e.clone(),
                        })
                    })
            })
            .collect()
    }

    /// True when no sample failed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.modes.iter().all(|m| m.samples.iter().all(Result::is_ok))
    }

    /// Spectrum of one plane. Fails if the mode was not swept, the plane does not
    /// belong to the mode, or any sample of the mode failed.
    pub fn spectrum(&self, mode: Mode, plane: Plane) -> Result<ImpedanceSpectrum> {
        let sweep = self
            .modes
            .iter()
            .find(|m| m.mode == mode)
            .ok_or_else(|| ImpedanceError::input(format!("mode {mode} was not swept")))?;
        if !mode.planes().contains(&plane) {
            return Err(ImpedanceError::input(format!(
                "plane {plane} is not reported for mode {mode}"
            )));
        }
        let values = sweep
            .samples
            .iter()
            .map(|s| match s {
                Ok(z) => z
                    .component(plane)
                    .ok_or_else(|| ImpedanceError::input(format!("{mode} sample has no {plane} component"))),
                Err(e) => Err(e.clone()),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(ImpedanceSpectrum {
            plane,
            omegas: self.omegas.clone(),
            values,
        })
    }
}

/// Complex impedance of one plane sampled on a frequency grid.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ImpedanceSpectrum {
    plane: Plane,
    omegas: Vec<Scalar>,
    values: Vec<CScalar>,
}

impl ImpedanceSpectrum {
    /// Wraps samples; `omegas` must form a valid [`FrequencyGrid`].
    pub fn new(plane: Plane, omegas: Vec<Scalar>, values: Vec<CScalar>) -> Result<Self> {
        if omegas.len() != values.len() {
            return Err(ImpedanceError::input(format!(
                "spectrum has {} frequencies but {} values",
                omegas.len(),
                values.len()
            )));
        }
        let grid = FrequencyGrid::new(omegas)?;
        Ok(Self {
            plane,
            omegas: grid.omegas().to_vec(),
            values,
        })
    }

    /// Impedance plane.
    #[must_use]
    pub const fn plane(&self) -> Plane {
        self.plane
    }

    /// Angular frequencies.
    #[must_use]
    pub fn omegas(&self) -> &[Scalar] {
        &self.omegas
    }

    /// Impedance samples.
    #[must_use]
    pub fn values(&self) -> &[CScalar] {
        &self.values
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when there are no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when the frequencies are symmetric about zero.
    #[must_use]
    pub fn is_two_sided(&self) -> bool {
        FrequencyGrid::new(self.omegas.clone()).is_ok_and(|g| g.is_two_sided())
    }

    /// Two-sided copy: a strictly positive spectrum is mirrored with
    /// Z(-ω) = conj(Z(ω)); an already two-sided one is returned unchanged.
    pub fn two_sided(&self) -> Result<Self> {
        if self.is_two_sided() {
            return Ok(self.clone());
        }
        if self.omegas.first().map_or(true, |w| *w <= 0.0) {
            return Err(ImpedanceError::input(
                "only strictly positive spectra can be mirrored",
            ));
        }
        let omegas = self
            .omegas
            .iter()
            .rev()
            .map(|w| -w)
            .chain(self.omegas.iter().copied())
            .collect();
        let values = self
            .values
            .iter()
            .rev()
            .map(|z| z.conj())
            .chain(self.values.iter().copied())
            .collect();
        Ok(Self {
            plane: self.plane,
            omegas,
            values,
        })
    }

    /// Checks Z(-ω) = conj(Z(ω)) on a two-sided spectrum.
    ///
    /// The deviation of each pair is measured relative to the largest magnitude
    /// in the spectrum.
    pub fn check_conjugate_symmetry(&self, tolerance: Scalar) -> Result<()> {
        if !self.is_two_sided() {
            return Err(ImpedanceError::input(
                "conjugate symmetry needs a two-sided frequency grid",
            ));
        }
        let scale = self.values.iter().map(|z| z.norm()).fold(0.0, Scalar::max);
        let n = self.len();
        for i in 0..n / 2 {
            let (neg, pos) = (self.values[i], self.values[n - 1 - i]);
            let deviation = (neg - pos.conj()).norm();
            if !(deviation <= tolerance * scale) {
                return Err(ImpedanceError::input(format!(
                    "spectrum is not conjugate symmetric at omega = {:e}: \
                     |Z(-w) - conj Z(w)| = {deviation:e} exceeds {tolerance:e} x {scale:e}",
                    self.omegas[n - 1 - i]
                )));
            }
        }
        if n % 2 == 1 && self.values[n / 2].im.abs() > tolerance * scale {
            return Err(ImpedanceError::input(
                "impedance at omega = 0 must be real",
            ));
        }
        Ok(())
    }

    /// Non-negative half after Hermitian symmetrisation,
    /// Z_h(ω) = (Z(ω) + conj Z(-ω)) / 2. A zero sample becomes real. One-sided
    /// spectra pass through without their negative samples.
    #[must_use]
    pub fn hermitian_half(&self) -> (Vec<Scalar>, Vec<CScalar>) {
        if !self.is_two_sided() {
            return self
                .omegas
                .iter()
                .zip(&self.values)
                .filter(|(w, _)| **w >= 0.0)
                .map(|(w, z)| (*w, *z))
                .unzip();
        }
        let n = self.len();
        (n / 2..n)
            .map(|k| {
                let mirror = n - 1 - k;
                debug_assert!(mirrors(self.omegas[mirror], self.omegas[k]));
                (self.omegas[k], (self.values[k] + self.values[mirror].conj()) * 0.5)
            })
            .unzip()
    }
}
