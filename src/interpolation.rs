//! Interpolation over tabulated data.
//!
//! Two schemes are provided. [`CubicSpline`] gives smooth curves through the
//! knots (used for the Yokoya shape factors). [`linear_clamped`] is a convex
//! combination of neighbouring samples, so it can never leave the range of the
//! data; tabulated materials rely on that to keep Re σ ≥ 0 between samples.

use crate::errors::{ImpedanceError, Result};
use crate::math::{CScalar, Scalar};

/// A natural cubic spline through `(x_i, y_i)`.
///
/// Evaluations outside the knot range are clamped to the end values rather than
/// extrapolated with the boundary polynomial.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    xs: Vec<Scalar>,
    ys: Vec<Scalar>,
    /// Second derivatives at each knot.
    y2s: Vec<Scalar>,
}

impl CubicSpline {
    /// Builds a spline from strictly increasing `xs` and matching `ys`.
    pub fn new(xs: Vec<Scalar>, ys: Vec<Scalar>) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(ImpedanceError::input(format!(
                "spline knots and values differ in length ({} vs {})",
                xs.len(),
                ys.len()
            )));
        }
        if xs.len() < 2 {
            return Err(ImpedanceError::input("spline needs at least two knots"));
        }
        if let Some(i) = (1..xs.len()).find(|&i| !(xs[i] > xs[i - 1])) {
            return Err(ImpedanceError::input(format!(
                "spline knots must be strictly increasing (index {i})"
            )));
        }
        if xs.iter().chain(ys.iter()).any(|v| !v.is_finite()) {
            return Err(ImpedanceError::input("spline data must be finite"));
        }
        Ok(Self::from_sorted(xs, ys))
    }

    /// Builds a spline from data already known to be sorted, finite and paired.
    pub(crate) fn from_sorted(xs: Vec<Scalar>, ys: Vec<Scalar>) -> Self {
        let n = xs.len();
        let mut y2s = vec![0.0; n];
        let mut u = vec![0.0; n.saturating_sub(1)];

        // Forward sweep of the tridiagonal system for natural end conditions.
        for i in 1..n.saturating_sub(1) {
            let sig = (xs[i] - xs[i - 1]) / (xs[i + 1] - xs[i - 1]);
            let p = sig * y2s[i - 1] + 2.0;
            y2s[i] = (sig - 1.0) / p;
            u[i] = (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i])
                - (ys[i] - ys[i - 1]) / (xs[i] - xs[i - 1]);
            u[i] = (6.0 * u[i] / (xs[i + 1] - xs[i - 1]) - sig * u[i - 1]) / p;
        }

        for k in (0..n.saturating_sub(2)).rev() {
            y2s[k + 1] = y2s[k + 1] * y2s[k + 2] + u[k + 1];
        }

        Self { xs, ys, y2s }
    }

    /// Smallest knot.
    #[must_use]
    pub fn x_min(&self) -> Scalar {
        self.xs[0]
    }

    /// Largest knot.
    #[must_use]
    pub fn x_max(&self) -> Scalar {
        self.xs[self.xs.len() - 1]
    }

    /// Evaluates the spline at `x`. Knot values are reproduced exactly.
    #[must_use]
    pub fn evaluate(&self, x: Scalar) -> Scalar {
        let n = self.xs.len();
        if x <= self.xs[0] {
            return self.ys[0];
        }
        if x >= self.xs[n - 1] {
            return self.ys[n - 1];
        }

        let (lo, hi) = bracket(&self.xs, x);
        let h = self.xs[hi] - self.xs[lo];
        let a = (self.xs[hi] - x) / h;
        let b = (x - self.xs[lo]) / h;

        a * self.ys[lo]
            + b * self.ys[hi]
            + ((a * a * a - a) * self.y2s[lo] + (b * b * b - b) * self.y2s[hi]) * h * h / 6.0
    }
}

/// Piecewise-linear interpolation of complex samples, clamped to the end values.
///
/// `xs` must be strictly increasing and the same length as `ys` (non-empty).
#[must_use]
pub fn linear_clamped(xs: &[Scalar], ys: &[CScalar], x: Scalar) -> CScalar {
    let n = xs.len();
    if n == 1 || x <= xs[0] {
        return ys[0];
    }
    if x >= xs[n - 1] {
        return ys[n - 1];
    }
    let (lo, hi) = bracket(xs, x);
    let w = (x - xs[lo]) / (xs[hi] - xs[lo]);
    ys[lo] * (1.0 - w) + ys[hi] * w
}

/// Binary search for the interval `[xs[lo], xs[hi]]` containing `x`.
fn bracket(xs: &[Scalar], x: Scalar) -> (usize, usize) {
    let mut lo = 0;
    let mut hi = xs.len() - 1;
    while hi - lo > 1 {
        let mid = (lo + hi) / 2;
        if xs[mid] > x {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    (lo, hi)
}
