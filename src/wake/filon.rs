//! Filon-type quadrature of oscillatory integrals over piecewise-linear data.
//!
//! The samples are joined by straight lines and each segment is integrated against
//! cos(xt) or sin(xt) in closed form, so the result stays accurate however many
//! periods a segment spans. That is what lets the transform run on log-spaced
//! grids whose last segments are many periods wide.

use crate::math::Scalar;

/// Oscillating factor of the integrand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Kernel {
    /// cos(x t)
    Cosine,
    /// sin(x t)
    Sine,
}

impl Kernel {
    fn eval(self, phase: Scalar) -> Scalar {
        match self {
            Self::Cosine => phase.cos(),
            Self::Sine => phase.sin(),
        }
    }
}

/// Below this |t h| the closed form cancels badly and Simpson's rule is used instead.
const SMALL_PHASE: Scalar = 1e-2;

/// ∫ f(x) k(x t) dx along the polyline through `(xs, fs)`.
pub(crate) fn integrate(xs: &[Scalar], fs: &[Scalar], t: Scalar, kernel: Kernel) -> Scalar {
    xs.windows(2)
        .zip(fs.windows(2))
        .map(|(x, f)| segment(x[0], x[1], f[0], f[1], t, kernel))
        .sum()
}

fn segment(a: Scalar, b: Scalar, fa: Scalar, fb: Scalar, t: Scalar, kernel: Kernel) -> Scalar {
    let h = b - a;
    if (t * h).abs() < SMALL_PHASE {
        let mid = 0.5 * (a + b);
        return h / 6.0
            * (fa * kernel.eval(a * t)
                + 2.0 * (fa + fb) * kernel.eval(mid * t)
                + fb * kernel.eval(b * t));
    }

    let slope = (fb - fa) / h;
    let (sa, ca) = (a * t).sin_cos();
    let (sb, cb) = (b * t).sin_cos();
    match kernel {
        // d/dx [f sin(xt)/t + f' cos(xt)/t²] = f cos(xt)
        Kernel::Cosine => (fb * sb - fa * sa) / t + slope * (cb - ca) / (t * t),
        // d/dx [-f cos(xt)/t + f' sin(xt)/t²] = f sin(xt)
        Kernel::Sine => -(fb * cb - fa * ca) / t + slope * (sb - sa) / (t * t),
    }
}
