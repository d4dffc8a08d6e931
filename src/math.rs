//! Shared numerical primitives for complex-valued wall calculations.

use num_complex::Complex;

/// Primary scalar type used across the crate.
pub type Scalar = f64;
/// Primary complex scalar type used for phasors and impedances.
pub type CScalar = Complex<Scalar>;

/// Imaginary unit `j`.
pub const J: CScalar = Complex::new(0.0, 1.0);

/// Square root on the branch with non-negative real part.
///
/// `num_complex` already returns the principal root, but values sitting exactly on
/// the negative real axis with a `-0.0` imaginary part come back with the sign of
/// the imaginary part flipped; normalise so the returned root always decays.
#[must_use]
pub fn decaying_sqrt(z: CScalar) -> CScalar {
    let root = z.sqrt();
    if root.re < 0.0 {
        -root
    } else {
        root
    }
}

/// Returns `exp(-2 z)` for `Re(z) >= 0`, flushing to zero instead of producing
/// denormals for very lossy layers.
#[must_use]
pub fn decaying_exp2(z: CScalar) -> CScalar {
    // e^-745 underflows in f64
    if 2.0 * z.re > 700.0 {
        return Complex::new(0.0, 0.0);
    }
    (-2.0 * z).exp()
}

/// True when both components are finite.
#[inline]
#[must_use]
pub fn is_finite(z: CScalar) -> bool {
    z.re.is_finite() && z.im.is_finite()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn decaying_sqrt_keeps_positive_real_part() {
        for z in [
            Complex::new(-1.0, -0.0),
            Complex::new(-4.0, 1e-300),
            Complex::new(0.0, -2.0),
            Complex::new(3.0, 4.0),
        ] {
            let r = decaying_sqrt(z);
            assert!(r.re >= 0.0, "root of {z} has negative real part: {r}");
            assert_relative_eq!((r * r - z).norm(), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn decaying_exp_flushes_for_thick_lossy_layers() {
        assert_eq!(decaying_exp2(Complex::new(1.0e6, 3.0)), Complex::new(0.0, 0.0));
        let e = decaying_exp2(Complex::new(0.5, 0.0));
        assert_relative_eq!(e.re, (-1.0f64).exp(), epsilon = 1e-15);
    }
}
