//! ABCD two-port representation of a wall layer.
//!
//! Port 1 faces the beam, port 2 faces the outside of the wall. The matrix maps
//! the (E, H) tangential fields at the outer face of a layer to those at its inner
//! face.

use num_complex::Complex;

use crate::math::{is_finite, CScalar};

/// Field transfer matrix `[[a, b], [c, d]]` of one or more stacked layers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoPort {
    /// E_in / E_out with the outer face open (H_out = 0).
    pub a: CScalar,
    /// Transfer impedance (Ω).
    pub b: CScalar,
    /// Transfer admittance (S).
    pub c: CScalar,
    /// H_in / H_out with the outer face shorted (E_out = 0).
    pub d: CScalar,
}

impl TwoPort {
    /// Identity two-port (zero-thickness layer): [[1, 0], [0, 1]].
    #[must_use]
    pub fn identity() -> Self {
        let one = Complex::new(1.0, 0.0);
        let zero = Complex::new(0.0, 0.0);
        Self {
            a: one,
            b: zero,
            c: zero,
            d: one,
        }
    }

    /// Uniform line section of characteristic impedance `zc` and electrical length
    /// `gamma_l` (propagation constant times thickness).
    #[must_use]
    pub fn line_section(zc: CScalar, gamma_l: CScalar) -> Self {
        let (ch, sh) = (gamma_l.cosh(), gamma_l.sinh());
        Self {
            a: ch,
            b: zc * sh,
            c: sh / zc,
            d: ch,
        }
    }

    /// `ad - bc`; one for any stack of passive layers.
    #[must_use]
    pub fn determinant(&self) -> CScalar {
        self.a * self.d - self.b * self.c
    }

    /// `self` on the beam side, `rhs` outside it.
    #[must_use]
    pub fn cascade(&self, rhs: &Self) -> Self {
        Self {
            a: self.a * rhs.a + self.b * rhs.c,
            b: self.a * rhs.b + self.b * rhs.d,
            c: self.c * rhs.a + self.d * rhs.c,
            d: self.c * rhs.b + self.d * rhs.d,
        }
    }

    /// E/H at the inner face when the outer face sees `z_load`.
    #[must_use]
    pub fn input_impedance(&self, z_load: CScalar) -> CScalar {
        (self.a * z_load + self.b) / (self.c * z_load + self.d)
    }

    /// False once any element has overflowed or turned into NaN.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        [self.a, self.b, self.c, self.d].into_iter().all(is_finite)
    }
}
