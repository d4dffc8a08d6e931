//! Radial transmission-line model of a single wall layer.

use num_complex::Complex;

use crate::materials::MaterialResponse;
use crate::math::{decaying_exp2, decaying_sqrt, CScalar, Scalar};
use crate::mode::Mode;
use crate::twoport::TwoPort;

/// Uniform line section standing in for one layer at one frequency and mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialLine {
    /// Characteristic impedance Z_c = jωμ / γ_m (Ω).
    pub characteristic_impedance: CScalar,
    /// Radial propagation constant γ_m (1/m), Re ≥ 0.
    pub propagation_constant: CScalar,
    /// Line length (layer thickness) in meters.
    pub thickness: Scalar,
}

impl RadialLine {
    /// Line for a layer of the given material response; `radius` sets the
    /// azimuthal wavenumber m / radius.
    #[must_use]
    pub fn for_layer(
        response: &MaterialResponse,
        omega: Scalar,
        mode: Mode,
        radius: Scalar,
        thickness: Scalar,
    ) -> Self {
        let (gamma, zc) = modal_wave(response, omega, mode, radius);
        Self {
            characteristic_impedance: zc,
            propagation_constant: gamma,
            thickness,
        }
    }

    /// Impedance looking into the line when the far end sees `z_load`.
    ///
    /// Written with `e = exp(-2γd)` instead of `tanh(γd)`:
    /// `Z_in = Z_c [Z_L (1 + e) + Z_c (1 - e)] / [Z_c (1 + e) + Z_L (1 - e)]`.
    /// `|e| ≤ 1` on the decaying branch, so thick lossy layers settle at `Z_c`
    /// instead of overflowing.
    #[must_use]
    pub fn input_impedance(&self, z_load: CScalar) -> CScalar {
        let zc = self.characteristic_impedance;
        let e = decaying_exp2(self.propagation_constant * self.thickness);
        let one = Complex::new(1.0, 0.0);
        let num = z_load * (one + e) + zc * (one - e);
        let den = zc * (one + e) + z_load * (one - e);
        zc * num / den
    }

    /// ABCD matrix of the section.
    #[must_use]
    pub fn to_twoport(&self) -> TwoPort {
        TwoPort::line_section(
            self.characteristic_impedance,
            self.propagation_constant * self.thickness,
        )
    }
}

/// Radial propagation constant and wave impedance of azimuthal mode `mode` at
/// radius `radius`.
///
/// The e^{jmφ} variation adds a transverse wavenumber m/r, so
/// γ_m² = jωμ(σ + jωε) + (m/r)². For m = 0 this is the plane-wave constant of the
/// medium.
#[must_use]
pub fn modal_wave(
    response: &MaterialResponse,
    omega: Scalar,
    mode: Mode,
    radius: Scalar,
) -> (CScalar, CScalar) {
    let series = response.impedivity(omega);
    let azimuthal = Scalar::from(mode.index()) / radius;
    let gamma = decaying_sqrt(series * response.admittivity(omega) + azimuthal * azimuthal);
    (gamma, series / gamma)
}
