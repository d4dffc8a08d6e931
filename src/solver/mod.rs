//! Multilayer surface impedance solver.
//!
//! Each layer is a radial transmission line. Starting from the wave impedance of
//! the outermost medium, the impedance seen through every finite layer is folded
//! in from the outside toward the beam:
//!
//! ```text
//! Z_{i} = Z_c,i [Z_{i+1} (1 + e_i) + Z_c,i (1 - e_i)] / [Z_c,i (1 + e_i) + Z_{i+1} (1 - e_i)]
//! e_i   = exp(-2 γ_i t_i)
//! ```
//!
//! The recursion is a plain loop carrying the running impedance, so it never
//! overflows for thick lossy layers and each frequency sample is independent.
//!
//! The azimuthal mode enters through γ_m² = γ² + (m/b)², evaluated at the
//! beam-pipe radius b for every layer. Stacking two layers of the same material
//! therefore gives exactly the impedance of one thicker layer, in every mode.
//!
//! # Preconditions
//!
//! `omega` must be finite and non-zero. The monopole impedance of a resistive wall
//! behaves like 1/√ω toward DC; query a small positive frequency instead of zero.

mod line;

pub use line::{modal_wave, RadialLine};

use num_complex::Complex;

use crate::errors::{ImpedanceError, Result};
use crate::materials::Medium;
use crate::math::{is_finite, CScalar, Scalar};
use crate::mode::Mode;
use crate::twoport::TwoPort;
use crate::wall::{Layer, Wall};

/// Rejects the frequencies the solver cannot evaluate.
pub fn check_frequency(omega: Scalar) -> Result<()> {
    if !omega.is_finite() {
        return Err(ImpedanceError::input(format!(
            "angular frequency must be finite, got {omega}"
        )));
    }
    if omega == 0.0 {
        return Err(ImpedanceError::input(
            "angular frequency must be non-zero (the DC limit is singular)",
        ));
    }
    Ok(())
}

/// Wave impedance of the outermost medium for the mode seen at `radius`.
fn termination_impedance(layer: &Layer, omega: Scalar, mode: Mode, radius: Scalar) -> Result<CScalar> {
    let z = match layer.material.medium(omega) {
        Medium::PerfectConductor => Complex::new(0.0, 0.0),
        Medium::Lossy(response) => modal_wave(&response, omega, mode, radius).1,
    };
    if !is_finite(z) {
        return Err(ImpedanceError::unstable(
            omega,
            "outer medium has a vanishing propagation constant",
        ));
    }
    Ok(z)
}

/// Complex surface impedance E_z / H_φ (Ω) at the inner wall surface.
pub fn surface_impedance(wall: &Wall, omega: Scalar, mode: Mode) -> Result<CScalar> {
    check_frequency(omega)?;

    let radius = wall.radius();
    let outer = wall.termination();
    let mut z = termination_impedance(&outer, omega, mode, radius)?;

    for (i, (layer, thickness)) in wall.finite_layers().enumerate().rev() {
        z = match layer.material.medium(omega) {
            Medium::PerfectConductor => Complex::new(0.0, 0.0),
            Medium::Lossy(response) => {
                RadialLine::for_layer(&response, omega, mode, radius, thickness).input_impedance(z)
            }
        };
        if !is_finite(z) {
            return Err(ImpedanceError::unstable(
                omega,
                format!("impedance recursion diverged at layer {i}"),
            ));
        }
        log::trace!("omega={omega:e} {mode}: layer {i} -> Z = {z}");
    }

    Ok(z)
}

/// Cascaded ABCD description of the finite layers plus the termination they see.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerTransfer {
    /// Product of the layer two-ports, innermost first.
    pub matrix: TwoPort,
    /// Impedance terminating the cascade.
    pub termination: CScalar,
}

impl LayerTransfer {
    /// Surface impedance obtained by terminating the cascade.
    #[must_use]
    pub fn surface_impedance(&self) -> CScalar {
        self.matrix.input_impedance(self.termination)
    }
}

/// Transfer matrix of the wall at one frequency and mode.
///
/// Equivalent to [`surface_impedance`] but built from cosh/sinh products, which
/// overflow once a layer is a few hundred skin depths thick; that case is reported
/// as [`ImpedanceError::NumericalInstability`]. A perfectly conducting layer ends
/// the cascade: it becomes a zero termination and hides everything outside it.
pub fn transfer_matrix(wall: &Wall, omega: Scalar, mode: Mode) -> Result<LayerTransfer> {
    check_frequency(omega)?;

    let radius = wall.radius();
    let mut matrix = TwoPort::identity();
    for (i, (layer, thickness)) in wall.finite_layers().enumerate() {
        match layer.material.medium(omega) {
            Medium::PerfectConductor => {
                return Ok(LayerTransfer {
                    matrix,
                    termination: Complex::new(0.0, 0.0),
                });
            }
            Medium::Lossy(response) => {
                let section = RadialLine::for_layer(&response, omega, mode, radius, thickness);
                matrix = matrix.cascade(&section.to_twoport());
            }
        }
        if !matrix.is_finite() {
            return Err(ImpedanceError::unstable(
                omega,
                format!("transfer matrix overflowed at layer {i}"),
            ));
        }
    }

    let outer = wall.termination();
    let termination = termination_impedance(&outer, omega, mode, radius)?;
    Ok(LayerTransfer {
        matrix,
        termination,
    })
}
