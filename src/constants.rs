//! SI constants and frequency/skin-depth conversions used by the wall solver.
//!
//! c is exact (SI 2019). ε₀ and μ₀ are the CODATA 2018 values; their relative
//! uncertainty (~1e-10) is negligible next to any tabulated conductivity.
//!
//! Reference: CODATA 2018, <https://physics.nist.gov/cuu/Constants/>

use std::f64::consts::PI;

/// ε₀ (F/m).
pub const VACUUM_PERMITTIVITY: f64 = 8.854_187_812_8e-12;
/// μ₀ (H/m).
pub const VACUUM_PERMEABILITY: f64 = 1.256_637_062_12e-6;
/// c (m/s).
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;
/// Z₀ = √(μ₀/ε₀) (Ω), the wave impedance of a vacuum outer boundary.
pub const FREE_SPACE_IMPEDANCE: f64 = 376.730_313_668;

/// ω = 2πf.
#[inline]
#[must_use]
pub fn angular_frequency(hz: f64) -> f64 {
    2.0 * PI * hz
}

/// f = ω / 2π.
#[inline]
#[must_use]
pub fn frequency_from_angular(omega: f64) -> f64 {
    omega / (2.0 * PI)
}

/// Classical skin depth δ = √(2 / (ω μ₀ μ_r σ)) in meters.
///
/// Only meaningful for good conductors (σ ≫ ω ε).
#[inline]
#[must_use]
pub fn skin_depth(omega: f64, conductivity: f64, relative_permeability: f64) -> f64 {
    (2.0 / (omega.abs() * VACUUM_PERMEABILITY * relative_permeability * conductivity)).sqrt()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn free_space_impedance_matches_constants() {
        let z0 = (VACUUM_PERMEABILITY / VACUUM_PERMITTIVITY).sqrt();
        assert_relative_eq!(z0, FREE_SPACE_IMPEDANCE, max_relative = 1.0e-9);
    }

    #[test]
    fn copper_skin_depth_at_one_megahertz() {
        // Textbook value: ~65 µm for σ = 5.96e7 S/m at 1 MHz.
        let delta = skin_depth(angular_frequency(1.0e6), 5.96e7, 1.0);
        assert_relative_eq!(delta, 65.2e-6, max_relative = 1.0e-2);
    }

    #[test]
    fn angular_frequency_roundtrips() {
        let f = 2.5e8;
        assert_relative_eq!(frequency_from_angular(angular_frequency(f)), f, max_relative = 1e-15);
    }
}
