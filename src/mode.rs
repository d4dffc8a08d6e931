//! Azimuthal modes and impedance planes.

use std::fmt;

/// Azimuthal mode index m (0 = monopole/longitudinal, 1 = dipole, 2 = quadrupole, ...).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Mode(pub u32);

impl Mode {
    /// m = 0.
    pub const LONGITUDINAL: Self = Self(0);
    /// m = 1.
    pub const DIPOLE: Self = Self(1);
    /// m = 2.
    pub const QUADRUPOLE: Self = Self(2);

    /// The azimuthal index.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }

    /// True for the monopole.
    #[must_use]
    pub const fn is_longitudinal(self) -> bool {
        self.0 == 0
    }

    /// Power 2m + 1 of the radius in the round-pipe prefactor; `None` once it
    /// no longer fits an `i32`.
    #[must_use]
    pub fn radial_exponent(self) -> Option<i32> {
        self.0
            .checked_mul(2)
            .and_then(|v| v.checked_add(1))
            .and_then(|v| i32::try_from(v).ok())
    }

    /// Planes an impedance for this mode is reported in.
    #[must_use]
    pub const fn planes(self) -> &'static [Plane] {
        match self.0 {
            0 => &[Plane::Longitudinal],
            1 => &[
                Plane::DrivingX,
                Plane::DrivingY,
                Plane::DetuningX,
                Plane::DetuningY,
            ],
            _ => &[Plane::DrivingX, Plane::DrivingY],
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0 => write!(f, "longitudinal"),
            1 => write!(f, "dipole"),
            2 => write!(f, "quadrupole"),
            m => write!(f, "m={m}"),
        }
    }
}

impl From<u32> for Mode {
    fn from(m: u32) -> Self {
        Self(m)
    }
}

/// Component of a beam-coupling impedance.
///
/// The driving components follow the displacement of the source; the detuning
/// components (non-zero only for non-circular chambers) follow the displacement
/// of the witness.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Plane {
    /// Longitudinal impedance (Ω).
    Longitudinal,
    /// Horizontal driving impedance.
    DrivingX,
    /// Vertical driving impedance.
    DrivingY,
    /// Horizontal detuning impedance.
    DetuningX,
    /// Vertical detuning impedance.
    DetuningY,
}

impl Plane {
    /// True for the longitudinal plane.
    #[must_use]
    pub const fn is_longitudinal(self) -> bool {
        matches!(self, Self::Longitudinal)
    }

    /// Short column label used by the CSV writers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Longitudinal => "long",
            Self::DrivingX => "driving_x",
            Self::DrivingY => "driving_y",
            Self::DetuningX => "detuning_x",
            Self::DetuningY => "detuning_y",
        }
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
