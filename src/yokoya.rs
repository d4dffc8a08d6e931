//! Round-pipe to beam-coupling impedance conversion with chamber shape factors.
//!
//! The solver returns a surface impedance for a circular pipe of radius b. The
//! beam-coupling impedance over an interaction length L is
//!
//! ```text
//! Z_long = L Z_s / (2 π b)                          (m = 0)
//! Z_m    = c L Z_s / (π |ω| b^(2m+1))               (m ≥ 1)
//! ```
//!
//! and is then scaled by Yokoya's form factors for non-circular chambers. For the
//! dipole mode the form factors also produce the detuning (quadrupolar)
//! components, which vanish in a circular pipe.
//!
//! Transverse impedances use |ω| so a two-sided spectrum satisfies
//! Z(-ω) = conj(Z(ω)) in every plane; the wake transform reads only the
//! positive-frequency half.

use std::f64::consts::PI;
use std::sync::OnceLock;

use crate::constants::SPEED_OF_LIGHT;
use crate::errors::{ImpedanceError, Result};
use crate::interpolation::CubicSpline;
use crate::math::{CScalar, Scalar};
use crate::mode::{Mode, Plane};
use crate::solver::surface_impedance;
use crate::wall::Wall;

/// Cross-section of the vacuum chamber.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ChamberShape {
    /// Round pipe (reference geometry, all form factors are identity).
    #[default]
    Circular,
    /// Two infinite parallel plates at ±b.
    FlatPlates,
    /// Ellipse with horizontal/vertical semi-axis ratio `aspect_ratio` ≥ 1 and
    /// vertical semi-axis b.
    Elliptical {
        /// Horizontal over vertical semi-axis.
        aspect_ratio: Scalar,
    },
}

impl ChamberShape {
    /// Parses a shape selector: `circular`/`round`, `flat`/`parallel_plates`,
    /// or `elliptical`/`elliptic` (which requires an aspect ratio).
    pub fn from_selector(name: &str, aspect_ratio: Option<Scalar>) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "circular" | "round" | "cylindrical" => Ok(Self::Circular),
            "flat" | "parallel_plates" | "parallel-plates" | "plates" => Ok(Self::FlatPlates),
            "elliptical" | "elliptic" | "ellipse" => match aspect_ratio {
                Some(aspect_ratio) => Ok(Self::Elliptical { aspect_ratio }),
                None => Err(ImpedanceError::config(
                    "elliptical chamber requires an aspect ratio",
                )),
            },
            other => Err(ImpedanceError::config(format!(
                "unknown chamber shape '{other}'"
            ))),
        }
    }

    /// Yokoya's flatness parameter q = (a - b) / (a + b).
    pub fn flatness(&self) -> Result<Scalar> {
        match *self {
            Self::Circular => Ok(0.0),
            Self::FlatPlates => Ok(1.0),
            Self::Elliptical { aspect_ratio } => {
                if !(aspect_ratio.is_finite() && aspect_ratio >= 1.0) {
                    return Err(ImpedanceError::config(format!(
                        "elliptical aspect ratio must be finite and ≥ 1 \
                         (swap the planes for tall chambers), got {aspect_ratio}"
                    )));
                }
                Ok((aspect_ratio - 1.0) / (aspect_ratio + 1.0))
            }
        }
    }
}

/// Dimensionless Yokoya form factors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeFactors {
    /// Longitudinal factor.
    pub longitudinal: Scalar,
    /// Horizontal driving (dipolar) factor.
    pub driving_x: Scalar,
    /// Vertical driving (dipolar) factor.
    pub driving_y: Scalar,
    /// Horizontal detuning (quadrupolar) factor.
    pub detuning_x: Scalar,
    /// Vertical detuning (quadrupolar) factor.
    pub detuning_y: Scalar,
}

impl ShapeFactors {
    /// Round pipe.
    pub const CIRCULAR: Self = Self {
        longitudinal: 1.0,
        driving_x: 1.0,
        driving_y: 1.0,
        detuning_x: 0.0,
        detuning_y: 0.0,
    };

    /// Parallel plates (closed form, Yokoya 1993).
    pub const FLAT: Self = Self {
        longitudinal: 1.0,
        driving_x: PI * PI / 24.0,
        driving_y: PI * PI / 12.0,
        detuning_x: -PI * PI / 24.0,
        detuning_y: PI * PI / 24.0,
    };
}

/// Elliptical-chamber factors versus q: `[q, long, driving_x, driving_y, detuning_x, detuning_y]`.
///
/// Digitised from Yokoya, Part. Accel. 41 (1993) 221; the end rows are the exact
/// circular and parallel-plate limits.
const ELLIPTICAL_TABLE: [[Scalar; 6]; 21] = [
    [0.00, 1.000, 1.000, 1.000, 0.000, 0.000],
    [0.05, 1.000, 0.961, 1.003, -0.039, 0.039],
    [0.10, 1.001, 0.924, 1.006, -0.076, 0.076],
    [0.15, 1.002, 0.887, 1.008, -0.111, 0.111],
    [0.20, 1.004, 0.851, 1.009, -0.144, 0.144],
    [0.25, 1.006, 0.816, 1.008, -0.175, 0.175],
    [0.30, 1.009, 0.781, 1.005, -0.203, 0.203],
    [0.35, 1.012, 0.748, 1.000, -0.229, 0.229],
    [0.40, 1.015, 0.715, 0.993, -0.253, 0.253],
    [0.45, 1.018, 0.683, 0.984, -0.275, 0.275],
    [0.50, 1.021, 0.652, 0.973, -0.295, 0.295],
    [0.55, 1.024, 0.621, 0.960, -0.313, 0.313],
    [0.60, 1.026, 0.592, 0.946, -0.329, 0.329],
    [0.65, 1.027, 0.563, 0.930, -0.343, 0.343],
    [0.70, 1.027, 0.535, 0.913, -0.356, 0.356],
    [0.75, 1.026, 0.509, 0.895, -0.367, 0.367],
    [0.80, 1.023, 0.484, 0.877, -0.377, 0.377],
    [0.85, 1.018, 0.460, 0.859, -0.389, 0.389],
    [0.90, 1.012, 0.440, 0.843, -0.398, 0.398],
    [0.95, 1.006, 0.424, 0.831, -0.406, 0.406],
    [1.00, 1.000, 0.411_233_516, 0.822_467_033, -0.411_233_516, 0.411_233_516],
];

/// Shape factors interpolated over q with natural cubic splines.
#[derive(Debug, Clone)]
pub struct YokoyaTable {
    longitudinal: CubicSpline,
    driving_x: CubicSpline,
    driving_y: CubicSpline,
    detuning_x: CubicSpline,
    detuning_y: CubicSpline,
}

static BUILTIN: OnceLock<YokoyaTable> = OnceLock::new();

impl YokoyaTable {
    /// Process-wide elliptical table, built on first use and shared read-only.
    pub fn builtin() -> &'static Self {
        BUILTIN.get_or_init(|| Self::from_sorted_rows(&ELLIPTICAL_TABLE))
    }

    /// Builds a table from `[q, long, driving_x, driving_y, detuning_x, detuning_y]`
    /// rows. The first row must be the circular limit q = 0 with identity factors.
    pub fn from_rows(rows: &[[Scalar; 6]]) -> Result<Self> {
        if rows.len() < 2 {
            return Err(ImpedanceError::config("Yokoya table needs at least two rows"));
        }
        let first = rows[0];
        let circular = [0.0, 1.0, 1.0, 1.0, 0.0, 0.0];
        if first != circular {
            return Err(ImpedanceError::config(
                "Yokoya table must start with the circular row 0, 1, 1, 1, 0, 0",
            ));
        }
        if rows.iter().flatten().any(|v| !v.is_finite()) {
            return Err(ImpedanceError::config("Yokoya table contains non-finite values"));
        }
        if rows.windows(2).any(|w| w[1][0] <= w[0][0]) {
            return Err(ImpedanceError::config(
                "Yokoya table q column must be strictly increasing",
            ));
        }
        if rows[rows.len() - 1][0] > 1.0 {
            return Err(ImpedanceError::config("Yokoya table q column must stay within [0, 1]"));
        }
        Ok(Self::from_sorted_rows(rows))
    }

    /// Parses comma- or whitespace-separated text with six columns per row.
    /// Blank lines, `#` comments and a non-numeric header line are skipped.
    pub fn from_csv(text: &str) -> Result<Self> {
        let mut rows = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let fields: Vec<&str> = line
                .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
                .filter(|f| !f.is_empty())
                .collect();
            let parsed: std::result::Result<Vec<Scalar>, _> =
                fields.iter().map(|f| f.parse::<Scalar>()).collect();
            match parsed {
                Ok(values) if values.len() == 6 => {
                    let mut row = [0.0; 6];
                    row.copy_from_slice(&values);
                    rows.push(row);
                }
                Ok(values) => {
                    return Err(ImpedanceError::config(format!(
                        "Yokoya table line {}: expected 6 columns, found {}",
                        lineno + 1,
                        values.len()
                    )));
                }
                Err(_) if rows.is_empty() => {
                    log::debug!("skipping Yokoya table header: {line}");
                }
                Err(e) => {
                    return Err(ImpedanceError::config(format!(
                        "Yokoya table line {}: {e}",
                        lineno + 1
                    )));
                }
            }
        }
        Self::from_rows(&rows)
    }

    fn from_sorted_rows(rows: &[[Scalar; 6]]) -> Self {
        let q: Vec<Scalar> = rows.iter().map(|r| r[0]).collect();
        let column = |k: usize| {
            CubicSpline::from_sorted(q.clone(), rows.iter().map(|r| r[k]).collect())
        };
        Self {
            longitudinal: column(1),
            driving_x: column(2),
            driving_y: column(3),
            detuning_x: column(4),
            detuning_y: column(5),
        }
    }

    /// Largest tabulated flatness.
    #[must_use]
    pub fn q_max(&self) -> Scalar {
        self.longitudinal.x_max()
    }

    /// Form factors for `shape`.
    pub fn factors(&self, shape: ChamberShape) -> Result<ShapeFactors> {
        match shape {
            ChamberShape::Circular => Ok(ShapeFactors::CIRCULAR),
            ChamberShape::FlatPlates => Ok(ShapeFactors::FLAT),
            ChamberShape::Elliptical { .. } => {
                let q = shape.flatness()?;
                if q > self.q_max() {
                    return Err(ImpedanceError::config(format!(
                        "flatness q = {q:.4} is outside the tabulated range [0, {:.4}]",
                        self.q_max()
                    )));
                }
                Ok(ShapeFactors {
                    longitudinal: self.longitudinal.evaluate(q),
                    driving_x: self.driving_x.evaluate(q),
                    driving_y: self.driving_y.evaluate(q),
                    detuning_x: self.detuning_x.evaluate(q),
                    detuning_y: self.detuning_y.evaluate(q),
                })
            }
        }
    }
}

/// Transverse beam-coupling impedance components (Ω/m for the dipole).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransverseImpedance {
    /// Horizontal driving impedance.
    pub driving_x: CScalar,
    /// Vertical driving impedance.
    pub driving_y: CScalar,
    /// Horizontal detuning impedance.
    pub detuning_x: CScalar,
    /// Vertical detuning impedance.
    pub detuning_y: CScalar,
}

/// Beam-coupling impedance of one mode at one frequency.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BeamImpedance {
    /// Monopole (Ω).
    Longitudinal(CScalar),
    /// Dipole and higher multipoles.
    Transverse(TransverseImpedance),
}

impl BeamImpedance {
    /// Component in `plane`, if this impedance has one.
    #[must_use]
    pub fn component(&self, plane: Plane) -> Option<CScalar> {
        match (self, plane) {
            (Self::Longitudinal(z), Plane::Longitudinal) => Some(*z),
            (Self::Transverse(t), Plane::DrivingX) => Some(t.driving_x),
            (Self::Transverse(t), Plane::DrivingY) => Some(t.driving_y),
            (Self::Transverse(t), Plane::DetuningX) => Some(t.detuning_x),
            (Self::Transverse(t), Plane::DetuningY) => Some(t.detuning_y),
            _ => None,
        }
    }

    /// Complex conjugate of every component, i.e. the value at -ω.
    #[must_use]
    pub fn conj(&self) -> Self {
        match self {
            Self::Longitudinal(z) => Self::Longitudinal(z.conj()),
            Self::Transverse(t) => Self::Transverse(TransverseImpedance {
                driving_x: t.driving_x.conj(),
                driving_y: t.driving_y.conj(),
                detuning_x: t.detuning_x.conj(),
                detuning_y: t.detuning_y.conj(),
            }),
        }
    }
}

/// Round-pipe beam-coupling impedance for mode `mode` from a surface impedance.
#[must_use]
pub fn round_pipe_impedance(
    surface: CScalar,
    radius: Scalar,
    length: Scalar,
    omega: Scalar,
    mode: Mode,
) -> CScalar {
    match mode.index() {
        0 => surface * (length / (2.0 * PI * radius)),
        _ => {
            let exponent = mode.radial_exponent().unwrap_or(i32::MAX);
            surface * (SPEED_OF_LIGHT * length / (PI * omega.abs() * radius.powi(exponent)))
        }
    }
}

/// Converts round-pipe surface impedances into beam-coupling impedances for a chamber shape.
#[derive(Debug, Clone, Copy)]
pub struct ShapeCorrector<'t> {
    shape: ChamberShape,
    table: &'t YokoyaTable,
}

impl ShapeCorrector<'static> {
    /// Corrector backed by the builtin table.
    #[must_use]
    pub fn new(shape: ChamberShape) -> Self {
        Self {
            shape,
            table: YokoyaTable::builtin(),
        }
    }
}

impl<'t> ShapeCorrector<'t> {
    /// Corrector backed by a caller-supplied table.
    #[must_use]
    pub const fn with_table(shape: ChamberShape, table: &'t YokoyaTable) -> Self {
        Self { shape, table }
    }

    /// Chamber shape.
    #[must_use]
    pub const fn shape(&self) -> ChamberShape {
        self.shape
    }

    /// Form factors applied to `mode`: `(x, y)` driving factors, or `(long, long)` for m = 0.
    ///
    /// Identity in a circular chamber for every mode. Non-circular chambers are only
    /// tabulated for m ≤ 1.
    pub fn mode_factors(&self, mode: Mode) -> Result<(Scalar, Scalar)> {
        if mode.radial_exponent().is_none() {
            return Err(ImpedanceError::config(format!(
                "mode m={} is beyond the highest supported multipole",
                mode.index()
            )));
        }
        let f = self.table.factors(self.shape)?;
        match mode.index() {
            0 => Ok((f.longitudinal, f.longitudinal)),
            1 => Ok((f.driving_x, f.driving_y)),
            _ if self.shape == ChamberShape::Circular => Ok((1.0, 1.0)),
            m => Err(ImpedanceError::config(format!(
                "no shape factors for mode m={m} in a {:?} chamber",
                self.shape
            ))),
        }
    }

    /// Beam-coupling impedance from an already computed surface impedance.
    pub fn correct(
        &self,
        surface: CScalar,
        radius: Scalar,
        length: Scalar,
        omega: Scalar,
        mode: Mode,
    ) -> Result<BeamImpedance> {
        let round = round_pipe_impedance(surface, radius, length, omega, mode);
        let (fx, fy) = self.mode_factors(mode)?;
        let out = match mode.index() {
            0 => BeamImpedance::Longitudinal(round * fx),
            1 => {
                let f = self.table.factors(self.shape)?;
                BeamImpedance::Transverse(TransverseImpedance {
                    driving_x: round * fx,
                    driving_y: round * fy,
                    detuning_x: round * f.detuning_x,
                    detuning_y: round * f.detuning_y,
                })
            }
            _ => BeamImpedance::Transverse(TransverseImpedance {
                driving_x: round * fx,
                driving_y: round * fy,
                detuning_x: CScalar::new(0.0, 0.0),
                detuning_y: CScalar::new(0.0, 0.0),
            }),
        };
        Ok(out)
    }

    /// Solves the wall and applies the correction in one step.
    pub fn evaluate(&self, wall: &Wall, omega: Scalar, mode: Mode) -> Result<BeamImpedance> {
        self.mode_factors(mode)?;
        let surface = surface_impedance(wall, omega, mode)?;
        let z = self.correct(surface, wall.radius(), wall.length(), omega, mode)?;
        let finite = mode
            .planes()
            .iter()
            .filter_map(|p| z.component(*p))
            .all(crate::math::is_finite);
        if !finite {
            return Err(ImpedanceError::unstable(omega, "beam-coupling impedance overflowed"));
        }
        Ok(z)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use num_complex::Complex;

    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn circular_factor_is_identity_for_every_mode() {
        let corrector = ShapeCorrector::new(ChamberShape::Circular);
        for m in 0..6 {
            assert_eq!(corrector.mode_factors(Mode(m)).unwrap(), (1.0, 1.0));
        }
        let f = YokoyaTable::builtin()
            .factors(ChamberShape::Elliptical { aspect_ratio: 1.0 })
            .unwrap();
        assert_eq!(f, ShapeFactors::CIRCULAR);
    }

    #[test]
    fn flat_limit_matches_closed_form() {
        let table = YokoyaTable::builtin();
        let f = table.factors(ChamberShape::FlatPlates).unwrap();
        assert_relative_eq!(f.driving_y, PI * PI / 12.0, epsilon = 1e-12);
        let nearly_flat = table
            .factors(ChamberShape::Elliptical { aspect_ratio: 1.0e9 })
            .unwrap();
        assert_relative_eq!(nearly_flat.driving_x, PI * PI / 24.0, epsilon = 1e-6);
        assert_relative_eq!(nearly_flat.detuning_y, PI * PI / 24.0, epsilon = 1e-6);
    }

    #[test]
    fn detuning_factors_cancel_between_planes() {
        let f = YokoyaTable::builtin()
            .factors(ChamberShape::Elliptical { aspect_ratio: 2.3 })
            .unwrap();
        assert_relative_eq!(f.detuning_x, -f.detuning_y, epsilon = 1e-12);
        assert!(f.driving_x < f.driving_y);
    }

    #[test]
    fn unknown_selector_and_bad_aspect_ratio_are_configuration_errors() {
        let err = ChamberShape::from_selector("hexagonal", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
        let err = YokoyaTable::builtin()
            .factors(ChamberShape::Elliptical { aspect_ratio: 0.5 })
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
        assert_eq!(
            ChamberShape::from_selector(" Round ", None).unwrap(),
            ChamberShape::Circular
        );
    }

    #[test]
    fn custom_table_range_is_enforced() {
        let table = YokoyaTable::from_csv(
            "q,long,dx,dy,qx,qy\n0,1,1,1,0,0\n0.2,1.004,0.851,1.009,-0.144,0.144\n",
        )
        .unwrap();
        assert_relative_eq!(table.q_max(), 0.2, epsilon = 1e-15);
        let err = table
            .factors(ChamberShape::Elliptical { aspect_ratio: 3.0 })
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
        let corrector = ShapeCorrector::with_table(ChamberShape::Elliptical { aspect_ratio: 1.2 }, &table);
        assert!(corrector.mode_factors(Mode::DIPOLE).is_ok());
    }

    #[test]
    fn higher_modes_need_a_circular_chamber() {
        let corrector = ShapeCorrector::new(ChamberShape::FlatPlates);
        let err = corrector.mode_factors(Mode::QUADRUPOLE).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    }

    #[test]
    fn absurd_mode_numbers_are_configuration_errors() {
        let corrector = ShapeCorrector::new(ChamberShape::Circular);
        let err = corrector.mode_factors(Mode(3_000_000_000)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);

        let wall = Wall::new(
            0.025,
            1.0,
            vec![crate::wall::Layer::semi_infinite(crate::materials::MaterialProperties::conductor(1.0e6))],
        )
        .unwrap();
        let err = corrector.evaluate(&wall, 1.0e6, Mode(u32::MAX)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
        let z = round_pipe_impedance(Complex::new(1.0, 1.0), 0.5, 1.0, 1.0e6, Mode(u32::MAX));
        assert!(!crate::math::is_finite(z));
    }

    #[test]
    fn round_pipe_prefactors() {
        let zs = Complex::new(1.0e-3, 1.0e-3);
        let (b, l, omega) = (0.02, 2.0, 1.0e7);
        let zl = round_pipe_impedance(zs, b, l, omega, Mode::LONGITUDINAL);
        assert_relative_eq!(zl.re, 1.0e-3 * l / (2.0 * PI * b), max_relative = 1e-12);
        let zt = round_pipe_impedance(zs, b, l, omega, Mode::DIPOLE);
        // Classic relation Z_⊥ = 2c / (ω b²) · Z_∥.
        assert_relative_eq!(zt.re, 2.0 * SPEED_OF_LIGHT / (omega * b * b) * zl.re, max_relative = 1e-12);
        let zt_neg = round_pipe_impedance(zs.conj(), b, l, -omega, Mode::DIPOLE);
        assert_relative_eq!((zt_neg - zt.conj()).norm(), 0.0, epsilon = 1e-12);
    }
}
