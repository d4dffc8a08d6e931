//! Material property models and abstractions.
//!
//! Every model answers the same question: the complex conductivity σ(ω), relative
//! permittivity ε_r(ω) and relative permeability μ_r(ω) at a signed angular
//! frequency. All models return `conj(x(ω))` at `-ω`, which is what keeps the
//! assembled impedance spectra Hermitian.

use num_complex::Complex;

use crate::constants::{frequency_from_angular, VACUUM_PERMEABILITY, VACUUM_PERMITTIVITY};
use crate::errors::{ImpedanceError, Result};
use crate::interpolation::linear_clamped;
use crate::math::{decaying_sqrt, CScalar, Scalar, J};

/// Frequency-domain response of a material at one angular frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialResponse {
    /// Complex conductivity σ(ω) in S/m.
    pub conductivity: CScalar,
    /// Complex relative permittivity ε_r(ω).
    pub permittivity: CScalar,
    /// Complex relative permeability μ_r(ω).
    pub permeability: CScalar,
}

impl MaterialResponse {
    /// Shunt term σ + jωε₀ε_r of the medium (S/m).
    #[must_use]
    pub fn admittivity(&self, omega: Scalar) -> CScalar {
        self.conductivity + J * omega * VACUUM_PERMITTIVITY * self.permittivity
    }

    /// Series term jωμ₀μ_r of the medium (Ω/m).
    #[must_use]
    pub fn impedivity(&self, omega: Scalar) -> CScalar {
        J * omega * VACUUM_PERMEABILITY * self.permeability
    }

    /// Propagation constant γ = √(jωμ(σ + jωε)) on the decaying branch.
    #[must_use]
    pub fn propagation_constant(&self, omega: Scalar) -> CScalar {
        decaying_sqrt(self.impedivity(omega) * self.admittivity(omega))
    }

    /// Intrinsic wave impedance jωμ / γ of the unbounded medium.
    #[must_use]
    pub fn intrinsic_impedance(&self, omega: Scalar) -> CScalar {
        self.impedivity(omega) / self.propagation_constant(omega)
    }
}

/// Trait for frequency-dependent material models.
pub trait DispersiveMaterial {
    /// Returns the response at the signed angular frequency `omega` (rad/s).
    fn response(&self, omega: Scalar) -> MaterialResponse;
}

/// Linear isotropic material with frequency-independent parameters.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialProperties {
    /// DC conductivity σ in S/m.
    pub conductivity: Scalar,
    /// Real relative permittivity ε_r.
    pub permittivity: Scalar,
    /// Dielectric loss tangent tan δ.
    pub loss_tangent: Scalar,
    /// Real relative permeability μ_r.
    pub permeability: Scalar,
}

impl MaterialProperties {
    /// Creates validated material properties.
    pub fn new(
        conductivity: Scalar,
        permittivity: Scalar,
        loss_tangent: Scalar,
        permeability: Scalar,
    ) -> Result<Self> {
        let props = Self {
            conductivity,
            permittivity,
            loss_tangent,
            permeability,
        };
        props.validate()?;
        Ok(props)
    }

    /// Free space.
    #[must_use]
    pub const fn vacuum() -> Self {
        Self {
            conductivity: 0.0,
            permittivity: 1.0,
            loss_tangent: 0.0,
            permeability: 1.0,
        }
    }

    /// Non-magnetic conductor with conductivity `sigma` (S/m).
    #[must_use]
    pub const fn conductor(sigma: Scalar) -> Self {
        Self {
            conductivity: sigma,
            ..Self::vacuum()
        }
    }

    /// Checks passivity and physical ranges.
    pub fn validate(&self) -> Result<()> {
        if !(self.conductivity.is_finite() && self.conductivity >= 0.0) {
            return Err(ImpedanceError::input(format!(
                "conductivity must be finite and non-negative, got {}",
                self.conductivity
            )));
        }
        if !(self.permittivity.is_finite() && self.permittivity > 0.0) {
            return Err(ImpedanceError::input(format!(
                "relative permittivity must be positive, got {}",
                self.permittivity
            )));
        }
        if !(self.loss_tangent.is_finite() && self.loss_tangent >= 0.0) {
            return Err(ImpedanceError::input(format!(
                "loss tangent must be non-negative, got {}",
                self.loss_tangent
            )));
        }
        if !(self.permeability.is_finite() && self.permeability > 0.0) {
            return Err(ImpedanceError::input(format!(
                "relative permeability must be positive, got {}",
                self.permeability
            )));
        }
        Ok(())
    }

    /// ε_r (1 - j tan δ sgn ω).
    fn complex_permittivity(&self, omega: Scalar) -> CScalar {
        Complex::new(
            self.permittivity,
            -self.permittivity * self.loss_tangent * omega.signum(),
        )
    }
}

impl DispersiveMaterial for MaterialProperties {
    fn response(&self, omega: Scalar) -> MaterialResponse {
        MaterialResponse {
            conductivity: Complex::new(self.conductivity, 0.0),
            permittivity: self.complex_permittivity(omega),
            permeability: Complex::new(self.permeability, 0.0),
        }
    }
}

/// Single-relaxation-time conductor with optional magnetic relaxation.
///
/// σ(ω) = σ_DC / (1 + jωτ) (Drude/anomalous-skin-effect regime) and
/// μ_r(ω) = 1 + (μ_r - 1) / (1 + j f / f_μ) when a relaxation frequency is given.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelaxationModel {
    /// Static parameters.
    pub base: MaterialProperties,
    /// Conductivity relaxation time τ in seconds.
    pub relaxation_time: Scalar,
    /// Permeability relaxation frequency f_μ in hertz.
    pub permeability_relaxation_hz: Option<Scalar>,
}

impl RelaxationModel {
    /// Creates a validated relaxation model.
    pub fn new(
        base: MaterialProperties,
        relaxation_time: Scalar,
        permeability_relaxation_hz: Option<Scalar>,
    ) -> Result<Self> {
        base.validate()?;
        if !(relaxation_time.is_finite() && relaxation_time >= 0.0) {
            return Err(ImpedanceError::input(format!(
                "relaxation time must be non-negative, got {relaxation_time}"
            )));
        }
        if let Some(f_mu) = permeability_relaxation_hz {
            if !(f_mu.is_finite() && f_mu > 0.0) {
                return Err(ImpedanceError::input(format!(
                    "permeability relaxation frequency must be positive, got {f_mu}"
                )));
            }
        }
        Ok(Self {
            base,
            relaxation_time,
            permeability_relaxation_hz,
        })
    }
}

impl DispersiveMaterial for RelaxationModel {
    fn response(&self, omega: Scalar) -> MaterialResponse {
        let sigma = Complex::new(self.base.conductivity, 0.0)
            / (Complex::new(1.0, 0.0) + J * omega * self.relaxation_time);
        let mu = match self.permeability_relaxation_hz {
            Some(f_mu) => {
                let ratio = frequency_from_angular(omega) / f_mu;
                Complex::new(1.0, 0.0)
                    + (self.base.permeability - 1.0) / (Complex::new(1.0, 0.0) + J * ratio)
            }
            None => Complex::new(self.base.permeability, 0.0),
        };
        MaterialResponse {
            conductivity: sigma,
            permittivity: self.base.complex_permittivity(omega),
            permeability: mu,
        }
    }
}

/// Material measured at discrete positive frequencies.
///
/// Values are interpolated linearly in log-frequency and clamped outside the
/// table. Negative frequencies return the complex conjugate of the `|ω|` response.
/// Deserialized tables go through [`TabulatedMaterial::validate`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "TableColumns"))]
#[derive(Debug, Clone, PartialEq)]
pub struct TabulatedMaterial {
    log_frequencies: Vec<Scalar>,
    conductivity: Vec<CScalar>,
    permittivity: Vec<CScalar>,
    permeability: Vec<CScalar>,
}

/// Unchecked wire form of [`TabulatedMaterial`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct TableColumns {
    log_frequencies: Vec<Scalar>,
    conductivity: Vec<CScalar>,
    permittivity: Vec<CScalar>,
    permeability: Vec<CScalar>,
}

#[cfg(feature = "serde")]
impl TryFrom<TableColumns> for TabulatedMaterial {
    type Error = ImpedanceError;

    fn try_from(columns: TableColumns) -> Result<Self> {
        let table = Self {
            log_frequencies: columns.log_frequencies,
            conductivity: columns.conductivity,
            permittivity: columns.permittivity,
            permeability: columns.permeability,
        };
        table.validate()?;
        Ok(table)
    }
}

impl TabulatedMaterial {
    /// Builds a table from frequencies in hertz and the matching responses.
    pub fn new(
        frequencies_hz: &[Scalar],
        conductivity: Vec<CScalar>,
        permittivity: Vec<CScalar>,
        permeability: Vec<CScalar>,
    ) -> Result<Self> {
        if frequencies_hz.iter().any(|f| !(f.is_finite() && *f > 0.0)) {
            return Err(ImpedanceError::input(
                "tabulated material frequencies must be positive and finite",
            ));
        }
        let table = Self {
            log_frequencies: frequencies_hz.iter().map(|f| f.log10()).collect(),
            conductivity,
            permittivity,
            permeability,
        };
        table.validate()?;
        Ok(table)
    }

    /// Checks column lengths, frequency order, finiteness and passivity.
    pub fn validate(&self) -> Result<()> {
        let n = self.log_frequencies.len();
        if n == 0 {
            return Err(ImpedanceError::input("tabulated material has no samples"));
        }
        if self.conductivity.len() != n || self.permittivity.len() != n || self.permeability.len() != n {
            return Err(ImpedanceError::input(format!(
                "tabulated material columns must all have {n} samples (got {}, {}, {})",
                self.conductivity.len(),
                self.permittivity.len(),
                self.permeability.len()
            )));
        }
        if self.log_frequencies.iter().any(|x| !x.is_finite()) {
            return Err(ImpedanceError::input(
                "tabulated material frequencies must be positive and finite",
            ));
        }
        if self.log_frequencies.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ImpedanceError::input(
                "tabulated material frequencies must be strictly increasing",
            ));
        }
        let columns = [
            ("conductivity", &self.conductivity),
            ("permittivity", &self.permittivity),
            ("permeability", &self.permeability),
        ];
        for (name, column) in columns {
            if let Some(i) = column.iter().position(|z| !crate::math::is_finite(*z)) {
                return Err(ImpedanceError::input(format!(
                    "tabulated {name} sample {i} is not finite: {}",
                    column[i]
                )));
            }
        }
        if let Some(bad) = self.conductivity.iter().find(|s| s.re < 0.0) {
            return Err(ImpedanceError::input(format!(
                "tabulated conductivity violates passivity: {bad}"
            )));
        }
        if self.permeability.iter().any(|m| m.re <= 0.0) {
            return Err(ImpedanceError::input(
                "tabulated relative permeability must have positive real part",
            ));
        }
        Ok(())
    }

    /// Number of tabulated samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.log_frequencies.len()
    }

    /// True when the table holds no samples (never for a validated table).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log_frequencies.is_empty()
    }
}

impl DispersiveMaterial for TabulatedMaterial {
    fn response(&self, omega: Scalar) -> MaterialResponse {
        let x = frequency_from_angular(omega.abs()).log10();
        let response = MaterialResponse {
            conductivity: linear_clamped(&self.log_frequencies, &self.conductivity, x),
            permittivity: linear_clamped(&self.log_frequencies, &self.permittivity, x),
            permeability: linear_clamped(&self.log_frequencies, &self.permeability, x),
        };
        if omega < 0.0 {
            MaterialResponse {
                conductivity: response.conductivity.conj(),
                permittivity: response.permittivity.conj(),
                permeability: response.permeability.conj(),
            }
        } else {
            response
        }
    }
}

/// Closed set of material models a layer can be made of.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialModel {
    /// Frequency-independent σ, ε_r, tan δ, μ_r.
    Constant(MaterialProperties),
    /// Conductivity and permeability relaxation.
    Relaxation(RelaxationModel),
    /// Interpolated measurement table.
    Tabulated(TabulatedMaterial),
    /// Ideal conductor: zero surface impedance, no fields beyond it.
    PerfectConductor,
}

/// What a layer presents to the solver at one frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Medium {
    /// Shorts the line: the impedance looking into it is exactly zero.
    PerfectConductor,
    /// Ordinary lossy (or lossless) medium.
    Lossy(MaterialResponse),
}

impl MaterialModel {
    /// Evaluates the model at the signed angular frequency `omega`.
    #[must_use]
    pub fn medium(&self, omega: Scalar) -> Medium {
        match self {
            Self::Constant(props) => Medium::Lossy(props.response(omega)),
            Self::Relaxation(model) => Medium::Lossy(model.response(omega)),
            Self::Tabulated(table) => Medium::Lossy(table.response(omega)),
            Self::PerfectConductor => Medium::PerfectConductor,
        }
    }

    /// True for [`MaterialModel::PerfectConductor`].
    #[must_use]
    pub const fn is_perfect_conductor(&self) -> bool {
        matches!(self, Self::PerfectConductor)
    }

    /// Re-checks the parameters of the wrapped model.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Constant(props) => props.validate(),
            Self::Relaxation(model) => {
                RelaxationModel::new(
                    model.base,
                    model.relaxation_time,
                    model.permeability_relaxation_hz,
                )?;
                Ok(())
            }
            Self::Tabulated(table) => table.validate(),
            Self::PerfectConductor => Ok(()),
        }
    }

    /// Looks up a named preset (case-insensitive); see [`PRESETS`].
    #[must_use]
    pub fn preset(name: &str) -> Option<Self> {
        let key = name.trim().to_ascii_lowercase();
        PRESETS
            .iter()
            .find(|p| p.name == key || p.aliases.contains(&key.as_str()))
            .map(|p| match p.conductivity {
                Some(sigma) => Self::Constant(MaterialProperties::conductor(sigma)),
                None if p.name == "vacuum" => Self::Constant(MaterialProperties::vacuum()),
                None => Self::PerfectConductor,
            })
    }
}

impl From<MaterialProperties> for MaterialModel {
    fn from(props: MaterialProperties) -> Self {
        Self::Constant(props)
    }
}

impl From<RelaxationModel> for MaterialModel {
    fn from(model: RelaxationModel) -> Self {
        Self::Relaxation(model)
    }
}

impl From<TabulatedMaterial> for MaterialModel {
    fn from(table: TabulatedMaterial) -> Self {
        Self::Tabulated(table)
    }
}

/// Catalogue entry for a named material.
#[derive(Debug, Clone, Copy)]
pub struct Preset {
    /// Canonical lowercase name.
    pub name: &'static str,
    /// Alternative spellings.
    pub aliases: &'static [&'static str],
    /// Room-temperature DC conductivity (S/m); `None` for vacuum and the ideal conductor.
    pub conductivity: Option<Scalar>,
    /// Human-readable description.
    pub description: &'static str,
}

/// Built-in material catalogue (room temperature, non-magnetic).
pub const PRESETS: &[Preset] = &[
    Preset {
        name: "copper",
        aliases: &["cu"],
        conductivity: Some(5.96e7),
        description: "OFE copper",
    },
    Preset {
        name: "aluminium",
        aliases: &["aluminum", "al"],
        conductivity: Some(3.77e7),
        description: "pure aluminium",
    },
    Preset {
        name: "stainless_steel",
        aliases: &["ss", "ss316", "stainless"],
        conductivity: Some(1.35e6),
        description: "AISI 316LN stainless steel",
    },
    Preset {
        name: "titanium",
        aliases: &["ti"],
        conductivity: Some(2.38e6),
        description: "grade 2 titanium",
    },
    Preset {
        name: "graphite",
        aliases: &["carbon", "c"],
        conductivity: Some(7.14e4),
        description: "isotropic graphite (collimator jaws)",
    },
    Preset {
        name: "vacuum",
        aliases: &["v", "free_space"],
        conductivity: None,
        description: "free space",
    },
    Preset {
        name: "pec",
        aliases: &["perfect_conductor"],
        conductivity: None,
        description: "ideal perfect electric conductor",
    },
];

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::constants::{angular_frequency, FREE_SPACE_IMPEDANCE};

    #[test]
    fn vacuum_impedance_matches_reference() {
        let omega = angular_frequency(1.0e9);
        let z = MaterialProperties::vacuum().response(omega).intrinsic_impedance(omega);
        assert_relative_eq!(z.re, FREE_SPACE_IMPEDANCE, max_relative = 1.0e-9);
        assert_relative_eq!(z.im, 0.0, epsilon = 1.0e-9);
    }

    #[test]
    fn good_conductor_has_forty_five_degree_impedance() {
        let omega = angular_frequency(1.0e6);
        let sigma = 5.96e7;
        let z = MaterialProperties::conductor(sigma)
            .response(omega)
            .intrinsic_impedance(omega);
        let expected = (omega * crate::constants::VACUUM_PERMEABILITY / (2.0 * sigma)).sqrt();
        assert_relative_eq!(z.re, expected, max_relative = 1.0e-6);
        assert_relative_eq!(z.im, expected, max_relative = 1.0e-6);
    }

    #[test]
    fn responses_are_hermitian_in_frequency() {
        let omega = angular_frequency(3.0e7);
        let relax = RelaxationModel::new(
            MaterialProperties::new(1.0e6, 4.0, 0.01, 50.0).unwrap(),
            2.0e-9,
            Some(1.0e6),
        )
        .unwrap();
        let pos = relax.response(omega);
        let neg = relax.response(-omega);
        assert_relative_eq!((neg.conductivity - pos.conductivity.conj()).norm(), 0.0, epsilon = 1e-6);
        assert_relative_eq!((neg.permittivity - pos.permittivity.conj()).norm(), 0.0, epsilon = 1e-12);
        assert_relative_eq!((neg.permeability - pos.permeability.conj()).norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn relaxation_rolls_conductivity_off() {
        let tau = 1.0e-9;
        let model = RelaxationModel::new(MaterialProperties::conductor(1.0e6), tau, None).unwrap();
        let r = model.response(1.0 / tau);
        assert_relative_eq!(r.conductivity.re, 0.5e6, max_relative = 1e-12);
        assert_relative_eq!(r.conductivity.im, -0.5e6, max_relative = 1e-12);
    }

    #[test]
    fn negative_conductivity_is_rejected() {
        let err = MaterialProperties::new(-1.0, 1.0, 0.0, 1.0).unwrap_err();
        assert!(matches!(err, ImpedanceError::InvalidInput(_)));
    }

    #[test]
    fn tabulated_material_interpolates_in_log_frequency() {
        let table = TabulatedMaterial::new(
            &[1.0e3, 1.0e5],
            vec![Complex::new(1.0e6, 0.0), Complex::new(3.0e6, 0.0)],
            vec![Complex::new(1.0, 0.0); 2],
            vec![Complex::new(1.0, 0.0); 2],
        )
        .unwrap();
        let r = table.response(angular_frequency(1.0e4));
        assert_relative_eq!(r.conductivity.re, 2.0e6, max_relative = 1e-9);
        let clamped = table.response(angular_frequency(1.0e9));
        assert_relative_eq!(clamped.conductivity.re, 3.0e6, max_relative = 1e-12);
    }

    #[test]
    fn tabulated_material_rejects_active_samples() {
        let err = TabulatedMaterial::new(
            &[1.0e3],
            vec![Complex::new(-1.0, 0.0)],
            vec![Complex::new(1.0, 0.0)],
            vec![Complex::new(1.0, 0.0)],
        )
        .unwrap_err();
        assert!(matches!(err, ImpedanceError::InvalidInput(_)));
    }

    #[test]
    fn tabulated_material_rejects_non_finite_samples() {
        let one = vec![Complex::new(1.0, 0.0); 2];
        for (sigma, eps, mu) in [
            (vec![Complex::new(f64::INFINITY, 0.0); 2], one.clone(), one.clone()),
            (one.clone(), vec![Complex::new(f64::NAN, 0.0); 2], one.clone()),
            (one.clone(), one.clone(), vec![Complex::new(1.0, f64::NEG_INFINITY); 2]),
        ] {
            let err = TabulatedMaterial::new(&[1.0e3, 1.0e6], sigma, eps, mu).unwrap_err();
            assert!(matches!(err, ImpedanceError::InvalidInput(_)), "{err}");
        }
    }

    #[test]
    fn model_validation_checks_tables_built_without_new() {
        let short = TabulatedMaterial {
            log_frequencies: vec![3.0, 6.0],
            conductivity: vec![Complex::new(1.0e6, 0.0)],
            permittivity: vec![Complex::new(1.0, 0.0); 2],
            permeability: vec![Complex::new(1.0, 0.0); 2],
        };
        let err = MaterialModel::Tabulated(short.clone()).validate().unwrap_err();
        assert!(matches!(err, ImpedanceError::InvalidInput(_)));
        let wall = crate::wall::Wall::new(0.025, 1.0, vec![crate::wall::Layer::semi_infinite(short)]);
        assert!(matches!(wall, Err(ImpedanceError::InvalidInput(_))));

        let empty = TabulatedMaterial {
            log_frequencies: Vec::new(),
            conductivity: Vec::new(),
            permittivity: Vec::new(),
            permeability: Vec::new(),
        };
        assert!(MaterialModel::Tabulated(empty).validate().is_err());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn deserialized_tables_are_validated() {
        let mismatched = r#"
            log_frequencies = [3.0, 6.0]
            conductivity = [[1.0e6, 0.0]]
            permittivity = [[1.0, 0.0], [1.0, 0.0]]
            permeability = [[1.0, 0.0], [1.0, 0.0]]
        "#;
        assert!(toml::from_str::<TabulatedMaterial>(mismatched).is_err());

        let good = mismatched.replace("[[1.0e6, 0.0]]", "[[1.0e6, 0.0], [2.0e6, 0.0]]");
        let table: TabulatedMaterial = toml::from_str(&good).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn presets_resolve_by_alias() {
        assert_eq!(
            MaterialModel::preset("Cu"),
            Some(MaterialModel::Constant(MaterialProperties::conductor(5.96e7)))
        );
        assert_eq!(MaterialModel::preset("pec"), Some(MaterialModel::PerfectConductor));
        assert_eq!(
            MaterialModel::preset("vacuum"),
            Some(MaterialModel::Constant(MaterialProperties::vacuum()))
        );
        assert!(MaterialModel::preset("unobtainium").is_none());
    }
}
