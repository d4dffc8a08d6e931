//! TOML job files.
//!
//! ```toml
//! modes = [0, 1]
//!
//! [chamber]
//! radius = 0.025
//! length = 1.0
//! shape = "elliptical"
//! aspect_ratio = 2.0
//!
//! [[layer]]
//! thickness = 2e-3
//! material = "copper"
//!
//! [[layer]]
//! thickness = "infinite"
//! material = "vacuum"
//!
//! [frequency]
//! start_hz = 1e3
//! stop_hz = 1e9
//! points = 200
//!
//! [wake]
//! stop_s = 1e-9
//! points = 500
//!
//! [output]
//! directory = "./output"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use tlwall::materials::{MaterialModel, MaterialProperties, RelaxationModel};
use tlwall::mode::Mode;
use tlwall::sweep::{linspace, FrequencyGrid};
use tlwall::wake::{LowFrequencyPolicy, TransformMethod, WakeConfig, Window};
use tlwall::wall::{Boundary, Layer, Wall};
use tlwall::yokoya::{ChamberShape, YokoyaTable};

/// Top-level job configuration.
#[derive(Debug, Deserialize)]
pub struct JobConfig {
    /// Azimuthal modes to compute (default: longitudinal only).
    #[serde(default = "default_modes")]
    pub modes: Vec<u32>,
    pub chamber: ChamberConfig,
    #[serde(rename = "layer")]
    pub layers: Vec<LayerConfig>,
    pub frequency: FrequencyConfig,
    #[serde(default)]
    pub wake: Option<WakeSection>,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_modes() -> Vec<u32> {
    vec![0]
}

/// Beam-pipe geometry.
#[derive(Debug, Deserialize)]
pub struct ChamberConfig {
    /// Inner radius (half gap for flat chambers) in meters.
    pub radius: f64,
    /// Interaction length in meters.
    #[serde(default = "default_length")]
    pub length: f64,
    /// "circular", "flat" or "elliptical".
    #[serde(default = "default_shape")]
    pub shape: String,
    /// Horizontal over vertical semi-axis, elliptical chambers only.
    #[serde(default)]
    pub aspect_ratio: Option<f64>,
    /// "vacuum" or "pec", used when no layer is infinite.
    #[serde(default = "default_boundary")]
    pub boundary: String,
    /// Optional CSV file replacing the builtin Yokoya table.
    #[serde(default)]
    pub yokoya_table: Option<PathBuf>,
}

fn default_length() -> f64 {
    1.0
}
fn default_shape() -> String {
    "circular".into()
}
fn default_boundary() -> String {
    "vacuum".into()
}

/// Layer thickness: meters, or the keyword "infinite".
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ThicknessSpec {
    Meters(f64),
    Keyword(String),
}

/// One wall layer: a preset name or explicit parameters.
#[derive(Debug, Deserialize)]
pub struct LayerConfig {
    pub thickness: ThicknessSpec,
    /// Preset name (see `tlwall materials`).
    #[serde(default)]
    pub material: Option<String>,
    /// DC conductivity in S/m.
    #[serde(default)]
    pub conductivity: Option<f64>,
    #[serde(default = "default_one")]
    pub permittivity: f64,
    #[serde(default)]
    pub loss_tangent: f64,
    #[serde(default = "default_one")]
    pub permeability: f64,
    /// Conductivity relaxation time in seconds.
    #[serde(default)]
    pub relaxation_time: Option<f64>,
    /// Permeability relaxation frequency in hertz.
    #[serde(default)]
    pub permeability_relaxation_hz: Option<f64>,
}

fn default_one() -> f64 {
    1.0
}

/// Frequency sweep.
#[derive(Debug, Deserialize)]
pub struct FrequencyConfig {
    pub start_hz: f64,
    pub stop_hz: f64,
    #[serde(default = "default_points")]
    pub points: usize,
    /// "log" or "linear".
    #[serde(default = "default_spacing")]
    pub spacing: String,
}

fn default_points() -> usize {
    200
}
fn default_spacing() -> String {
    "log".into()
}

/// Optional wake computation.
#[derive(Debug, Deserialize)]
pub struct WakeSection {
    #[serde(default)]
    pub start_s: f64,
    pub stop_s: f64,
    #[serde(default = "default_points")]
    pub points: usize,
    /// "rectangular", "hann" or "tukey".
    #[serde(default = "default_window")]
    pub window: String,
    #[serde(default = "default_taper")]
    pub taper: f64,
    /// "hold" or "truncate".
    #[serde(default = "default_low_frequency")]
    pub low_frequency: String,
    /// "filon" or "fft".
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default = "default_padding")]
    pub padding: usize,
}

fn default_window() -> String {
    "rectangular".into()
}
fn default_taper() -> f64 {
    0.1
}
fn default_low_frequency() -> String {
    "hold".into()
}
fn default_method() -> String {
    "filon".into()
}
fn default_padding() -> usize {
    4
}

/// Output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Output directory (default: "./output").
    #[serde(default = "default_output_dir")]
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
        }
    }
}

fn default_output_dir() -> String {
    "./output".into()
}

/// Validated job ready to run.
#[derive(Debug)]
pub struct Job {
    pub wall: Wall,
    pub shape: ChamberShape,
    pub table: Option<YokoyaTable>,
    pub grid: FrequencyGrid,
    pub modes: Vec<Mode>,
    pub wake: Option<WakeJob>,
    pub output_dir: PathBuf,
}

/// Wake settings with the time grid expanded.
#[derive(Debug)]
pub struct WakeJob {
    pub config: WakeConfig,
    pub times: Vec<f64>,
}

/// Load and parse a TOML job configuration file.
pub fn load_config(path: &Path) -> Result<JobConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let config: JobConfig =
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

impl JobConfig {
    /// Turns the raw file contents into library types, validating everything.
    pub fn build(&self, base_dir: &Path) -> Result<Job> {
        let layers = self
            .layers
            .iter()
            .enumerate()
            .map(|(i, l)| l.build().with_context(|| format!("layer {i}")))
            .collect::<Result<Vec<_>>>()?;
        let boundary = match self.chamber.boundary.trim().to_ascii_lowercase().as_str() {
            "vacuum" | "free_space" => Boundary::Vacuum,
            "pec" | "perfect_conductor" => Boundary::PerfectConductor,
            other => bail!("unknown outer boundary '{other}' (expected vacuum or pec)"),
        };
        let wall = Wall::with_boundary(self.chamber.radius, self.chamber.length, layers, boundary)?;

        let shape = ChamberShape::from_selector(&self.chamber.shape, self.chamber.aspect_ratio)?;
        let table = match &self.chamber.yokoya_table {
            Some(path) => {
                let path = base_dir.join(path);
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading Yokoya table {}", path.display()))?;
                Some(YokoyaTable::from_csv(&text)?)
            }
            None => None,
        };

        let f = &self.frequency;
        if !(f.start_hz > 0.0) {
            bail!("frequency.start_hz must be positive, got {}", f.start_hz);
        }
        if f.points < 2 {
            bail!("frequency.points must be at least 2");
        }
        let grid = match f.spacing.trim().to_ascii_lowercase().as_str() {
            "log" | "logarithmic" => FrequencyGrid::logspace_hz(f.start_hz, f.stop_hz, f.points)?,
            "linear" | "lin" => FrequencyGrid::linspace_hz(f.start_hz, f.stop_hz, f.points)?,
            other => bail!("unknown frequency spacing '{other}' (expected log or linear)"),
        };

        if self.modes.is_empty() {
            bail!("at least one mode is required");
        }
        let modes = self.modes.iter().copied().map(Mode).collect();

        let wake = self.wake.as_ref().map(WakeSection::build).transpose()?;

        Ok(Job {
            wall,
            shape,
            table,
            grid,
            modes,
            wake,
            output_dir: PathBuf::from(&self.output.directory),
        })
    }
}

impl LayerConfig {
    fn build(&self) -> Result<Layer> {
        let material = self.material_model()?;
        match &self.thickness {
            ThicknessSpec::Meters(t) => Ok(Layer::new(*t, material)),
            ThicknessSpec::Keyword(k) => match k.trim().to_ascii_lowercase().as_str() {
                "infinite" | "inf" | "semi_infinite" => Ok(Layer::semi_infinite(material)),
                other => bail!("thickness must be a number or \"infinite\", got '{other}'"),
            },
        }
    }

    fn material_model(&self) -> Result<MaterialModel> {
        match (&self.material, self.conductivity) {
            (Some(_), Some(_)) => bail!("give either a material preset or a conductivity, not both"),
            (Some(name), None) => MaterialModel::preset(name)
                .with_context(|| format!("unknown material '{name}' (see `tlwall materials`)")),
            (None, Some(sigma)) => {
                let base = MaterialProperties::new(
                    sigma,
                    self.permittivity,
                    self.loss_tangent,
                    self.permeability,
                )?;
                if self.relaxation_time.is_none() && self.permeability_relaxation_hz.is_none() {
                    return Ok(base.into());
                }
                Ok(RelaxationModel::new(
                    base,
                    self.relaxation_time.unwrap_or(0.0),
                    self.permeability_relaxation_hz,
                )?
                .into())
            }
            (None, None) => bail!("layer needs a material preset or a conductivity"),
        }
    }
}

impl WakeSection {
    fn build(&self) -> Result<WakeJob> {
        let window = match self.window.trim().to_ascii_lowercase().as_str() {
            "rectangular" | "none" => Window::Rectangular,
            "hann" | "hanning" => Window::Hann,
            "tukey" => Window::Tukey { taper: self.taper },
            other => bail!("unknown window '{other}'"),
        };
        let low_frequency = match self.low_frequency.trim().to_ascii_lowercase().as_str() {
            "hold" => LowFrequencyPolicy::HoldFirstSample,
            "truncate" => LowFrequencyPolicy::Truncate,
            other => bail!("unknown low-frequency policy '{other}' (expected hold or truncate)"),
        };
        let method = match self.method.trim().to_ascii_lowercase().as_str() {
            "filon" => TransformMethod::Filon,
            "fft" => TransformMethod::Fft {
                padding: self.padding,
            },
            other => bail!("unknown transform method '{other}' (expected filon or fft)"),
        };
        let config = WakeConfig::default()
            .with_window(window)
            .with_low_frequency(low_frequency)
            .with_method(method);
        config.validate()?;

        if !(self.stop_s > self.start_s) || self.points < 2 {
            bail!("wake time range needs stop_s > start_s and at least 2 points");
        }
        Ok(WakeJob {
            config,
            times: linspace(self.start_s, self.stop_s, self.points),
        })
    }
}
