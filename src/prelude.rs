//! Convenience re-exports for impedance and wake calculations.

pub use crate::calculator::{ImpedanceCalculator, ImpedanceSpectrum, SampleFailure, SweepResult};
pub use crate::constants::*;
pub use crate::errors::{ErrorKind, ImpedanceError};
pub use crate::io::{write_spectrum_csv, write_sweep_csv, write_wake_csv};
pub use crate::materials::{
    DispersiveMaterial, MaterialModel, MaterialProperties, MaterialResponse, RelaxationModel,
    TabulatedMaterial, PRESETS,
};
pub use crate::math::{CScalar, Scalar};
pub use crate::mode::{Mode, Plane};
pub use crate::solver::{surface_impedance, transfer_matrix};
pub use crate::sweep::FrequencyGrid;
pub use crate::wake::{
    impedance_to_wake, wake_to_impedance, LowFrequencyPolicy, TransformMethod, WakeConfig,
    WakeFunction, WakeTransform, Window, ROUND_TRIP_MARGIN,
};
pub use crate::wall::{Boundary, Layer, Thickness, Wall};
pub use crate::yokoya::{BeamImpedance, ChamberShape, ShapeCorrector, YokoyaTable};
