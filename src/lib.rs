#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![warn(clippy::all, clippy::cargo, clippy::nursery, missing_docs)]
#![doc = include_str!("../README.md")]

/// Fundamental physical constants used throughout the library.
pub mod constants;
/// Shared numerical primitives (scalar aliases, branch-safe complex helpers).
pub mod math;
/// Error taxonomy shared by the solver, corrector, calculator and transform.
pub mod errors;
/// Interpolation schemes for tabulated data.
pub mod interpolation;
/// Material property models (conductivity, permittivity, permeability).
pub mod materials;
/// Layers, outer boundaries and the layered wall description.
pub mod wall;
/// Azimuthal modes and impedance planes.
pub mod mode;
/// ABCD two-port representation of wall layers.
pub mod twoport;
/// Multilayer surface impedance solver.
pub mod solver;
/// Chamber shape (Yokoya) corrections and round-pipe prefactors.
pub mod yokoya;
/// Frequency grids and spectrum post-processing helpers.
pub mod sweep;
/// Impedance spectra across frequency grids and modes.
pub mod calculator;
/// Causal impedance/wake transforms.
pub mod wake;
/// CSV export of spectra and wakes.
pub mod io;

/// Common exports for downstream crates.
pub mod prelude;
