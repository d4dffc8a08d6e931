//! Export helpers for spectra and wakes.

pub mod csv;

pub use self::csv::{write_spectrum_csv, write_sweep_csv, write_wake_csv};
