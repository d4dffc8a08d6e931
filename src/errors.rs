//! Shared error types used across submodules.

use thiserror::Error;

use crate::math::Scalar;

/// Coarse error category, for callers that only need to branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller supplied malformed data.
    InvalidInput,
    /// The request is well formed but not supported (shape, table range, layer order).
    InvalidConfiguration,
    /// The algorithm broke down for otherwise valid input.
    NumericalInstability,
}

/// Top-level error type for the crate.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ImpedanceError {
    /// Malformed wall, frequency grid, time grid or spectrum.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Unsupported shape, aspect ratio, mode or layer arrangement.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// Overflow or NaN detected during the layer recursion or a transform.
    #[error("numerical instability at omega = {omega:e} rad/s: {detail}")]
    NumericalInstability {
        /// Angular frequency (rad/s) of the failing evaluation.
        omega: Scalar,
        /// Where the breakdown was detected.
        detail: String,
    },
}

impl ImpedanceError {
    /// Shorthand for [`ImpedanceError::InvalidInput`].
    pub fn input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Shorthand for [`ImpedanceError::InvalidConfiguration`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Shorthand for [`ImpedanceError::NumericalInstability`].
    pub fn unstable(omega: Scalar, detail: impl Into<String>) -> Self {
        Self::NumericalInstability {
            omega,
            detail: detail.into(),
        }
    }

    /// Category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::InvalidConfiguration(_) => ErrorKind::InvalidConfiguration,
            Self::NumericalInstability { .. } => ErrorKind::NumericalInstability,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = ImpedanceError> = std::result::Result<T, E>;
