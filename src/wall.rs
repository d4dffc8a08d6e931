//! Layered beam-pipe wall description.
//!
//! Layers are ordered from the innermost one (facing the beam) outward. The stack
//! ends either in a semi-infinite layer or, when every layer is finite, in an
//! outer [`Boundary`].

use crate::errors::{ImpedanceError, Result};
use crate::materials::{MaterialModel, MaterialProperties};
use crate::math::Scalar;

/// Radial extent of a layer.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Thickness {
    /// Finite thickness in meters.
    Finite(Scalar),
    /// Extends to infinity; only allowed for the outermost layer.
    SemiInfinite,
}

/// A single material layer of the wall.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Radial thickness.
    pub thickness: Thickness,
    /// Material the layer is made of.
    pub material: MaterialModel,
}

impl Layer {
    /// Finite layer of `thickness` meters.
    pub fn new(thickness: Scalar, material: impl Into<MaterialModel>) -> Self {
        Self {
            thickness: Thickness::Finite(thickness),
            material: material.into(),
        }
    }

    /// Semi-infinite layer; must be the outermost one.
    pub fn semi_infinite(material: impl Into<MaterialModel>) -> Self {
        Self {
            thickness: Thickness::SemiInfinite,
            material: material.into(),
        }
    }

    /// True for a semi-infinite layer.
    #[must_use]
    pub const fn is_semi_infinite(&self) -> bool {
        matches!(self.thickness, Thickness::SemiInfinite)
    }
}

/// What lies beyond the last layer when no layer is semi-infinite.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Boundary {
    /// Free space.
    #[default]
    Vacuum,
    /// Ideal conductor.
    PerfectConductor,
}

impl Boundary {
    /// The equivalent semi-infinite layer.
    #[must_use]
    pub fn as_layer(self) -> Layer {
        match self {
            Self::Vacuum => Layer::semi_infinite(MaterialProperties::vacuum()),
            Self::PerfectConductor => Layer::semi_infinite(MaterialModel::PerfectConductor),
        }
    }
}

/// Immutable, validated layer stack with its beam-pipe geometry.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Wall {
    layers: Vec<Layer>,
    radius: Scalar,
    length: Scalar,
    boundary: Boundary,
}

impl Wall {
    /// Builds a wall with inner radius `radius` (m) and interaction length
    /// `length` (m). A finite-only stack is closed by [`Boundary::Vacuum`].
    pub fn new(radius: Scalar, length: Scalar, layers: Vec<Layer>) -> Result<Self> {
        Self::with_boundary(radius, length, layers, Boundary::default())
    }

    /// Like [`Wall::new`] with an explicit outer boundary. The boundary is ignored
    /// when the last layer is semi-infinite.
    pub fn with_boundary(
        radius: Scalar,
        length: Scalar,
        layers: Vec<Layer>,
        boundary: Boundary,
    ) -> Result<Self> {
        if layers.is_empty() {
            return Err(ImpedanceError::input("wall has no layers"));
        }
        if !(radius.is_finite() && radius > 0.0) {
            return Err(ImpedanceError::input(format!(
                "inner radius must be positive, got {radius}"
            )));
        }
        if !(length.is_finite() && length > 0.0) {
            return Err(ImpedanceError::input(format!(
                "interaction length must be positive, got {length}"
            )));
        }

        let last = layers.len() - 1;
        for (i, layer) in layers.iter().enumerate() {
            match layer.thickness {
                Thickness::Finite(t) if !(t.is_finite() && t >= 0.0) => {
                    return Err(ImpedanceError::input(format!(
                        "layer {i} thickness must be finite and non-negative, got {t}"
                    )));
                }
                Thickness::SemiInfinite if i != last => {
                    return Err(ImpedanceError::config(format!(
                        "layer {i} is semi-infinite but is not the outermost layer"
                    )));
                }
                _ => {}
            }
            layer.material.validate()?;
        }

        Ok(Self {
            layers,
            radius,
            length,
            boundary,
        })
    }

    /// Layers from the beam outward.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Inner radius b (m).
    #[must_use]
    pub const fn radius(&self) -> Scalar {
        self.radius
    }

    /// Interaction length L (m).
    #[must_use]
    pub const fn length(&self) -> Scalar {
        self.length
    }

    /// Outer boundary used when the stack is all finite.
    #[must_use]
    pub const fn boundary(&self) -> Boundary {
        self.boundary
    }

    /// Finite layers with their thickness, innermost first.
    pub fn finite_layers(
        &self,
    ) -> impl DoubleEndedIterator<Item = (&Layer, Scalar)> + ExactSizeIterator + '_ {
        self.layers
            .iter()
            .filter_map(|layer| match layer.thickness {
                Thickness::Finite(t) => Some((layer, t)),
                Thickness::SemiInfinite => None,
            })
            .collect::<Vec<_>>()
            .into_iter()
    }

    /// The outermost medium: the semi-infinite layer, or the boundary.
    #[must_use]
    pub fn termination(&self) -> Layer {
        match self.layers.last() {
            Some(layer) if layer.is_semi_infinite() => layer.clone(),
            _ => self.boundary.as_layer(),
        }
    }

    /// Sum of all finite thicknesses (m).
    #[must_use]
    pub fn total_finite_thickness(&self) -> Scalar {
        self.layers
            .iter()
            .filter_map(|l| match l.thickness {
                Thickness::Finite(t) => Some(t),
                Thickness::SemiInfinite => None,
            })
            .sum()
    }
}
