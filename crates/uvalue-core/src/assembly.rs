//! Assembly state model
//!
//! The working design plus the pure derivations computed from it:
//! validation, calculability and the calculation request payload.

use crate::error::{Result, UvalueError};
use crate::models::{
    AssemblyType, CalculationRequest, CalculationResult, Layer, LayerId, ResistanceOverrides,
    SaveDesignRequest,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A problem that keeps a design from being submitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    MissingCity,
    NoLayers,
    /// 1-indexed layer position
    MissingMaterial { position: usize },
    /// 1-indexed layer position
    InvalidThickness { position: usize },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::MissingCity => write!(f, "Please select a city."),
            ValidationIssue::NoLayers => write!(f, "Please add at least one layer."),
            ValidationIssue::MissingMaterial { position } => {
                write!(f, "Layer {}: please select a material.", position)
            }
            ValidationIssue::InvalidThickness { position } => {
                write!(f, "Layer {}: thickness must be a positive number.", position)
            }
        }
    }
}

/// The working design: city, assembly type and the ordered layer list
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AssemblyDesign {
    /// Selected climate location; empty while unset
    #[serde(default)]
    pub city: String,

    #[serde(default)]
    pub assembly: AssemblyType,

    /// First entry is the outside face
    #[serde(default)]
    pub layers: Vec<Layer>,
}

impl AssemblyDesign {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_city(&self) -> bool {
        !self.city.trim().is_empty()
    }

    /// Problems in display order: city, layer count, then each layer in turn
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if !self.has_city() {
            issues.push(ValidationIssue::MissingCity);
        }

        if self.layers.is_empty() {
            issues.push(ValidationIssue::NoLayers);
        }

        for (index, layer) in self.layers.iter().enumerate() {
            let position = index + 1;
            if !layer.has_material() {
                issues.push(ValidationIssue::MissingMaterial { position });
            }
            if !layer.has_valid_thickness() {
                issues.push(ValidationIssue::InvalidThickness { position });
            }
        }

        issues
    }

    pub fn is_calculable(&self) -> bool {
        self.validate().is_empty()
    }

    /// Fail with every validation problem rendered as a message
    pub fn ensure_calculable(&self) -> Result<()> {
        let issues = self.validate();
        if issues.is_empty() {
            Ok(())
        } else {
            Err(UvalueError::Validation {
                problems: issues.iter().map(ToString::to_string).collect(),
            })
        }
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    pub fn position_of(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|layer| layer.id == id)
    }

    /// Append a placeholder layer and return its id
    pub fn add_layer(&mut self) -> LayerId {
        let layer = Layer::placeholder();
        let id = layer.id;
        self.layers.push(layer);
        id
    }

    /// Append a layer at the inside face
    pub fn push_layer(&mut self, layer: Layer) -> Result<()> {
        if self.layer(layer.id).is_some() {
            return Err(UvalueError::DuplicateLayer { id: layer.id.to_string() });
        }
        self.layers.push(layer);
        Ok(())
    }

    /// Replace the layer with the same id; returns whether anything changed
    pub fn update_layer(&mut self, layer: Layer) -> Result<bool> {
        let slot = self
            .layers
            .iter_mut()
            .find(|existing| existing.id == layer.id)
            .ok_or_else(|| UvalueError::LayerNotFound { id: layer.id.to_string() })?;

        if *slot == layer {
            return Ok(false);
        }
        *slot = layer;
        Ok(true)
    }

    pub fn remove_layer(&mut self, id: LayerId) -> Result<Layer> {
        let index = self
            .position_of(id)
            .ok_or_else(|| UvalueError::LayerNotFound { id: id.to_string() })?;
        Ok(self.layers.remove(index))
    }

    pub fn total_thickness_mm(&self) -> f64 {
        self.layers
            .iter()
            .map(|layer| layer.thickness_mm)
            .filter(|t| t.is_finite())
            .sum()
    }

    /// Snapshot the design as a calculation request
    pub fn to_request(&self, overrides: ResistanceOverrides) -> CalculationRequest {
        CalculationRequest {
            city: self.city.clone(),
            assembly: self.assembly,
            dynamic_coefficients: true,
            override_rsi: overrides.rsi,
            override_rse: overrides.rse,
            layers: self.layers.iter().map(Layer::to_payload).collect(),
        }
    }
}

impl CalculationRequest {
    /// Autosave body for a request that has just been answered
    pub fn to_save_request(&self, result: &CalculationResult) -> SaveDesignRequest {
        SaveDesignRequest {
            title: None,
            city: self.city.clone(),
            assembly: self.assembly,
            layers: self.layers.clone(),
            result: result.clone(),
        }
    }
}
