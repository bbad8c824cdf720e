use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque layer identifier, generated client-side and never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(pub Uuid);

impl LayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One course of material in the assembly
///
/// Position in the owning list is significant: the first layer is the
/// outside face, the last layer the inside face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,

    /// Key into the material catalog; empty while unselected
    #[serde(default)]
    pub material: String,

    /// Thickness in millimeters
    ///
    /// Non-finite values are written as `null` and read back as NaN, so an
    /// invalid thickness survives a save and still fails validation.
    #[serde(deserialize_with = "nan_when_null")]
    pub thickness_mm: f64,
}

fn nan_when_null<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

impl Layer {
    /// Thickness given to a freshly added layer
    pub const PLACEHOLDER_THICKNESS_MM: f64 = 10.0;

    pub fn new(material: impl Into<String>, thickness_mm: f64) -> Self {
        Self {
            id: LayerId::new(),
            material: material.into(),
            thickness_mm,
        }
    }

    /// A new layer with no material selected and the default thickness
    pub fn placeholder() -> Self {
        Self::new("", Self::PLACEHOLDER_THICKNESS_MM)
    }

    pub fn has_material(&self) -> bool {
        !self.material.trim().is_empty()
    }

    pub fn has_valid_thickness(&self) -> bool {
        self.thickness_mm.is_finite() && self.thickness_mm > 0.0
    }

    pub fn to_payload(&self) -> LayerPayload {
        LayerPayload {
            material: self.material.clone(),
            thickness_mm: self.thickness_mm,
        }
    }
}

/// Wire form of a layer: what the calculation and save endpoints receive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerPayload {
    pub material: String,
    pub thickness_mm: f64,
}

impl LayerPayload {
    /// Re-materialize as an editable layer with a fresh id
    pub fn into_layer(self) -> Layer {
        Layer::new(self.material, self.thickness_mm)
    }
}
