use super::{AssemblyType, LayerPayload};
use serde::{Deserialize, Serialize};

/// Explicit surface resistance overrides; both unset unless a caller asks
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResistanceOverrides {
    pub rsi: Option<f64>,
    pub rse: Option<f64>,
}

/// Body of `POST /calculate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub city: String,
    pub assembly: AssemblyType,
    pub dynamic_coefficients: bool,

    #[serde(rename = "override_Rsi")]
    pub override_rsi: Option<f64>,

    #[serde(rename = "override_Rse")]
    pub override_rse: Option<f64>,

    pub layers: Vec<LayerPayload>,
}
