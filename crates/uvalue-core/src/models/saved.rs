use super::{AssemblyType, CalculationResult, LayerPayload};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /save-design`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveDesignRequest {
    pub title: Option<String>,
    pub city: String,
    pub assembly: AssemblyType,
    pub layers: Vec<LayerPayload>,
    pub result: CalculationResult,
}

/// Handle to a persisted design returned by the save endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedDesignRef {
    pub public_id: String,

    /// Shareable locator as minted by the server
    #[serde(default)]
    pub url: Option<String>,
}

/// Persisted snapshot returned by `GET /design/{public_id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedDesign {
    #[serde(default)]
    pub title: Option<String>,
    pub city: String,
    pub assembly: AssemblyType,
    pub layers: Vec<LayerPayload>,
    pub result: CalculationResult,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
