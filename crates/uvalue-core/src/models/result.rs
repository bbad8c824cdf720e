use crate::error::{Result, UvalueError};
use serde::{Deserialize, Serialize};

/// Thermal resistance of one layer as computed by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerResistance {
    pub material: String,
    pub thickness_mm: f64,

    #[serde(rename = "k_W_mK")]
    pub conductivity: f64,

    #[serde(rename = "R_layer")]
    pub resistance: f64,
}

/// One branch (static or dynamic) of a calculation response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermalBranch {
    #[serde(default)]
    pub city: String,

    #[serde(default)]
    pub assembly: String,

    #[serde(default)]
    pub method: String,

    /// Inside surface resistance, m²·K/W
    #[serde(rename = "Rsi")]
    pub rsi: f64,

    /// Outside surface resistance, m²·K/W
    #[serde(rename = "Rse")]
    pub rse: f64,

    /// Layers-only resistance, m²·K/W
    #[serde(rename = "Rs", default, skip_serializing_if = "Option::is_none")]
    pub rs: Option<f64>,

    #[serde(rename = "U_surface_to_surface")]
    pub u_surface_to_surface: f64,

    #[serde(rename = "U_overall")]
    pub u_overall: f64,

    #[serde(rename = "heat_capacity_kJ_m2K", default, skip_serializing_if = "Option::is_none")]
    pub heat_capacity: Option<f64>,

    pub layers: Vec<LayerResistance>,
}

impl ThermalBranch {
    fn check(&self, branch: &str, require_totals: bool) -> Result<()> {
        let scalars = [
            ("Rsi", Some(self.rsi)),
            ("Rse", Some(self.rse)),
            ("Rs", self.rs),
            ("U_surface_to_surface", Some(self.u_surface_to_surface)),
            ("U_overall", Some(self.u_overall)),
            ("heat_capacity_kJ_m2K", self.heat_capacity),
        ];

        for (field, value) in scalars {
            match value {
                Some(v) if !v.is_finite() => {
                    return Err(decode_error(branch, field, "is not a finite number"));
                }
                None if require_totals => {
                    return Err(decode_error(branch, field, "is missing"));
                }
                _ => {}
            }
        }

        for (index, layer) in self.layers.iter().enumerate() {
            if !layer.conductivity.is_finite() || !layer.resistance.is_finite() {
                return Err(decode_error(
                    branch,
                    &format!("layers[{}]", index),
                    "has a non-finite k or R value",
                ));
            }
        }

        Ok(())
    }
}

fn decode_error(branch: &str, field: &str, problem: &str) -> UvalueError {
    UvalueError::Decode {
        reason: format!("{}.{} {}", branch, field, problem),
    }
}

/// Immutable snapshot returned by the calculation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    #[serde(rename = "static")]
    pub static_branch: ThermalBranch,

    pub dynamic: ThermalBranch,
}

impl CalculationResult {
    /// Reject responses with non-finite numbers or without the dynamic totals
    pub fn validate(&self) -> Result<()> {
        // Totals are only required on the dynamic branch
        self.static_branch.check("static", false)?;
        self.dynamic.check("dynamic", true)
    }

    /// Decode and validate a raw response body
    pub fn from_json(body: &str) -> Result<Self> {
        let result: CalculationResult = serde_json::from_str(body).map_err(|e| {
            UvalueError::Decode { reason: format!("calculation response: {}", e) }
        })?;
        result.validate()?;
        Ok(result)
    }
}
