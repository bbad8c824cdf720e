use serde::Serialize;
use tabled::Tabled;
use uvalue_core::geometry::RulerTick;
use uvalue_core::models::{CalculationResult, FilmCoefficients, SavedDesignRef};
use uvalue_session::{HydrationOutcome, WarmState};

/// Output for wait command
#[derive(Debug, Serialize)]
pub struct WaitOutput {
    pub ready: bool,
    pub via: Option<String>,
    pub elapsed_ms: u128,
}

/// One row of the material catalog
#[derive(Debug, Serialize, Tabled)]
pub struct MaterialRow {
    #[tabled(rename = "Material")]
    pub name: String,
    #[tabled(rename = "k (W/m·K)", display_with = "display_opt")]
    pub conductivity: Option<f64>,
    #[tabled(rename = "Density (kg/m³)", display_with = "display_opt")]
    pub density: Option<f64>,
    #[tabled(rename = "Description image", display_with = "display_opt")]
    pub description_image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CitiesOutput {
    pub cities: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct FilmsOutput {
    pub city: String,
    pub assembly: String,
    pub films: FilmCoefficients,
    pub known: bool,
}

/// Output for draft commands
#[derive(Debug, Serialize)]
pub struct DraftOutput {
    pub city: String,
    pub assembly: String,
    pub layers: Vec<LayerRow>,
    pub total_thickness_mm: f64,
    pub total_width: f64,
    pub ruler_ticks: Vec<RulerTick>,
    pub problems: Vec<String>,
    pub calculable: bool,
}

#[derive(Debug, Serialize, Tabled)]
pub struct LayerRow {
    #[tabled(rename = "#")]
    pub position: usize,
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Material")]
    pub material: String,
    #[tabled(rename = "Thickness (mm)")]
    pub thickness_mm: f64,
    #[tabled(rename = "Width")]
    pub width: f64,
}

/// Per-layer row of a calculation result
#[derive(Debug, Serialize, Tabled)]
pub struct ResultLayerRow {
    #[tabled(rename = "Material")]
    pub material: String,
    #[tabled(rename = "Thickness (mm)")]
    pub thickness_mm: f64,
    #[tabled(rename = "k (W/m·K)")]
    pub conductivity: f64,
    #[tabled(rename = "Density (kg/m³)", display_with = "display_opt")]
    pub density: Option<f64>,
    #[tabled(rename = "R (m²·K/W)")]
    pub resistance: f64,
    #[tabled(rename = "Description image", display_with = "display_opt")]
    pub description_image: Option<String>,
}

/// Static versus dynamic comparison row
#[derive(Debug, Serialize, Tabled)]
pub struct SummaryRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Static", display_with = "display_opt")]
    pub static_value: Option<f64>,
    #[tabled(rename = "Dynamic", display_with = "display_opt")]
    pub dynamic_value: Option<f64>,
}

/// Output for calculate command
#[derive(Debug, Serialize)]
pub struct CalculateOutput {
    pub result: CalculationResult,
    pub films: FilmCoefficients,
    pub warm_state: WarmState,
    /// Session time including warm-up
    pub elapsed_ms: u128,
    pub saved: Option<SavedDesignRef>,
    pub share_link: Option<String>,
    pub save_warning: Option<String>,
}

/// Output for load command
#[derive(Debug, Serialize)]
pub struct LoadOutput {
    pub public_id: String,
    pub outcome: HydrationOutcome,
    pub design: Option<DraftOutput>,
    pub result: Option<CalculationResult>,
}

/// Output for doctor command
#[derive(Debug, Serialize)]
pub struct DoctorOutput {
    pub api_base: String,
    pub backend_base: String,
    pub config_error: Option<String>,
    pub health: bool,
    pub cities: bool,
    pub draft_path: String,
    pub draft_layers: Option<usize>,
}

#[derive(Debug, Serialize, Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}

fn display_opt<T: std::fmt::Display>(value: &Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "-".to_string(),
    }
}
