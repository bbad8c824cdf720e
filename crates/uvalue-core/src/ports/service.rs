use crate::error::Result;
use crate::models::{
    AssemblyType, CalculationRequest, CalculationResult, FilmCoefficients, MaterialEntry,
    SaveDesignRequest, SavedDesign, SavedDesignRef,
};
use async_trait::async_trait;

/// Port for the remote calculation service
///
/// Each operation carries its own retry policy; callers see only the final outcome.
#[async_trait]
pub trait EnvelopeService: Send + Sync {
    /// Fetch the material catalog
    async fn materials(&self) -> Result<Vec<MaterialEntry>>;

    /// Fetch the selectable climate locations
    async fn cities(&self) -> Result<Vec<String>>;

    /// Fetch film coefficients; failures degrade to zeros instead of erroring
    async fn films(&self, city: &str, assembly: AssemblyType) -> FilmCoefficients;

    /// Submit a design for calculation
    async fn calculate(&self, request: &CalculationRequest) -> Result<CalculationResult>;

    /// Persist a calculated design; creates a new record on every call
    async fn save_design(&self, request: &SaveDesignRequest) -> Result<SavedDesignRef>;

    /// Retrieve a saved design; `None` when the id is unknown
    async fn load_design(&self, public_id: &str) -> Result<Option<SavedDesign>>;
}
