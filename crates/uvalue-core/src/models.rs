pub mod assembly_type;
pub mod catalog;
pub mod films;
pub mod layer;
pub mod request;
pub mod result;
pub mod saved;

pub use assembly_type::AssemblyType;
pub use catalog::{MaterialCatalog, MaterialEntry, MaterialLookup};
pub use films::FilmCoefficients;
pub use layer::{Layer, LayerId, LayerPayload};
pub use request::{CalculationRequest, ResistanceOverrides};
pub use result::{CalculationResult, LayerResistance, ThermalBranch};
pub use saved::{SaveDesignRequest, SavedDesign, SavedDesignRef};
