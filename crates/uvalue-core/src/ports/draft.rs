use crate::assembly::AssemblyDesign;
use crate::error::Result;

/// Port for the local, same-device draft slot
///
/// Holds `{layers, city, assembly}` only; never authoritative over shared links.
pub trait DraftStore: Send + Sync {
    /// Read the stored draft, if any
    fn load(&self) -> Result<Option<AssemblyDesign>>;

    /// Overwrite the stored draft
    fn save(&self, design: &AssemblyDesign) -> Result<()>;

    /// Forget the stored draft
    fn clear(&self) -> Result<()>;
}
