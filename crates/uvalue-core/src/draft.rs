//! Draft store adapters
//!
//! The in-memory store uses `RwLock::unwrap()` intentionally. Lock poisoning
//! only occurs when another thread panicked while holding the lock, which is
//! an unrecoverable state.

use crate::assembly::AssemblyDesign;
use crate::error::{Result, UvalueError};
use crate::ports::DraftStore;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// In-memory draft slot for tests and ephemeral sessions
#[derive(Debug, Clone, Default)]
pub struct MemoryDraftStore {
    slot: Arc<RwLock<Option<AssemblyDesign>>>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a draft already present
    pub fn with_draft(design: AssemblyDesign) -> Self {
        Self { slot: Arc::new(RwLock::new(Some(design))) }
    }
}

impl DraftStore for MemoryDraftStore {
    fn load(&self) -> Result<Option<AssemblyDesign>> {
        Ok(self.slot.read().unwrap().clone())
    }

    fn save(&self, design: &AssemblyDesign) -> Result<()> {
        *self.slot.write().unwrap() = Some(design.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot.write().unwrap() = None;
        Ok(())
    }
}

/// JSON file draft slot
#[derive(Debug, Clone)]
pub struct FileDraftStore {
    path: PathBuf,
}

impl FileDraftStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DraftStore for FileDraftStore {
    fn load(&self) -> Result<Option<AssemblyDesign>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        let design = serde_json::from_str(&content).map_err(|e| {
            UvalueError::Serialization(format!(
                "Failed to parse draft {}: {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(Some(design))
    }

    fn save(&self, design: &AssemblyDesign) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Replace atomically via a sibling temp file
        let content = serde_json::to_string_pretty(design)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
