use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One material as published by the catalog endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialEntry {
    pub name: String,

    /// Thermal conductivity, W/m·K
    #[serde(default, rename = "k")]
    pub conductivity: Option<f64>,

    /// Density, kg/m³
    #[serde(default, rename = "rho")]
    pub density: Option<f64>,

    #[serde(default, rename = "descriptionImage")]
    pub description_image: Option<String>,

    #[serde(default, rename = "graphicImage")]
    pub graphic_image: Option<String>,
}

impl MaterialEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            conductivity: None,
            density: None,
            description_image: None,
            graphic_image: None,
        }
    }

    pub fn description_image(&self) -> Option<&str> {
        non_empty(self.description_image.as_deref())
    }

    pub fn graphic_image(&self) -> Option<&str> {
        non_empty(self.graphic_image.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Outcome of resolving a layer's material key
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialLookup<'a> {
    Known(&'a MaterialEntry),
    Unknown(&'a str),
}

impl<'a> MaterialLookup<'a> {
    pub fn entry(&self) -> Option<&'a MaterialEntry> {
        match *self {
            MaterialLookup::Known(entry) => Some(entry),
            MaterialLookup::Unknown(_) => None,
        }
    }

    pub fn display_name(&self) -> &'a str {
        match *self {
            MaterialLookup::Known(entry) => &entry.name,
            MaterialLookup::Unknown(name) if name.trim().is_empty() => "unknown",
            MaterialLookup::Unknown(name) => name,
        }
    }
}

/// Read-only material catalog keyed by name, loaded once per session
#[derive(Debug, Clone, Default)]
pub struct MaterialCatalog {
    entries: HashMap<String, MaterialEntry>,
}

impl MaterialCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the endpoint's list; the first entry wins on duplicate names
    pub fn from_entries(entries: Vec<MaterialEntry>) -> Self {
        let mut map = HashMap::with_capacity(entries.len());
        for entry in entries {
            if map.contains_key(&entry.name) {
                tracing::warn!("Duplicate material '{}' in catalog, keeping the first", entry.name);
                continue;
            }
            map.insert(entry.name.clone(), entry);
        }
        Self { entries: map }
    }

    pub fn get(&self, name: &str) -> Option<&MaterialEntry> {
        self.entries.get(name)
    }

    /// Resolve a material key; unresolved keys degrade to `Unknown`
    pub fn resolve<'a>(&'a self, name: &'a str) -> MaterialLookup<'a> {
        match self.entries.get(name) {
            Some(entry) => MaterialLookup::Known(entry),
            None => MaterialLookup::Unknown(name),
        }
    }

    /// Names in picker order
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_by_key(|name| name.to_lowercase());
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
