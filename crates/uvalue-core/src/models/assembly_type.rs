use crate::error::{Result, UvalueError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of envelope element being composed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AssemblyType {
    #[default]
    #[serde(rename = "wall")]
    Wall,

    /// Roof with upward heat flow
    #[serde(rename = "roof_up")]
    RoofUp,
}

impl AssemblyType {
    pub const ALL: [AssemblyType; 2] = [AssemblyType::Wall, AssemblyType::RoofUp];

    /// Key used on the wire and in query strings
    pub fn as_str(&self) -> &'static str {
        match self {
            AssemblyType::Wall => "wall",
            AssemblyType::RoofUp => "roof_up",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AssemblyType::Wall => "Wall",
            AssemblyType::RoofUp => "Roof",
        }
    }
}

impl fmt::Display for AssemblyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssemblyType {
    type Err = UvalueError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "wall" => Ok(AssemblyType::Wall),
            "roof_up" | "roof" | "roof-up" => Ok(AssemblyType::RoofUp),
            other => Err(UvalueError::ConfigInvalid {
                key: "assembly".to_string(),
                reason: format!("Unknown assembly type: {}. Use wall or roof_up", other),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assembly_type() {
        assert_eq!("wall".parse::<AssemblyType>().unwrap(), AssemblyType::Wall);
        assert_eq!("ROOF_UP".parse::<AssemblyType>().unwrap(), AssemblyType::RoofUp);
        assert_eq!("roof".parse::<AssemblyType>().unwrap(), AssemblyType::RoofUp);
        assert!("floor".parse::<AssemblyType>().is_err());
    }

    #[test]
    fn test_wire_keys() {
        assert_eq!(serde_json::to_string(&AssemblyType::RoofUp).unwrap(), "\"roof_up\"");
        let parsed: AssemblyType = serde_json::from_str("\"wall\"").unwrap();
        assert_eq!(parsed, AssemblyType::Wall);
        assert_eq!(AssemblyType::RoofUp.label(), "Roof");
    }
}
