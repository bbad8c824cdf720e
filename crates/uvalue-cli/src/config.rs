//! Configuration loading for CLI commands

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use uvalue_core::config::{CliConfigOverrides, LayeredConfig};

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "uvalue.toml";

/// Load layered configuration: defaults, file, environment, then CLI overrides
///
/// An explicit path must exist; the default file is optional.
pub fn load_config(explicit: Option<&Path>, overrides: CliConfigOverrides) -> Result<LayeredConfig> {
    let config = match explicit {
        Some(path) => LayeredConfig::with_defaults()
            .load_from_file(path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?,
        None => LayeredConfig::with_defaults()
            .load_from_optional_file(default_config_path())
            .context("Failed to load configuration file")?,
    };

    let mut config = config.load_from_env();
    config.update_from_cli(overrides);
    Ok(config)
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}
