use crate::error::{Result, UvalueError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fmt::Display;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Default API root; the static-asset origin is this minus the trailing `/api`
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000/api";

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for the client
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub api_base: ConfigValue<String>,
    pub read_attempts: ConfigValue<u32>,
    pub read_backoff_ms: ConfigValue<u64>,
    pub backoff_growth: ConfigValue<f64>,
    pub read_timeout_ms: ConfigValue<u64>,
    pub calculate_attempts: ConfigValue<u32>,
    pub calculate_backoff_ms: ConfigValue<u64>,
    pub calculate_timeout_ms: ConfigValue<u64>,
    pub ready_max_wait_ms: ConfigValue<u64>,
    pub ready_poll_ms: ConfigValue<u64>,
    pub graphic_scale: ConfigValue<f64>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        let d = ConfigSource::Default;
        Self {
            api_base: ConfigValue::new(DEFAULT_API_BASE.to_string(), d),
            read_attempts: ConfigValue::new(6, d),
            read_backoff_ms: ConfigValue::new(1500, d),
            backoff_growth: ConfigValue::new(1.3, d),
            read_timeout_ms: ConfigValue::new(20_000, d),
            calculate_attempts: ConfigValue::new(3, d),
            calculate_backoff_ms: ConfigValue::new(1000, d),
            calculate_timeout_ms: ConfigValue::new(30_000, d),
            ready_max_wait_ms: ConfigValue::new(90_000, d),
            ready_poll_ms: ConfigValue::new(3000, d),
            graphic_scale: ConfigValue::new(2.0, d),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| UvalueError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| UvalueError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        let f = ConfigSource::File;
        if let Some(api_base) = file_config.api_base {
            self.api_base.update(api_base, f);
        }
        if let Some(v) = file_config.read_attempts {
            self.read_attempts.update(v, f);
        }
        if let Some(v) = file_config.read_backoff_ms {
            self.read_backoff_ms.update(v, f);
        }
        if let Some(v) = file_config.backoff_growth {
            self.backoff_growth.update(v, f);
        }
        if let Some(v) = file_config.read_timeout_ms {
            self.read_timeout_ms.update(v, f);
        }
        if let Some(v) = file_config.calculate_attempts {
            self.calculate_attempts.update(v, f);
        }
        if let Some(v) = file_config.calculate_backoff_ms {
            self.calculate_backoff_ms.update(v, f);
        }
        if let Some(v) = file_config.calculate_timeout_ms {
            self.calculate_timeout_ms.update(v, f);
        }
        if let Some(v) = file_config.ready_max_wait_ms {
            self.ready_max_wait_ms.update(v, f);
        }
        if let Some(v) = file_config.ready_poll_ms {
            self.ready_poll_ms.update(v, f);
        }
        if let Some(v) = file_config.graphic_scale {
            self.graphic_scale.update(v, f);
        }

        Ok(self)
    }

    /// Load the file only if it exists
    pub fn load_from_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        if path.as_ref().exists() {
            self.load_from_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        let e = ConfigSource::Environment;

        // UVALUE_API_BASE
        if let Ok(api_base) = env::var("UVALUE_API_BASE") {
            self.api_base.update(api_base, e);
        }

        if let Some(v) = env_value("UVALUE_READ_ATTEMPTS", "a positive integer") {
            self.read_attempts.update(v, e);
        }
        if let Some(v) = env_value("UVALUE_READ_BACKOFF_MS", "milliseconds") {
            self.read_backoff_ms.update(v, e);
        }
        if let Some(v) = env_value("UVALUE_BACKOFF_GROWTH", "a number > 1") {
            self.backoff_growth.update(v, e);
        }
        if let Some(v) = env_value("UVALUE_READ_TIMEOUT_MS", "milliseconds") {
            self.read_timeout_ms.update(v, e);
        }
        if let Some(v) = env_value("UVALUE_CALCULATE_ATTEMPTS", "a positive integer") {
            self.calculate_attempts.update(v, e);
        }
        if let Some(v) = env_value("UVALUE_CALCULATE_BACKOFF_MS", "milliseconds") {
            self.calculate_backoff_ms.update(v, e);
        }
        if let Some(v) = env_value("UVALUE_CALCULATE_TIMEOUT_MS", "milliseconds") {
            self.calculate_timeout_ms.update(v, e);
        }
        if let Some(v) = env_value("UVALUE_READY_MAX_WAIT_MS", "milliseconds") {
            self.ready_max_wait_ms.update(v, e);
        }
        if let Some(v) = env_value("UVALUE_READY_POLL_MS", "milliseconds") {
            self.ready_poll_ms.update(v, e);
        }
        if let Some(v) = env_value("UVALUE_GRAPHIC_SCALE", "display units per mm") {
            self.graphic_scale.update(v, e);
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(api_base) = overrides.api_base {
            self.api_base.update(api_base, ConfigSource::Cli);
        }

        if let Some(max_wait) = overrides.ready_max_wait_ms {
            self.ready_max_wait_ms.update(max_wait, ConfigSource::Cli);
        }

        if let Some(poll) = overrides.ready_poll_ms {
            self.ready_poll_ms.update(poll, ConfigSource::Cli);
        }
    }

    /// Reject values no policy can run with
    pub fn validate(&self) -> Result<()> {
        let base = self.api_base.value.trim();
        if base.is_empty() {
            return Err(UvalueError::ConfigMissing { key: "api_base".to_string() });
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(invalid("api_base", format!("'{}' is not an http(s) URL", base)));
        }
        if self.read_attempts.value == 0 {
            return Err(invalid("read_attempts", "must be at least 1"));
        }
        if self.calculate_attempts.value == 0 {
            return Err(invalid("calculate_attempts", "must be at least 1"));
        }
        if self.read_backoff_ms.value == 0 {
            return Err(invalid("read_backoff_ms", "must be greater than zero"));
        }
        // Read pauses must grow strictly between attempts
        if !(self.backoff_growth.value > 1.0 && self.backoff_growth.value.is_finite()) {
            return Err(invalid("backoff_growth", "must be a finite number > 1"));
        }
        if self.read_timeout_ms.value == 0 {
            return Err(invalid("read_timeout_ms", "must be greater than zero"));
        }
        if self.calculate_timeout_ms.value == 0 {
            return Err(invalid("calculate_timeout_ms", "must be greater than zero"));
        }
        if self.ready_poll_ms.value == 0 {
            return Err(invalid("ready_poll_ms", "must be greater than zero"));
        }
        if !(self.graphic_scale.value > 0.0 && self.graphic_scale.value.is_finite()) {
            return Err(invalid("graphic_scale", "must be a positive number"));
        }
        Ok(())
    }

    /// API root without a trailing slash
    pub fn api_base(&self) -> String {
        self.api_base.value.trim().trim_end_matches('/').to_string()
    }

    /// Origin serving `/static/*`: the API root minus a trailing `/api`
    pub fn backend_base(&self) -> String {
        let api = self.api_base();
        api.strip_suffix("/api").map(str::to_string).unwrap_or(api)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms.value)
    }

    pub fn calculate_timeout(&self) -> Duration {
        Duration::from_millis(self.calculate_timeout_ms.value)
    }

    pub fn ready_max_wait(&self) -> Duration {
        Duration::from_millis(self.ready_max_wait_ms.value)
    }

    pub fn ready_poll_interval(&self) -> Duration {
        Duration::from_millis(self.ready_poll_ms.value)
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        insert(&mut map, "api_base", &self.api_base);
        insert(&mut map, "read_attempts", &self.read_attempts);
        insert(&mut map, "read_backoff_ms", &self.read_backoff_ms);
        insert(&mut map, "backoff_growth", &self.backoff_growth);
        insert(&mut map, "read_timeout_ms", &self.read_timeout_ms);
        insert(&mut map, "calculate_attempts", &self.calculate_attempts);
        insert(&mut map, "calculate_backoff_ms", &self.calculate_backoff_ms);
        insert(&mut map, "calculate_timeout_ms", &self.calculate_timeout_ms);
        insert(&mut map, "ready_max_wait_ms", &self.ready_max_wait_ms);
        insert(&mut map, "ready_poll_ms", &self.ready_poll_ms);
        insert(&mut map, "graphic_scale", &self.graphic_scale);

        map
    }
}

fn insert<T: Display>(
    map: &mut HashMap<String, (String, ConfigSource)>,
    key: &str,
    value: &ConfigValue<T>,
) {
    map.insert(key.to_string(), (value.value.to_string(), value.source));
}

fn invalid(key: &str, reason: impl Into<String>) -> UvalueError {
    UvalueError::ConfigInvalid { key: key.to_string(), reason: reason.into() }
}

/// Parse an environment variable, warning and ignoring it when malformed
fn env_value<T: FromStr>(name: &str, expected: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Invalid {} value '{}': expected {}", name, raw, expected);
            None
        }
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    api_base: Option<String>,
    read_attempts: Option<u32>,
    read_backoff_ms: Option<u64>,
    backoff_growth: Option<f64>,
    read_timeout_ms: Option<u64>,
    calculate_attempts: Option<u32>,
    calculate_backoff_ms: Option<u64>,
    calculate_timeout_ms: Option<u64>,
    ready_max_wait_ms: Option<u64>,
    ready_poll_ms: Option<u64>,
    graphic_scale: Option<f64>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub api_base: Option<String>,
    pub ready_max_wait_ms: Option<u64>,
    pub ready_poll_ms: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = LayeredConfig::with_defaults();
        assert_eq!(config.api_base.value, DEFAULT_API_BASE);
        assert_eq!(config.api_base.source, ConfigSource::Default);
        assert_eq!(config.read_attempts.value, 6);
        assert_eq!(config.ready_poll_ms.value, 3000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_precedence() {
        let mut value = ConfigValue::new(100, ConfigSource::Default);

        // File should override default
        value.update(200, ConfigSource::File);
        assert_eq!(value.value, 200);
        assert_eq!(value.source, ConfigSource::File);

        // Environment should override file
        value.update(300, ConfigSource::Environment);
        assert_eq!(value.value, 300);

        // CLI should override environment
        value.update(400, ConfigSource::Cli);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);

        // Lower precedence should not override
        value.update(500, ConfigSource::File);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
api_base = "https://uvalue.example.org/api"
read_attempts = 4
backoff_growth = 2.0
ready_poll_ms = 500
"#
        )
        .unwrap();

        let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

        assert_eq!(config.api_base.value, "https://uvalue.example.org/api");
        assert_eq!(config.api_base.source, ConfigSource::File);
        assert_eq!(config.read_attempts.value, 4);
        assert_eq!(config.backoff_growth.value, 2.0);
        assert_eq!(config.ready_poll_ms.value, 500);
        assert_eq!(config.read_timeout_ms.source, ConfigSource::Default);
    }

    #[test]
    fn test_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "read_attempts = \"many\"").unwrap();

        let err = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, UvalueError::ConfigInvalid { ref key, .. } if key == "file"));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = LayeredConfig::with_defaults();

        config.update_from_cli(CliConfigOverrides {
            api_base: Some("http://localhost:9000/api".to_string()),
            ready_max_wait_ms: Some(5000),
            ready_poll_ms: None,
        });

        assert_eq!(config.api_base.source, ConfigSource::Cli);
        assert_eq!(config.ready_max_wait_ms.value, 5000);
        assert_eq!(config.ready_poll_ms.source, ConfigSource::Default);
    }

    #[test]
    fn test_backend_base_strips_api_suffix() {
        let mut config = LayeredConfig::with_defaults();
        assert_eq!(config.backend_base(), "http://127.0.0.1:8000");

        config.api_base.update("https://uvalue.example.org/api/".to_string(), ConfigSource::Cli);
        assert_eq!(config.api_base(), "https://uvalue.example.org/api");
        assert_eq!(config.backend_base(), "https://uvalue.example.org");

        let mut config = LayeredConfig::with_defaults();
        config.api_base.update("http://localhost:8000".to_string(), ConfigSource::Cli);
        assert_eq!(config.backend_base(), "http://localhost:8000");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = LayeredConfig::with_defaults();
        config.read_attempts.update(0, ConfigSource::Cli);
        assert!(matches!(
            config.validate(),
            Err(UvalueError::ConfigInvalid { ref key, .. }) if key == "read_attempts"
        ));

        let mut config = LayeredConfig::with_defaults();
        config.api_base.update("ftp://example.org".to_string(), ConfigSource::Cli);
        assert!(config.validate().is_err());

        let mut config = LayeredConfig::with_defaults();
        config.backoff_growth.update(0.5, ConfigSource::Cli);
        assert!(config.validate().is_err());
    }

    fn rejected_key(config: &LayeredConfig) -> Option<String> {
        match config.validate() {
            Err(UvalueError::ConfigInvalid { key, .. }) => Some(key),
            _ => None,
        }
    }

    #[test]
    fn test_validate_requires_growing_read_backoff() {
        let mut config = LayeredConfig::with_defaults();
        config.backoff_growth.update(1.0, ConfigSource::Cli);
        assert_eq!(rejected_key(&config).as_deref(), Some("backoff_growth"));

        let mut config = LayeredConfig::with_defaults();
        config.read_backoff_ms.update(0, ConfigSource::Cli);
        assert_eq!(rejected_key(&config).as_deref(), Some("read_backoff_ms"));

        let mut config = LayeredConfig::with_defaults();
        config.backoff_growth.update(1.01, ConfigSource::Cli);
        config.read_backoff_ms.update(1, ConfigSource::Cli);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_timeouts() {
        let mut config = LayeredConfig::with_defaults();
        config.read_timeout_ms.update(0, ConfigSource::Cli);
        assert_eq!(rejected_key(&config).as_deref(), Some("read_timeout_ms"));

        let mut config = LayeredConfig::with_defaults();
        config.calculate_timeout_ms.update(0, ConfigSource::Cli);
        assert_eq!(rejected_key(&config).as_deref(), Some("calculate_timeout_ms"));
    }

    #[test]
    fn test_inspection_map() {
        let config = LayeredConfig::with_defaults();
        let map = config.to_inspection_map();

        assert_eq!(map.len(), 11);
        let (poll, source) = &map["ready_poll_ms"];
        assert_eq!(poll, "3000");
        assert_eq!(*source, ConfigSource::Default);
    }
}
