//! Integration tests for layered configuration
//!
//! These tests verify that configuration loading follows the correct precedence:
//! CLI arguments > Environment variables > Config file > Defaults

use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;
use uvalue_core::config::{CliConfigOverrides, ConfigSource, LayeredConfig};

fn clear_env() {
    for key in [
        "UVALUE_API_BASE",
        "UVALUE_READ_ATTEMPTS",
        "UVALUE_READY_POLL_MS",
        "UVALUE_BACKOFF_GROWTH",
    ] {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_env();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
api_base = "https://file.example.org/api"
read_attempts = 2
"#
    )
    .unwrap();

    env::set_var("UVALUE_API_BASE", "https://env.example.org/api");

    let config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    assert_eq!(config.api_base.value, "https://env.example.org/api");
    assert_eq!(config.api_base.source, ConfigSource::Environment);
    assert_eq!(config.read_attempts.value, 2);
    assert_eq!(config.read_attempts.source, ConfigSource::File);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_environment_value_is_ignored() {
    clear_env();
    env::set_var("UVALUE_READ_ATTEMPTS", "lots");
    env::set_var("UVALUE_BACKOFF_GROWTH", "1.5");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.read_attempts.value, 6);
    assert_eq!(config.read_attempts.source, ConfigSource::Default);
    assert_eq!(config.backoff_growth.value, 1.5);
    assert_eq!(config.backoff_growth.source, ConfigSource::Environment);

    clear_env();
}

#[test]
#[serial]
fn test_cli_beats_everything() {
    clear_env();
    env::set_var("UVALUE_READY_POLL_MS", "1000");

    let mut config = LayeredConfig::with_defaults().load_from_env();
    config.update_from_cli(CliConfigOverrides {
        api_base: None,
        ready_max_wait_ms: None,
        ready_poll_ms: Some(250),
    });

    assert_eq!(config.ready_poll_ms.value, 250);
    assert_eq!(config.ready_poll_ms.source, ConfigSource::Cli);

    clear_env();
}

#[test]
#[serial]
fn test_missing_optional_file_keeps_defaults() {
    clear_env();
    let config = LayeredConfig::with_defaults()
        .load_from_optional_file("/nonexistent/uvalue/config.toml")
        .unwrap();

    assert_eq!(config.api_base.source, ConfigSource::Default);
}
