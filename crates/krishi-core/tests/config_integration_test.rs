//! Integration tests for layered configuration
//!
//! These tests verify that configuration loading follows the correct
//! precedence: CLI arguments > Environment variables > Config file > Defaults

use krishi_core::config::{CliConfigOverrides, ConfigSource, LayeredConfig};
use serial_test::serial;
use std::env;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn clear_env() {
    for key in [
        "KRISHI_ARTIFACT_DIR",
        "KRISHI_TOP_K",
        "KRISHI_FORECAST_HOURS",
        "KRISHI_LLM_BASE_URL",
        "KRISHI_LLM_MODEL",
    ] {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_default_configuration() {
    clear_env();
    let config = LayeredConfig::with_defaults();

    assert_eq!(config.artifact_dir.value, PathBuf::from("artifacts"));
    assert_eq!(config.artifact_dir.source, ConfigSource::Default);
    assert_eq!(config.top_k.value, 5);
    assert_eq!(config.forecast_window_hours.value, 24);
    assert_eq!(config.llm_base_url.value, "https://api.openai.com/v1");
    assert_eq!(config.llm_model.value, "gpt-4o-mini");
}

#[test]
#[serial]
fn test_env_overrides_file() {
    clear_env();

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
top_k = 8
llm_model = "from-file"
"#
    )
    .unwrap();

    env::set_var("KRISHI_TOP_K", "3");

    let config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    // Environment wins over file
    assert_eq!(config.top_k.value, 3);
    assert_eq!(config.top_k.source, ConfigSource::Environment);
    // File value untouched by env
    assert_eq!(config.llm_model.value, "from-file");
    assert_eq!(config.llm_model.source, ConfigSource::File);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_env_values_are_ignored() {
    clear_env();

    env::set_var("KRISHI_TOP_K", "zero");
    env::set_var("KRISHI_FORECAST_HOURS", "-4");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.top_k.value, 5);
    assert_eq!(config.top_k.source, ConfigSource::Default);
    assert_eq!(config.forecast_window_hours.value, 24);

    clear_env();
}

#[test]
#[serial]
fn test_cli_overrides_env() {
    clear_env();

    env::set_var("KRISHI_ARTIFACT_DIR", "/from/env");

    let mut config = LayeredConfig::with_defaults().load_from_env();
    config.update_from_cli(CliConfigOverrides {
        artifact_dir: Some(PathBuf::from("/from/cli")),
        ..Default::default()
    });

    assert_eq!(config.artifact_dir.value, PathBuf::from("/from/cli"));
    assert_eq!(config.artifact_dir.source, ConfigSource::Cli);

    clear_env();
}
