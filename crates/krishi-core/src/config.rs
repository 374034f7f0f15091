use crate::error::{KrishiError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

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

/// Layered configuration for KrishiMitra
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// Directory holding the transform/index/catalog artifact bundle
    pub artifact_dir: ConfigValue<PathBuf>,

    /// Number of crop recommendations returned by the retrieval flow
    pub top_k: ConfigValue<usize>,

    /// Forecast window summarized into replies, in hours
    pub forecast_window_hours: ConfigValue<u32>,

    /// Base URL of the OpenAI-compatible language-model endpoint
    pub llm_base_url: ConfigValue<String>,

    /// Model used for classification and refinement
    pub llm_model: ConfigValue<String>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            artifact_dir: ConfigValue::new(PathBuf::from("artifacts"), ConfigSource::Default),
            top_k: ConfigValue::new(5, ConfigSource::Default),
            forecast_window_hours: ConfigValue::new(24, ConfigSource::Default),
            llm_base_url: ConfigValue::new(
                "https://api.openai.com/v1".to_string(),
                ConfigSource::Default,
            ),
            llm_model: ConfigValue::new("gpt-4o-mini".to_string(), ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| KrishiError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| KrishiError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        // Update values from file
        if let Some(artifact_dir) = file_config.artifact_dir {
            self.artifact_dir.update(artifact_dir, ConfigSource::File);
        }

        if let Some(top_k) = file_config.top_k {
            self.top_k.update(top_k, ConfigSource::File);
        }

        if let Some(hours) = file_config.forecast_window_hours {
            self.forecast_window_hours.update(hours, ConfigSource::File);
        }

        if let Some(llm_base_url) = file_config.llm_base_url {
            self.llm_base_url.update(llm_base_url, ConfigSource::File);
        }

        if let Some(llm_model) = file_config.llm_model {
            self.llm_model.update(llm_model, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // KRISHI_ARTIFACT_DIR
        if let Ok(dir) = env::var("KRISHI_ARTIFACT_DIR") {
            self.artifact_dir.update(PathBuf::from(dir), ConfigSource::Environment);
        }

        // KRISHI_TOP_K
        if let Ok(top_k_str) = env::var("KRISHI_TOP_K") {
            match top_k_str.parse::<usize>() {
                Ok(top_k) if top_k >= 1 => self.top_k.update(top_k, ConfigSource::Environment),
                _ => tracing::warn!(
                    "Invalid KRISHI_TOP_K value '{}': expected a positive integer",
                    top_k_str
                ),
            }
        }

        // KRISHI_FORECAST_HOURS
        if let Ok(hours_str) = env::var("KRISHI_FORECAST_HOURS") {
            match hours_str.parse::<u32>() {
                Ok(hours) => self.forecast_window_hours.update(hours, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid KRISHI_FORECAST_HOURS value '{}': expected hours as an integer",
                    hours_str
                ),
            }
        }

        // KRISHI_LLM_BASE_URL
        if let Ok(base_url) = env::var("KRISHI_LLM_BASE_URL") {
            self.llm_base_url.update(base_url, ConfigSource::Environment);
        }

        // KRISHI_LLM_MODEL
        if let Ok(model) = env::var("KRISHI_LLM_MODEL") {
            self.llm_model.update(model, ConfigSource::Environment);
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(artifact_dir) = overrides.artifact_dir {
            self.artifact_dir.update(artifact_dir, ConfigSource::Cli);
        }

        if let Some(top_k) = overrides.top_k {
            self.top_k.update(top_k, ConfigSource::Cli);
        }

        if let Some(hours) = overrides.forecast_window_hours {
            self.forecast_window_hours.update(hours, ConfigSource::Cli);
        }

        if let Some(llm_base_url) = overrides.llm_base_url {
            self.llm_base_url.update(llm_base_url, ConfigSource::Cli);
        }

        if let Some(llm_model) = overrides.llm_model {
            self.llm_model.update(llm_model, ConfigSource::Cli);
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "artifact_dir".to_string(),
            (self.artifact_dir.value.display().to_string(), self.artifact_dir.source),
        );

        map.insert(
            "top_k".to_string(),
            (self.top_k.value.to_string(), self.top_k.source),
        );

        map.insert(
            "forecast_window_hours".to_string(),
            (self.forecast_window_hours.value.to_string(), self.forecast_window_hours.source),
        );

        map.insert(
            "llm_base_url".to_string(),
            (self.llm_base_url.value.clone(), self.llm_base_url.source),
        );

        map.insert(
            "llm_model".to_string(),
            (self.llm_model.value.clone(), self.llm_model.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    artifact_dir: Option<PathBuf>,
    top_k: Option<usize>,
    forecast_window_hours: Option<u32>,
    llm_base_url: Option<String>,
    llm_model: Option<String>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub artifact_dir: Option<PathBuf>,
    pub top_k: Option<usize>,
    pub forecast_window_hours: Option<u32>,
    pub llm_base_url: Option<String>,
    pub llm_model: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = LayeredConfig::with_defaults();
        assert_eq!(config.artifact_dir.value, PathBuf::from("artifacts"));
        assert_eq!(config.artifact_dir.source, ConfigSource::Default);
        assert_eq!(config.top_k.value, 5);
        assert_eq!(config.forecast_window_hours.value, 24);
        assert_eq!(config.llm_model.value, "gpt-4o-mini");
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
        assert_eq!(value.source, ConfigSource::Environment);

        // CLI should override environment
        value.update(400, ConfigSource::Cli);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);

        // Lower precedence should not override
        value.update(500, ConfigSource::File);
        assert_eq!(value.value, 400); // Still CLI value
        assert_eq!(value.source, ConfigSource::Cli);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
artifact_dir = "/srv/krishi/artifacts"
top_k = 8
forecast_window_hours = 48
llm_model = "gpt-4o"
"#
        )
        .unwrap();

        let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

        assert_eq!(config.artifact_dir.value, PathBuf::from("/srv/krishi/artifacts"));
        assert_eq!(config.artifact_dir.source, ConfigSource::File);
        assert_eq!(config.top_k.value, 8);
        assert_eq!(config.forecast_window_hours.value, 48);
        assert_eq!(config.llm_model.value, "gpt-4o");
        // Not set in the file
        assert_eq!(config.llm_base_url.source, ConfigSource::Default);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = LayeredConfig::with_defaults();

        let overrides = CliConfigOverrides {
            artifact_dir: Some(PathBuf::from("/tmp/bundle")),
            top_k: Some(3),
            forecast_window_hours: None,
            llm_base_url: None,
            llm_model: None,
        };

        config.update_from_cli(overrides);

        assert_eq!(config.artifact_dir.value, PathBuf::from("/tmp/bundle"));
        assert_eq!(config.artifact_dir.source, ConfigSource::Cli);
        assert_eq!(config.top_k.value, 3);
        assert_eq!(config.top_k.source, ConfigSource::Cli);
        // These should still be defaults
        assert_eq!(config.forecast_window_hours.source, ConfigSource::Default);
        assert_eq!(config.llm_model.source, ConfigSource::Default);
    }

    #[test]
    fn test_inspection_map() {
        let config = LayeredConfig::with_defaults();
        let map = config.to_inspection_map();

        assert!(map.contains_key("artifact_dir"));
        assert!(map.contains_key("top_k"));
        assert!(map.contains_key("forecast_window_hours"));
        assert!(map.contains_key("llm_base_url"));
        assert!(map.contains_key("llm_model"));

        let (top_k_value, top_k_source) = &map["top_k"];
        assert_eq!(top_k_value, "5");
        assert_eq!(*top_k_source, ConfigSource::Default);
    }
}
