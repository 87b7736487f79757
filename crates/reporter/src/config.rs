use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

use domain::services::ReportFormat;
use shared::validation::validate_hour_of_day;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub input: InputConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// JSON file holding an array of passenger records
    #[serde(default)]
    pub records_path: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportConfig {
    /// Cumulative cut-off: keep records up to and including this hour
    #[serde(default)]
    pub until_hour: Option<u8>,

    /// Field name to expected value (or list of accepted values)
    #[serde(default)]
    pub filters: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// json (summary report) or csv (filtered records)
    #[serde(default = "default_output_format")]
    pub format: String,

    /// Destination file; stdout when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_output_format(),
            path: None,
        }
    }
}

impl OutputConfig {
    pub fn report_format(&self) -> ReportFormat {
        ReportFormat::from_str(&self.format)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Default value functions
fn default_output_format() -> String {
    "json".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with PR__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("PR").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// This method creates a config entirely from defaults and overrides,
    /// without relying on config files (which may not be accessible during tests).
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [input]
            records_path = ""

            [report.filters]

            [output]
            format = "json"

            [logging]
            level = "info"
            format = "json"
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        // Skip validation in tests to allow partial configs
        Ok(cfg)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.input.records_path.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "PR__INPUT__RECORDS_PATH environment variable must be set".to_string(),
            ));
        }

        if let Some(hour) = self.report.until_hour {
            validate_hour_of_day(hour).map_err(|_| {
                ConfigValidationError::InvalidValue(format!(
                    "report.until_hour must be between 0 and 23, got {}",
                    hour
                ))
            })?;
        }

        Ok(())
    }
}
