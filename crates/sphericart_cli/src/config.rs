//! CLI configuration management
//!
//! Defaults are overridden by `sphericart.toml`, then by `SPHERICART_*`
//! environment variables, then by command-line flags.

use serde::Deserialize;
use sphericart_core::Precision;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Default configuration file, read when present.
pub const DEFAULT_CONFIG_FILE: &str = "sphericart.toml";

/// Largest degree that fits the `int32` argument slot.
pub const MAX_L_MAX: usize = i32::MAX as usize;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid precision: {0}. Must be one of: f32, f64")]
    InvalidPrecision(String),

    #[error("Invalid l_max: {0}. Must be between 0 and {max}", max = MAX_L_MAX)]
    InvalidLMax(String),

    #[error("Invalid boolean for {name}: {value}")]
    InvalidBool { name: &'static str, value: String },

    #[error("Configuration file error: {0}")]
    FileError(String),
}

/// Log levels accepted in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// Defaults applied to `compute` and `check`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Maximum degree
    pub l_max: usize,
    /// Project inputs on the unit sphere
    pub normalized: bool,
    /// Element precision
    #[serde(deserialize_with = "deserialize_precision")]
    pub precision: Precision,
    /// Fallback log level when `RUST_LOG` is unset
    pub log_level: LogLevel,
}

fn deserialize_precision<'de, D>(deserializer: D) -> Result<Precision, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Precision::from_str(&s).map_err(serde::de::Error::custom)
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            l_max: 4,
            normalized: false,
            precision: Precision::F64,
            log_level: LogLevel::Warn,
        }
    }
}

impl CliConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::FileError(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: CliConfig = toml::from_str(content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay `SPHERICART_*` variables from the process environment
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    /// Overlay `SPHERICART_*` variables resolved by `lookup`
    pub fn apply_vars<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(l_max) = lookup("SPHERICART_L_MAX") {
            self.l_max = l_max
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidLMax(l_max))?;
        }
        if let Some(normalized) = lookup("SPHERICART_NORMALIZED") {
            self.normalized = parse_bool("SPHERICART_NORMALIZED", &normalized)?;
        }
        if let Some(precision) = lookup("SPHERICART_PRECISION") {
            self.precision = precision
                .parse()
                .map_err(|_| ConfigError::InvalidPrecision(precision))?;
        }
        if let Some(log_level) = lookup("SPHERICART_LOG_LEVEL") {
            self.log_level = LogLevel::from_str(&log_level)?;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.l_max > MAX_L_MAX {
            return Err(ConfigError::InvalidLMax(self.l_max.to_string()));
        }
        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) -> Result<(), ConfigError> {
        if let Some(l_max) = cli.l_max {
            self.l_max = l_max;
        }
        if cli.normalized {
            self.normalized = true;
        }
        if let Some(precision) = &cli.precision {
            self.precision = precision
                .parse()
                .map_err(|_| ConfigError::InvalidPrecision(precision.clone()))?;
        }
        Ok(())
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            name,
            value: value.to_string(),
        }),
    }
}

/// Command-line overrides
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Explicit config file path
    pub config_file: Option<PathBuf>,
    /// Degree override
    pub l_max: Option<usize>,
    /// Force normalisation on
    pub normalized: bool,
    /// Precision override
    pub precision: Option<String>,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file (explicit, or `sphericart.toml` when present)
/// 4. Default values
pub fn build_config(cli: &CliArgs) -> Result<CliConfig, ConfigError> {
    let default_file = Path::new(DEFAULT_CONFIG_FILE);
    let mut config = match &cli.config_file {
        Some(path) => CliConfig::from_file(path)?,
        None if default_file.exists() => CliConfig::from_file(default_file)?,
        None => CliConfig::default(),
    };

    config.apply_env()?;
    config.merge_with_cli(cli)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.l_max, 4);
        assert!(!config.normalized);
        assert_eq!(config.precision, Precision::F64);
        assert_eq!(config.log_level, LogLevel::Warn);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("Info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("error").unwrap(), LogLevel::Error);
        assert!(LogLevel::from_str("loud").is_err());
    }

    #[test]
    fn test_toml_deserialization() {
        let config = CliConfig::from_toml(
            r#"
            l_max = 8
            normalized = true
            precision = "float32"
            log_level = "debug"
        "#,
        )
        .unwrap();
        assert_eq!(config.l_max, 8);
        assert!(config.normalized);
        assert_eq!(config.precision, Precision::F32);
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = CliConfig::from_toml("l_max = 2").unwrap();
        assert_eq!(config.l_max, 2);
        assert_eq!(config.precision, Precision::F64);
        assert!(!config.normalized);
    }

    #[test]
    fn test_toml_rejects_unknown_precision() {
        assert!(matches!(
            CliConfig::from_toml(r#"precision = "f16""#),
            Err(ConfigError::FileError(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = CliConfig::default();
        config
            .apply_vars(vars(&[
                ("SPHERICART_L_MAX", "6"),
                ("SPHERICART_NORMALIZED", "yes"),
                ("SPHERICART_PRECISION", "f32"),
                ("SPHERICART_LOG_LEVEL", "info"),
            ]))
            .unwrap();
        assert_eq!(config.l_max, 6);
        assert!(config.normalized);
        assert_eq!(config.precision, Precision::F32);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_env_rejects_bad_values() {
        let mut config = CliConfig::default();
        assert!(matches!(
            config.apply_vars(vars(&[("SPHERICART_L_MAX", "-1")])),
            Err(ConfigError::InvalidLMax(_))
        ));
        assert!(matches!(
            config.apply_vars(vars(&[("SPHERICART_NORMALIZED", "maybe")])),
            Err(ConfigError::InvalidBool { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_degree_beyond_int32() {
        let config = CliConfig {
            l_max: MAX_L_MAX + 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cli_args_merge() {
        let mut config = CliConfig::default();
        let cli = CliArgs {
            l_max: Some(9),
            normalized: true,
            precision: Some("single".to_string()),
            config_file: None,
        };
        config.merge_with_cli(&cli).unwrap();
        assert_eq!(config.l_max, 9);
        assert!(config.normalized);
        assert_eq!(config.precision, Precision::F32);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let cli = CliArgs {
            config_file: Some(PathBuf::from("/nonexistent/sphericart.toml")),
            ..Default::default()
        };
        assert!(matches!(build_config(&cli), Err(ConfigError::FileError(_))));
    }
}
