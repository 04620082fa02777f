use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

use crate::validate::ValidatorOptions;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub watch: WatchConfig,
}

/// Validator tuning
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationConfig {
    /// Lower bound of the relationship-dimension scale (inclusive).
    #[serde(default = "default_score_min")]
    pub score_min: f64,
    /// Upper bound of the relationship-dimension scale (inclusive).
    #[serde(default = "default_score_max")]
    pub score_max: f64,
    /// Treat warnings as blocking.
    #[serde(default)]
    pub strict: bool,
    /// Check the shape of image and document locators.
    #[serde(default = "default_check_locators")]
    pub check_locators: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            score_min: default_score_min(),
            score_max: default_score_max(),
            strict: false,
            check_locators: default_check_locators(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Watch binary configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WatchConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_score_min() -> f64 {
    0.0
}

fn default_score_max() -> f64 {
    100.0
}

fn default_check_locators() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_debounce_ms() -> u64 {
    500
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in RELKB_CONFIG environment variable
    /// 2. ./relkb.toml in current directory
    ///
    /// When RELKB_CONFIG is unset and ./relkb.toml does not exist, defaults are used.
    pub fn load() -> Result<Self> {
        // Optional; a missing .env is fine
        let _ = dotenv::dotenv();

        let (config_path, explicit) = match std::env::var("RELKB_CONFIG") {
            Ok(p) => (PathBuf::from(p), true),
            Err(_) => (PathBuf::from("relkb.toml"), false),
        };

        if !explicit && !config_path.exists() {
            log::debug!("No relkb.toml found, using default configuration");
            return Ok(Self::default());
        }

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        Self::from_toml(&config_str)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(config_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(config_str).context("Failed to parse relkb.toml")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        let v = &self.validation;
        if !v.score_min.is_finite() || !v.score_max.is_finite() {
            anyhow::bail!("validation.score_min and validation.score_max must be finite numbers");
        }

        if v.score_min >= v.score_max {
            anyhow::bail!(
                "validation.score_min ({}) must be less than validation.score_max ({})",
                v.score_min,
                v.score_max
            );
        }

        if self.logging.log_level.trim().is_empty() {
            anyhow::bail!("logging.log_level must not be empty");
        }

        Ok(())
    }

    /// Validator options derived from the [validation] table
    pub fn validator_options(&self) -> ValidatorOptions {
        ValidatorOptions {
            score_min: self.validation.score_min,
            score_max: self.validation.score_max,
            check_locators: self.validation.check_locators,
        }
    }
}
