use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;

use crate::models::DEFAULT_LIST_DELIMITER;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub suggestions: SuggestionSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_form_groups")]
    pub form_groups: bool,
    #[serde(default = "default_list_delimiter")]
    pub list_delimiter: String,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            form_groups: default_form_groups(),
            list_delimiter: default_list_delimiter(),
        }
    }
}

impl MatchingSettings {
    /// Separator for multi-valued roster fields; falls back to `;` when unset
    pub fn delimiter(&self) -> char {
        self.list_delimiter.chars().next().unwrap_or(DEFAULT_LIST_DELIMITER)
    }
}

fn default_form_groups() -> bool { true }
fn default_list_delimiter() -> String { DEFAULT_LIST_DELIMITER.to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            parallel_threshold: default_parallel_threshold(),
        }
    }
}

fn default_parallel_threshold() -> usize { 64 }

#[derive(Debug, Clone, Deserialize)]
pub struct SuggestionSettings {
    #[serde(default = "default_full_score")]
    pub full_score: u32,
}

impl Default for SuggestionSettings {
    fn default() -> Self {
        Self {
            full_score: default_full_score(),
        }
    }
}

fn default_full_score() -> u32 { 5 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with BRIDGE__), after `.env` is read
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., BRIDGE__MATCHING__FORM_GROUPS -> matching.form_groups
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Parse configuration from TOML text, without environment overrides
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("BRIDGE")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
