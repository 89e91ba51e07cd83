//! # Application Configuration
//!
//! Defines the configuration structure for `mealsnap-server` and the logic
//! for loading it from an optional `config.yml` plus environment
//! variables. The file may reference environment variables with `${VAR}`
//! placeholders; prefixed `MEALSNAP_...` variables override nested keys.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fs;
use tracing::info;

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates a required configuration file was not found.
    NotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Path to the ingredient synonym file; a missing file just disables
    /// synonym mapping.
    #[serde(default = "default_synonyms_path")]
    pub synonyms_path: String,
    /// Base URL of the image preprocessing service. Optional: when unset,
    /// images go to the vision model untouched.
    #[serde(default)]
    pub preprocess_api_url: Option<String>,
    /// Base URL of the nutrition estimation service. Optional: when unset,
    /// recipes keep their model-generated nutrition values.
    #[serde(default)]
    pub nutrition_api_url: Option<String>,
    /// A map of named AI provider configurations. The `vision` entry
    /// serves ingredient detection, the `recipes` entry recipe
    /// generation.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_port() -> u16 {
    8000
}

fn default_synonyms_path() -> String {
    "synonyms.json".to_string()
}

/// A reusable configuration for a specific AI provider instance.
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// The type of provider ("gemini", "anthropic", or "local").
    pub provider: String,
    /// The API URL. Optional for hosted providers where it can be derived
    /// from the model name.
    pub api_url: Option<String>,
    /// The API key, which can be null for local providers.
    pub api_key: Option<String>,
    pub model_name: String,
}

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist, or an error if it fails to read.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !std::path::Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}").unwrap();
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_else(|_| "".to_string())
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration.
///
/// Sources are layered: the YAML file (the override path if given, else
/// `config.yml` next to the manifest, which may be absent), then plain
/// environment variables for top-level keys like `PORT`, then
/// `MEALSNAP_`-prefixed variables for nested overrides (e.g.
/// `MEALSNAP_PROVIDERS__VISION__API_KEY`).
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = ConfigBuilder::builder();

    match config_path_override {
        Some(path) => {
            let content = read_and_substitute(path)?.ok_or_else(|| {
                ConfigError::NotFound(format!("Config file not found at '{path}'."))
            })?;
            builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
        }
        None => {
            let default_path = format!("{}/config.yml", env!("CARGO_MANIFEST_DIR"));
            if let Some(content) = read_and_substitute(&default_path)? {
                info!("Loading configuration from '{default_path}'.");
                builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
            }
        }
    }

    let settings = builder
        // Environment variables for top-level keys like PORT.
        .add_source(Environment::default())
        // Prefixed environment variables for deeper overrides.
        .add_source(
            Environment::with_prefix("MEALSNAP")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    let config: AppConfig = settings.try_deserialize()?;
    Ok(config)
}
