//! # Application Configuration
//!
//! This module defines the configuration structure for the `funr-server` and
//! provides the logic for loading it from a `config.yml` file and environment
//! variables, then validating it before the server starts.

use config::{Config as ConfigBuilder, Environment, File, FileFormat, Map};
use funr::prompts::tasks::{RESTAURANT_NAME_SYSTEM_PROMPT, RESTAURANT_NAME_USER_PROMPT};
use funr::providers::metadata::apify::DEFAULT_APIFY_API_URL;
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fs;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// A custom error type for configuration issues.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    #[error("Configuration error: {0}")]
    General(String),
    /// Indicates a required configuration file was not found.
    #[error("{0}")]
    NotFound(String),
    /// A provider credential is absent or empty.
    #[error("Missing credential: {0}")]
    MissingCredential(String),
    #[error("Unsupported AI provider '{0}'. Expected 'openai' or 'gemini'.")]
    UnsupportedProvider(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

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
    /// The AI provider used to name restaurants.
    #[serde(default)]
    pub inference: InferenceConfig,
    /// The scraping provider used to resolve post metadata.
    #[serde(default)]
    pub metadata: MetadataConfig,
}

/// Provides a default value for the `port` field if not set in the environment.
fn default_port() -> u16 {
    5000
}

/// Configuration for the AI provider behind restaurant name inference.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct InferenceConfig {
    /// The type of provider ("openai" or "gemini").
    pub provider: String,
    /// The API URL. Optional; derived from the provider type when absent.
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub model_name: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    pub system_prompt: String,
    pub user_prompt: String,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            api_url: None,
            api_key: None,
            model_name: "gpt-4o-mini".to_string(),
            max_tokens: 50,
            timeout_secs: 30,
            system_prompt: RESTAURANT_NAME_SYSTEM_PROMPT.to_string(),
            user_prompt: RESTAURANT_NAME_USER_PROMPT.to_string(),
        }
    }
}

impl InferenceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Configuration for the Apify metadata provider.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MetadataConfig {
    pub api_url: String,
    pub api_token: Option<String>,
    pub timeout_secs: u64,
    pub use_proxy: bool,
    pub proxy_groups: Vec<String>,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_APIFY_API_URL.to_string(),
            api_token: None,
            timeout_secs: 120,
            use_proxy: true,
            proxy_groups: vec!["RESIDENTIAL".to_string()],
        }
    }
}

impl MetadataConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map(str::trim).unwrap_or_default().is_empty()
}

impl AppConfig {
    /// Checks that every provider can be built from this configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if is_blank(&self.metadata.api_token) {
            return Err(ConfigError::MissingCredential(
                "metadata.api_token (set APIFY_API_TOKEN)".to_string(),
            ));
        }
        if self.metadata.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "metadata.timeout_secs must be greater than zero".to_string(),
            ));
        }

        match self.inference.provider.as_str() {
            // A key is only optional for self-hosted OpenAI-compatible servers.
            "openai" if self.inference.api_url.is_none() && is_blank(&self.inference.api_key) => {
                return Err(ConfigError::MissingCredential(
                    "inference.api_key (set OPENAI_API_KEY)".to_string(),
                ));
            }
            "gemini" if is_blank(&self.inference.api_key) => {
                return Err(ConfigError::MissingCredential(
                    "inference.api_key (set AI_API_KEY)".to_string(),
                ));
            }
            "openai" | "gemini" => {}
            other => return Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
        if self.inference.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "inference.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.inference.max_tokens == 0 {
            return Err(ConfigError::Invalid(
                "inference.max_tokens must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist, or an error if it fails to read.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !std::path::Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(e.to_string()))?;
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_default()
    });

    Ok(Some(expanded_content.to_string()))
}

fn env_non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Loads the application configuration from a file and environment variables.
///
/// - Programmatic defaults come first.
/// - The YAML file is next: `config_path_override` if given (it must exist),
///   otherwise `config.yml` beside the server manifest when present.
///   `${VAR}` placeholders inside it are substituted from the environment.
/// - `PORT` overrides the port.
/// - `FUNR_...` variables override everything above, `PORT` included
///   (e.g., `FUNR_METADATA__TIMEOUT_SECS`, `FUNR_PORT`).
/// - Finally, empty credentials fall back to `OPENAI_API_KEY`/`AI_API_KEY`
///   and `APIFY_API_TOKEN`.
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let base_path = env!("CARGO_MANIFEST_DIR");
    let mut builder = ConfigBuilder::builder()
        .set_default("port", i64::from(default_port()))?;

    match config_path_override {
        Some(path) => {
            let content = read_and_substitute(path)?.ok_or_else(|| {
                ConfigError::NotFound(format!("Config file not found at '{path}'."))
            })?;
            info!("Loading configuration from '{path}'.");
            builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
        }
        None => {
            let user_config_path = format!("{base_path}/config.yml");
            if let Some(content) = read_and_substitute(&user_config_path)? {
                info!("Loading user-defined configuration from '{user_config_path}'.");
                builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
            } else {
                info!("'{user_config_path}' not found. Using defaults and environment variables.");
            }
        }
    }

    // `PORT` is read from a one-entry map so the `FUNR_` source below outranks it.
    let mut port_env = Map::new();
    if let Some(port) = env_non_empty("PORT") {
        port_env.insert("PORT".to_string(), port);
    }

    let settings = builder
        .add_source(Environment::default().source(Some(port_env)).try_parsing(true))
        .add_source(
            Environment::with_prefix("FUNR")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    // Deserialize the fully resolved configuration into our `AppConfig` struct.
    let mut config: AppConfig = settings.try_deserialize()?;

    if is_blank(&config.inference.api_key) {
        let fallback = match config.inference.provider.as_str() {
            "gemini" => env_non_empty("AI_API_KEY"),
            _ => env_non_empty("OPENAI_API_KEY").or_else(|| env_non_empty("AI_API_KEY")),
        };
        if fallback.is_some() {
            config.inference.api_key = fallback;
        }
    }
    if is_blank(&config.metadata.api_token) {
        if let Some(token) = env_non_empty("APIFY_API_TOKEN") {
            config.metadata.api_token = Some(token);
        }
    }

    Ok(config)
}
