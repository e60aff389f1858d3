//! # Application Configuration
//!
//! Defines the server configuration and loads it from environment variables
//! (optionally sourced from a `.env` file by the binary entry point).

use config::{Config as ConfigBuilder, Environment};
use serde::Deserialize;

use learnmap_wiki::WIKIPEDIA_BASE_URL;

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The server configuration, loaded from the environment.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT`.
    #[serde(default = "default_port")]
    pub port: u16,
    /// The AI provider kind, `gemini` or `local`. Loaded from `AI_PROVIDER`.
    #[serde(default = "default_ai_provider")]
    pub ai_provider: String,
    /// The AI endpoint URL. Optional for `gemini`, where it can be derived
    /// from the model name. Loaded from `AI_API_URL`.
    #[serde(default)]
    pub ai_api_url: Option<String>,
    /// The AI API key. Required for `gemini`. Loaded from `AI_API_KEY`.
    #[serde(default)]
    pub ai_api_key: Option<String>,
    /// The model name. Loaded from `AI_MODEL`.
    #[serde(default = "default_ai_model")]
    pub ai_model: String,
    /// The Wikipedia base URL. Loaded from `WIKI_BASE_URL`; overridable so
    /// tests can point the fetcher at a mock server.
    #[serde(default = "default_wiki_base_url")]
    pub wiki_base_url: String,
    /// An exact frontend origin to allow via CORS. Loaded from
    /// `CORS_ALLOWED_ORIGIN`; unset means any origin.
    #[serde(default)]
    pub cors_allowed_origin: Option<String>,
    /// The maximum number of images embedded per explanation. Loaded from
    /// `MAX_IMAGES`.
    #[serde(default = "default_max_images")]
    pub max_images: usize,
}

fn default_port() -> u16 {
    9090
}

fn default_ai_provider() -> String {
    "gemini".to_string()
}

fn default_ai_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_wiki_base_url() -> String {
    WIKIPEDIA_BASE_URL.to_string()
}

fn default_max_images() -> usize {
    learnmap::constants::DEFAULT_MAX_IMAGES
}

/// Loads the configuration from the environment.
pub fn get_config() -> Result<AppConfig, ConfigError> {
    let builder = ConfigBuilder::builder()
        .add_source(Environment::default())
        .build()?;
    Ok(builder.try_deserialize::<AppConfig>()?)
}
