//! Configuration management for the KisanSahayak advisory backend
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with KISAN_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Generative AI service configuration
    pub gemini: GeminiConfig,

    /// Persistent cache configuration
    pub cache: CacheConfig,

    /// Connectivity monitor configuration
    pub connectivity: ConnectivityConfig,

    /// Fallback policy switches
    pub workflow: WorkflowConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeminiConfig {
    /// API key for the Generative Language API
    pub api_key: String,

    /// API base URL, without trailing slash
    pub base_url: String,

    /// Model identifier
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Sampling temperature for advisories
    pub advisory_temperature: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    /// Directory holding one JSON file per cache key
    pub directory: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ConnectivityConfig {
    /// Connectivity assumed at startup, before the host reports an edge
    pub initially_online: bool,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct WorkflowConfig {
    /// Fall back to the saved weekly plan when a fresh fetch fails
    pub weekly_plan_cache_fallback: bool,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("KISAN_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("gemini.api_key", "")?
            .set_default("gemini.base_url", DEFAULT_GEMINI_BASE_URL)?
            .set_default("gemini.model", DEFAULT_GEMINI_MODEL)?
            .set_default("gemini.timeout_secs", 30)?
            .set_default("gemini.advisory_temperature", 0.4)?
            .set_default("cache.directory", "data/cache")?
            .set_default("connectivity.initially_online", true)?
            .set_default("workflow.weekly_plan_cache_fallback", false)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (KISAN_ prefix)
            .add_source(
                Environment::with_prefix("KISAN")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            timeout_secs: 30,
            advisory_temperature: 0.4,
        }
    }
}
