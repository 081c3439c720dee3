use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{CampusError, Result};

/// Environment variable consulted when no API key is configured.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Top-level configuration for the campus assistant.
///
/// Loaded from `~/.campus/config.toml` by default. Every section falls back
/// to its defaults when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CampusConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub oracle: OracleConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl CampusConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: CampusConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| CampusError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// HTTP API port (bound on localhost).
    pub port: u16,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            port: 3040,
        }
    }
}

/// Conversation behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Number of trailing transcript turns sent to the oracle.
    pub history_window: usize,
    /// Maximum user message length in characters.
    pub max_message_length: usize,
    /// Assistant greeting that opens every transcript.
    pub greeting: String,
    /// Assistant reply recorded when the oracle cannot be reached.
    pub apology: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_window: 4,
            max_message_length: 2000,
            greeting: "Hello! I am your Campus Academic Assistant. I can help you find courses, \
                       study materials, and past questions. What is your department and level?"
                .to_string(),
            apology: "Oops! I ran into an issue. Let's try that again.".to_string(),
        }
    }
}

/// Hosted LLM settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// API key. When unset, `GEMINI_API_KEY` is consulted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model name.
    pub model: String,
    /// Base URL of the models endpoint.
    pub base_url: String,
    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-3-flash-preview".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl OracleConfig {
    /// Resolve the API key.
    ///
    /// Priority: config value > `GEMINI_API_KEY` env var. Blank values count
    /// as missing.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.resolve_api_key_from(std::env::var(API_KEY_ENV).ok())
    }

    /// Resolve the API key against an explicit environment value.
    pub fn resolve_api_key_from(&self, env_key: Option<String>) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| env_key.filter(|k| !k.trim().is_empty()))
    }
}

/// Catalog dataset settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Optional TOML dataset replacing the built-in seed data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_path: Option<String>,
    /// Artificial delay applied to every catalog query, in milliseconds.
    pub simulated_latency_ms: u64,
}
