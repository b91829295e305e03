//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use crate::state::DEFAULT_LOG_DISPLAY_LIMIT;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Default Gemini API base URL
pub const DEFAULT_GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default Gemini model used for translation
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Application configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Agent dashboard configuration
    pub agents: AgentsConfig,
    /// Translation service configuration
    pub translation: TranslationConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
    /// Largest accepted upload body in bytes
    pub max_upload_bytes: usize,
}

/// Agent dashboard configuration
#[derive(Debug, Clone)]
pub struct AgentsConfig {
    /// Seconds between heartbeat entries of a running agent
    pub heartbeat_interval_secs: u64,
    /// Number of log lines shown per agent
    pub log_display_limit: usize,
}

/// Translation service configuration
#[derive(Clone)]
pub struct TranslationConfig {
    /// Gemini API key (empty = not configured)
    pub api_key: String,
    /// Gemini model name
    pub model: String,
    /// Gemini API base URL
    pub api_base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval_secs: 2,
            log_display_limit: DEFAULT_LOG_DISPLAY_LIMIT,
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_base_url: DEFAULT_GEMINI_API_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

// Keep the API key out of startup logs
impl std::fmt::Debug for TranslationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationConfig")
            .field("api_key_set", &!self.api_key.is_empty())
            .field("model", &self.model)
            .field("api_base_url", &self.api_base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Parse an environment variable, falling back to `default` when unset or invalid
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let defaults = Config::default();
        Self {
            server: ServerConfig {
                port: env_or("PORT", defaults.server.port),
                host: env::var("HOST").unwrap_or(defaults.server.host),
                max_upload_bytes: env_or("MAX_UPLOAD_BYTES", defaults.server.max_upload_bytes),
            },
            agents: AgentsConfig {
                heartbeat_interval_secs: env_or::<u64>(
                    "HEARTBEAT_INTERVAL_SECS",
                    defaults.agents.heartbeat_interval_secs,
                )
                .max(1),
                log_display_limit: env_or::<usize>(
                    "LOG_DISPLAY_LIMIT",
                    defaults.agents.log_display_limit,
                )
                .clamp(1, DEFAULT_LOG_DISPLAY_LIMIT),
            },
            translation: TranslationConfig {
                api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
                model: env::var("GEMINI_MODEL")
                    .ok()
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or(defaults.translation.model),
                api_base_url: env::var("GEMINI_API_BASE_URL")
                    .unwrap_or(defaults.translation.api_base_url),
                timeout_secs: env_or("TRANSLATION_TIMEOUT_SECS", defaults.translation.timeout_secs),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl AgentsConfig {
    /// Heartbeat interval as a `Duration`
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }
}
