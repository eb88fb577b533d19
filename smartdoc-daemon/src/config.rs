//! SmartDoc daemon configuration loaded from `smartdoc.toml`.
//!
//! Every section and field is optional; a missing file means all defaults.
//!
//! # Example Configuration
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8000
//! max_upload_bytes = 10485760
//!
//! [documents]
//! max_sessions = 100
//! max_content_chars = 30000
//! small_doc_threshold = 10000
//! history_window = 3
//!
//! [llm]
//! base_url = "https://api.openai.com/v1"
//! model = "gpt-4o-mini"
//! fallback_models = ["gpt-3.5-turbo"]
//! api_key_env = "OPENAI_API_KEY"
//! max_tokens = 500
//! temperature = 0.7
//! timeout_secs = 60
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use smartdoc_core::{SelectorConfig, ServiceConfig};
use std::path::Path;
use std::time::Duration;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "smartdoc.toml";

/// Environment variable overriding `[server] port`.
pub const PORT_ENV_VAR: &str = "PORT";

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SmartDocConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Session store and content limits.
    #[serde(default)]
    pub documents: DocumentsConfig,

    /// Answer backend settings.
    #[serde(default)]
    pub llm: LlmConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted upload, in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Session store and content limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DocumentsConfig {
    /// Sessions kept before the oldest are evicted.
    pub max_sessions: usize,
    /// Truncation budget for stored content, in characters.
    pub max_content_chars: usize,
    /// Documents up to this size are sent to the model whole.
    pub small_doc_threshold: usize,
    /// Prior exchanges included in answer prompts.
    pub history_window: usize,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        let service = ServiceConfig::default();
        Self {
            max_sessions: smartdoc_core::DEFAULT_MAX_SESSIONS,
            max_content_chars: service.max_content_chars,
            small_doc_threshold: service.selector.small_doc_threshold,
            history_window: service.history_window,
        }
    }
}

/// Answer backend settings.
///
/// Any OpenAI-compatible chat completions endpoint works, including local
/// servers that need no API key.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    /// Primary model.
    pub model: String,
    /// Tried in order when the primary model fails.
    pub fallback_models: Vec<String>,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Per-call budget for a generation request.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            fallback_models: vec!["gpt-3.5-turbo".to_string()],
            api_key_env: "OPENAI_API_KEY".to_string(),
            max_tokens: 500,
            temperature: 0.7,
            timeout_secs: 60,
        }
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    /// Primary model followed by the fallbacks, without duplicates.
    pub fn model_chain(&self) -> Vec<String> {
        let mut chain = vec![self.model.clone()];
        for model in &self.fallback_models {
            if !chain.contains(model) {
                chain.push(model.clone());
            }
        }
        chain
    }
}

impl SmartDocConfig {
    /// Load configuration from `path`.
    ///
    /// A missing file yields defaults; an unreadable or malformed file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::parse(&content).with_context(|| format!("Failed to parse config file {:?}", path))
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply the `PORT` environment variable, if set to a valid port.
    pub fn apply_env(&mut self) {
        if let Some(port) = std::env::var(PORT_ENV_VAR)
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
        {
            self.server.port = port;
        }
    }

    /// Core service limits derived from the `[documents]` section.
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            max_content_chars: self.documents.max_content_chars,
            history_window: self.documents.history_window,
            selector: SelectorConfig {
                small_doc_threshold: self.documents.small_doc_threshold,
                ..SelectorConfig::default()
            },
        }
    }
}
