//! Server configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the server can start with zero
//! configuration for local development. Without `OPENAI_API_KEY` the server
//! runs in demo mode.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use tianfu_shared::constants::{DEFAULT_HTTP_PORT, DEFAULT_MODEL, DEFAULT_PROVIDER_BASE_URL};

/// Server configuration.
#[derive(Clone)]
pub struct ServerConfig {
    /// Chat-completion API key. `None` selects demo mode.
    /// Env: `OPENAI_API_KEY`
    pub api_key: Option<String>,

    /// Model identifier sent to the provider.
    /// Env: `AI_MODEL`
    /// Default: `gpt-4o-mini`
    pub model: String,

    /// Root of the OpenAI-compatible API.
    /// Env: `OPENAI_BASE_URL`
    /// Default: `https://api.openai.com/v1`
    pub provider_base_url: String,

    /// Upper bound on a single provider call.
    /// Env: `PROVIDER_TIMEOUT_SECS`
    /// Default: 60 seconds
    pub provider_timeout: Duration,

    /// Socket address for the HTTP API.
    /// Env: `PORT` (binds `0.0.0.0:<PORT>`) or `HTTP_ADDR` (full address)
    /// Default: `0.0.0.0:3000`
    pub http_addr: SocketAddr,

    /// JSON file holding the saved letters.
    /// Env: `MAILBOX_PATH`
    /// Default: `./mailbox.json`
    pub mailbox_path: PathBuf,

    /// Text file with the base instruction prepended to every prompt.
    /// Env: `PROMPT_PATH`
    pub prompt_path: PathBuf,

    /// Directory served for front-end assets and `favicon.svg`.
    /// Env: `STATIC_DIR`
    /// Default: `./public`
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            provider_base_url: DEFAULT_PROVIDER_BASE_URL.to_string(),
            provider_timeout: Duration::from_secs(60),
            http_addr: ([0, 0, 0, 0], DEFAULT_HTTP_PORT).into(),
            mailbox_path: PathBuf::from("./mailbox.json"),
            prompt_path: PathBuf::from("./【OpenAI GPT-4.0 Mini 抽卡 Prompt - 多維.txt"),
            static_dir: PathBuf::from("./public"),
        }
    }
}

// Keeps the API key out of logs.
impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("provider_base_url", &self.provider_base_url)
            .field("provider_timeout", &self.provider_timeout)
            .field("http_addr", &self.http_addr)
            .field("mailbox_path", &self.mailbox_path)
            .field("prompt_path", &self.prompt_path)
            .field("static_dir", &self.static_dir)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        config.api_key = lookup("OPENAI_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        if let Some(model) = lookup("AI_MODEL").filter(|m| !m.trim().is_empty()) {
            config.model = model.trim().to_string();
        }

        if let Some(url) = lookup("OPENAI_BASE_URL").filter(|u| !u.trim().is_empty()) {
            config.provider_base_url = url.trim().trim_end_matches('/').to_string();
        }

        if let Some(val) = lookup("PROVIDER_TIMEOUT_SECS") {
            match val.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.provider_timeout = Duration::from_secs(secs),
                _ => tracing::warn!(value = %val, "Invalid PROVIDER_TIMEOUT_SECS, using default"),
            }
        }

        if let Some(port) = lookup("PORT") {
            match port.trim().parse::<u16>() {
                Ok(port) => config.http_addr.set_port(port),
                Err(_) => tracing::warn!(value = %port, "Invalid PORT, using default"),
            }
        }

        if let Some(addr) = lookup("HTTP_ADDR") {
            if let Ok(parsed) = addr.parse::<SocketAddr>() {
                config.http_addr = parsed;
            } else {
                tracing::warn!(
                    value = %addr,
                    "Invalid HTTP_ADDR, using default"
                );
            }
        }

        if let Some(path) = lookup("MAILBOX_PATH") {
            config.mailbox_path = PathBuf::from(path);
        }

        if let Some(path) = lookup("PROMPT_PATH") {
            config.prompt_path = PathBuf::from(path);
        }

        if let Some(path) = lookup("STATIC_DIR") {
            config.static_dir = PathBuf::from(path);
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }
}
