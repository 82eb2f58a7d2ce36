//! Environment-driven configuration for the adapter
//!
//! The server reads its configuration once at startup and never mutates it
//! afterwards. One value is required:
//!
//! - `XAI_API_KEY` - bearer credential for the upstream API. Absence is a
//!   fatal startup condition: the process refuses to serve any tool call.
//!
//! Optional overrides:
//!
//! - `XAI_BASE_URL` - upstream base URL (default `https://api.x.ai`)
//! - `XAI_DEFAULT_MODEL` - model used by the chat tool when the caller does
//!   not pick one (default `grok-3`)

use std::env;

use crate::error::{GrokMcpError, Result};

/// Default upstream base URL
pub const DEFAULT_BASE_URL: &str = "https://api.x.ai";

/// Default model for chat completions
pub const DEFAULT_CHAT_MODEL: &str = "grok-3";

/// Immutable process configuration, established once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer credential forwarded on every upstream request
    pub api_key: String,
    /// Upstream base URL without a trailing slash
    pub base_url: String,
    /// Default model for the chat tool
    pub default_model: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Fails with a `Configuration` error when `XAI_API_KEY` is missing or
    /// empty; this is the only error that is allowed to terminate the
    /// process.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("XAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                GrokMcpError::configuration(
                    "XAI_API_KEY environment variable is required but not set",
                )
            })?;

        let base_url = env::var("XAI_BASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let default_model = env::var("XAI_DEFAULT_MODEL")
            .ok()
            .filter(|model| !model.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string());

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            default_model,
        })
    }

    /// Build a configuration directly, bypassing the environment.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            default_model: DEFAULT_CHAT_MODEL.to_string(),
        }
    }

    /// Override the upstream base URL (used by tests against local servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}
