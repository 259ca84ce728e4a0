use serde::Deserialize;
use serde::Serialize;
use std::collections::HashMap;

use crate::error::ProviderError;
use crate::error::Result;

pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const OPENROUTER_API_KEY_ENV: &str = "OPENROUTER_API_KEY";
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash-lite";
pub const DEFAULT_REFERER: &str = "https://safety-wrappers-research.local";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Connection settings for a chat-completions compatible provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider display name.
    pub name: String,
    /// Base URL; `/chat/completions` is appended.
    pub base_url: String,
    /// Environment variable holding the API key.
    pub env_key: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Per-call timeout in seconds.
    pub timeout_secs: u64,
    /// Extra HTTP headers to include in requests.
    pub extra_headers: HashMap<String, String>,
}

impl ProviderConfig {
    /// OpenRouter defaults, with the referer header OpenRouter uses for attribution.
    pub fn openrouter() -> Self {
        Self {
            name: "OpenRouter".into(),
            base_url: OPENROUTER_BASE_URL.into(),
            env_key: OPENROUTER_API_KEY_ENV.into(),
            model: DEFAULT_MODEL.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            extra_headers: HashMap::from([("HTTP-Referer".into(), DEFAULT_REFERER.into())]),
        }
    }

    /// Full endpoint URL for a completion request.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Read the API key from the configured environment variable.
    ///
    /// A missing or blank key is a configuration error, reported before any
    /// request is served.
    pub fn api_key_from_env(&self) -> Result<String> {
        match std::env::var(&self.env_key) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(ProviderError::InvalidConfig(format!(
                "{} is not set",
                self.env_key
            ))),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::openrouter()
    }
}
