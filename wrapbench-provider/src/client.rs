//! The black-box completion capability and its HTTP implementation.

use std::time::Duration;

use async_trait::async_trait;

use crate::adapter::ProviderConfig;
use crate::error::ProviderError;
use crate::error::Result;
use crate::openai_chat::ChatCompletion;
use crate::openai_chat::ChatRequest;
use crate::openai_chat::classify_chat_error;

/// A remote text-completion function. The model is opaque: prompt in, text out.
///
/// Implementations must fail loudly on transport or provider errors. An empty
/// string is a valid successful completion.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Identifier of the model behind this client, recorded in traces.
    fn model_name(&self) -> &str;

    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// [`ModelClient`] speaking the Chat Completions protocol over HTTP.
#[derive(Debug, Clone)]
pub struct HttpModelClient {
    http: reqwest::Client,
    config: ProviderConfig,
    api_key: String,
    timeout: Duration,
}

impl HttpModelClient {
    pub fn new(config: ProviderConfig, api_key: String) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs.max(1));
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::InvalidConfig(format!("http client: {e}")))?;
        Ok(Self {
            http,
            config,
            api_key,
            timeout,
        })
    }

    /// Build a client whose key comes from `config.env_key`.
    pub fn from_env(config: ProviderConfig) -> Result<Self> {
        let api_key = config.api_key_from_env()?;
        Self::new(config, api_key)
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

#[async_trait]
impl ModelClient for HttpModelClient {
    fn model_name(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let body = ChatRequest::single_turn(&self.config.model, prompt);
        let mut request = self
            .http
            .post(self.config.completions_url())
            .bearer_auth(&self.api_key)
            .json(&body);
        for (name, value) in &self.config.extra_headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(self.timeout)
            } else {
                ProviderError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), "provider returned error status");
            return Err(classify_chat_error(status.as_u16(), &text));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;
        Ok(completion.first_text())
    }
}
