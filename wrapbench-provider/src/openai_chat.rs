//! OpenAI Chat Completions wire types.
//!
//! This is a **data-only** translation layer: no HTTP calls, no async, no IO.
//! It defines the request/response shapes for a single non-streaming
//! completion and a pure helper for error classification. OpenRouter and any
//! other provider that speaks the Chat Completions protocol accept these.

use serde::Deserialize;
use serde::Serialize;

use crate::error::ProviderError;

/// Completion budget sent with every request.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// A Chat Completions request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// A single-turn request carrying only the user prompt.
    pub fn single_turn(model: &str, prompt: &str) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user".into(),
                content: prompt.to_string(),
            }],
            max_tokens: Some(DEFAULT_MAX_TOKENS),
        }
    }
}

/// A single message within a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// One of `"system"`, `"user"`, or `"assistant"`.
    pub role: String,
    pub content: String,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// A non-streaming Chat Completions response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<ChatUsage>,
}

/// One choice inside a completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub message: ChatResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// The assistant message of a choice. Some providers return structured
/// (non-string) content, so it is kept as raw JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatResponseMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<serde_json::Value>,
}

/// Token usage statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl ChatCompletion {
    /// Text of the first choice.
    ///
    /// No choices, or a null content, is an empty (but successful) answer.
    /// Non-string content is rendered as its JSON text.
    pub fn first_text(&self) -> String {
        let Some(choice) = self.choices.first() else {
            return String::new();
        };
        match &choice.message.content {
            None | Some(serde_json::Value::Null) => String::new(),
            Some(serde_json::Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Error classification
// ---------------------------------------------------------------------------

/// Classify an HTTP error from a Chat Completions-compatible endpoint into the
/// appropriate [`ProviderError`] variant.
pub fn classify_chat_error(status: u16, body: &str) -> ProviderError {
    match status {
        401 | 403 => ProviderError::InvalidConfig(format!("authentication failed: {body}")),
        _ => ProviderError::Http {
            status,
            body: body.to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
