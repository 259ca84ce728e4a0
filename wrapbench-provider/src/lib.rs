pub mod adapter;
pub mod client;
pub mod error;
pub mod openai_chat;

pub use adapter::{DEFAULT_MODEL, OPENROUTER_API_KEY_ENV, OPENROUTER_BASE_URL, ProviderConfig};
pub use client::{HttpModelClient, ModelClient};
pub use error::{ProviderError, Result};
pub use openai_chat::{
    ChatChoice, ChatCompletion, ChatMessage, ChatRequest, ChatResponseMessage, ChatUsage,
    classify_chat_error,
};
