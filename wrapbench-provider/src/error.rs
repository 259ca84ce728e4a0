use std::time::Duration;

/// Errors produced while talking to the completion provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("model call timed out after {0:?}")]
    Timeout(Duration),

    #[error("undecodable response: {0}")]
    Decode(String),
}

impl ProviderError {
    /// HTTP status returned by the provider, when the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;
