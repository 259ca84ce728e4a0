use wrapbench_persist::PersistError;
use wrapbench_provider::ProviderError;

use crate::run_state::InvalidTransition;

/// Errors that end a request without a wrapper decision.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// Bad caller input. No model call was made.
    #[error("{0}")]
    Validation(String),

    /// The model client failed or timed out on call `call_index`.
    #[error("model call {call_index} failed: {source}")]
    Upstream {
        call_index: u32,
        /// Raw outputs gathered before the failing call.
        raw_outputs: Vec<String>,
        #[source]
        source: ProviderError,
    },

    /// The run completed but its trace record could not be written.
    #[error("trace write failed: {0}")]
    Trace(#[from] PersistError),

    #[error(transparent)]
    Transition(#[from] InvalidTransition),
}

impl RunError {
    /// Stable machine-readable code for API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Upstream { .. } => "upstream_error",
            Self::Trace(_) => "trace_write_failed",
            Self::Transition(_) => "internal_error",
        }
    }
}

pub type Result<T> = std::result::Result<T, RunError>;
