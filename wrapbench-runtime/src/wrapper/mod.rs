//! Safety wrappers as finite-state monitors.
//!
//! A wrapper observes each model call (prompt, raw output, call index) and
//! returns a [`Decision`]. It owns its state privately; the orchestrator only
//! ever sees decisions and read-only [`WrapperState`] snapshots. Instances are
//! built fresh per request by [`WrapperKind::build`](crate::WrapperKind::build),
//! so no state crosses request boundaries.

mod history;
mod keyword;
mod noop;
mod query_budget;

pub use history::HistoryWrapper;
pub use keyword::BLOCK_MESSAGE;
pub use keyword::KeywordWrapper;
pub use noop::NoopWrapper;
pub use query_budget::QueryBudgetWrapper;

use serde::Serialize;

use crate::action::Decision;
use crate::registry::WrapperKind;

/// Finite-state monitor contract shared by every wrapper variant.
pub trait Wrapper: Send {
    fn kind(&self) -> WrapperKind;

    /// Return to the initial state. Idempotent.
    fn reset(&mut self);

    /// Observe one model call and decide. Never fails.
    fn step(&mut self, prompt: &str, model_output: &str, call_index: u32) -> Decision;

    /// Read-only projection of the internal state, for traces.
    fn state(&self) -> WrapperState;

    /// Whether `step(prompt, "", 0)` is meaningful before any model call.
    fn supports_precheck(&self) -> bool {
        false
    }
}

/// Snapshot of a wrapper's state as written to the trace log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum WrapperState {
    Stateless {
        #[serde(rename = "type")]
        kind: String,
    },
    Keyword {
        banned_keywords: Vec<String>,
    },
    History {
        k: usize,
        buffer: Vec<String>,
    },
    QueryBudget {
        call_count: u32,
        max_queries: u32,
    },
}

impl WrapperState {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
