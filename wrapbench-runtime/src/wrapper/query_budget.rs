use super::Wrapper;
use super::WrapperState;
use crate::action::Decision;
use crate::registry::WrapperKind;

/// Reports how many model calls a request has used.
///
/// Always allows; the cap itself is enforced by the orchestrator through the
/// call budget it resolves before the loop starts.
#[derive(Debug, Clone)]
pub struct QueryBudgetWrapper {
    max_queries: u32,
    call_count: u32,
}

impl QueryBudgetWrapper {
    pub fn new(max_queries: u32) -> Self {
        Self {
            max_queries: max_queries.max(1),
            call_count: 0,
        }
    }
}

impl Wrapper for QueryBudgetWrapper {
    fn kind(&self) -> WrapperKind {
        WrapperKind::QueryBudget
    }

    fn reset(&mut self) {
        self.call_count = 0;
    }

    fn step(&mut self, _prompt: &str, model_output: &str, call_index: u32) -> Decision {
        self.call_count = call_index.saturating_add(1);
        Decision::allow(model_output)
    }

    fn state(&self) -> WrapperState {
        WrapperState::QueryBudget {
            call_count: self.call_count,
            max_queries: self.max_queries,
        }
    }
}
