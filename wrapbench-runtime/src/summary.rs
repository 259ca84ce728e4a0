use crate::action::Action;
use crate::registry::WrapperKind;
use crate::run_state::RequestRun;
use crate::run_state::RunPhase;

/// Human-readable explanation of how a request ended.
pub fn decision_summary(kind: WrapperKind, run: &RequestRun) -> String {
    if run.phase() == RunPhase::Skipped {
        return "No prompt entered; no model call. No safety decision applied.".to_string();
    }

    let calls = run.model_calls();
    let last = run.decisions().last().copied();
    match kind {
        WrapperKind::Keyword if last == Some(Action::Block) && calls == 0 => {
            "Blocked: your prompt contained a banned or harmful keyword. No model call made."
                .to_string()
        }
        WrapperKind::Keyword if last == Some(Action::Block) => {
            "Blocked: your prompt contained a banned or harmful keyword.".to_string()
        }
        WrapperKind::Keyword => "Allowed: no banned keywords detected in your prompt.".to_string(),
        WrapperKind::Noop => {
            "No filter applied (baseline). Response was not checked for safety.".to_string()
        }
        WrapperKind::History if run.phase() == RunPhase::Exhausted => format!(
            "History: call budget of {} exhausted without a fresh non-empty output; returned the last raw output.",
            run.budget().get()
        ),
        WrapperKind::History if run.decisions().contains(&Action::Requery) => format!(
            "History: re-queried due to empty or duplicate output; allowed after {calls} call(s)."
        ),
        WrapperKind::History => {
            "History: response allowed after 1 call (no empty or duplicate).".to_string()
        }
        WrapperKind::QueryBudget => format!(
            "Query budget: up to {} call(s); used {calls}.",
            run.budget().get()
        ),
    }
}
