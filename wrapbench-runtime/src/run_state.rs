use serde::Serialize;

use crate::action::Action;
use crate::action::Decision;
use crate::budget::CallBudget;

/// Final output reported for a prompt that is empty after trimming.
pub const EMPTY_PROMPT_OUTPUT: &str = "[Empty prompt]";

/// Pseudo-decision reported when no wrapper ran at all.
pub const SKIP_DECISION: &str = "SKIP";

/// Phases of one request: Init -> Calling -> (Terminal | Exhausted | Failed),
/// or straight from Init to Skipped or a pre-check Terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    Init,
    Calling,
    /// The wrapper ended the loop with ALLOW, BLOCK, or MODIFY.
    Terminal(Action),
    /// The last call was requeried and the budget is spent.
    Exhausted,
    Skipped,
    Failed,
}

impl RunPhase {
    pub fn is_final(self) -> bool {
        !matches!(self, Self::Init | Self::Calling)
    }
}

/// A transition the run state machine does not allow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot {event} while run is {from:?}")]
pub struct InvalidTransition {
    pub from: RunPhase,
    pub event: &'static str,
}

/// Per-request bookkeeping. Private to one request; never shared.
#[derive(Debug, Clone)]
pub struct RequestRun {
    phase: RunPhase,
    budget: CallBudget,
    call_index: u32,
    raw_outputs: Vec<String>,
    decisions: Vec<Action>,
    final_output: String,
}

impl RequestRun {
    pub fn new(budget: CallBudget) -> Self {
        Self {
            phase: RunPhase::Init,
            budget,
            call_index: 0,
            raw_outputs: Vec::new(),
            decisions: Vec::new(),
            final_output: String::new(),
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn budget(&self) -> CallBudget {
        self.budget
    }

    pub fn call_index(&self) -> u32 {
        self.call_index
    }

    pub fn raw_outputs(&self) -> &[String] {
        &self.raw_outputs
    }

    pub fn decisions(&self) -> &[Action] {
        &self.decisions
    }

    pub fn final_output(&self) -> &str {
        &self.final_output
    }

    /// Number of model calls that returned.
    pub fn model_calls(&self) -> usize {
        self.raw_outputs.len()
    }

    /// Whether another model call fits in the budget.
    pub fn has_budget(&self) -> bool {
        self.phase == RunPhase::Calling && self.call_index < self.budget.get()
    }

    fn expect_phase(&self, wanted: RunPhase, event: &'static str) -> Result<(), InvalidTransition> {
        if self.phase == wanted {
            Ok(())
        } else {
            Err(InvalidTransition {
                from: self.phase,
                event,
            })
        }
    }

    /// Init -> Skipped.
    pub fn skip(&mut self) -> Result<(), InvalidTransition> {
        self.expect_phase(RunPhase::Init, "skip")?;
        self.final_output = EMPTY_PROMPT_OUTPUT.to_string();
        self.phase = RunPhase::Skipped;
        Ok(())
    }

    /// Init -> Terminal(BLOCK) from a pre-model check. No model call is counted.
    pub fn precheck_block(&mut self, decision: Decision) -> Result<(), InvalidTransition> {
        self.expect_phase(RunPhase::Init, "pre-check block")?;
        self.decisions.push(decision.action);
        self.final_output = decision.output;
        self.phase = RunPhase::Terminal(decision.action);
        Ok(())
    }

    /// Init -> Calling.
    pub fn start_calling(&mut self) -> Result<(), InvalidTransition> {
        self.expect_phase(RunPhase::Init, "start calling")?;
        self.phase = RunPhase::Calling;
        Ok(())
    }

    /// Record one completed model call and the wrapper's decision on it.
    ///
    /// REQUERY advances the call index; reaching the budget moves the run to
    /// Exhausted with the last raw output as the final output.
    pub fn record_call(
        &mut self,
        raw_output: String,
        decision: Decision,
    ) -> Result<RunPhase, InvalidTransition> {
        self.expect_phase(RunPhase::Calling, "record a call")?;
        self.raw_outputs.push(raw_output);
        self.decisions.push(decision.action);

        if decision.action.is_terminal() {
            self.final_output = decision.output;
            self.phase = RunPhase::Terminal(decision.action);
            return Ok(self.phase);
        }

        self.call_index += 1;
        if self.call_index >= self.budget.get() {
            self.final_output = self.raw_outputs.last().cloned().unwrap_or_default();
            self.phase = RunPhase::Exhausted;
        }
        Ok(self.phase)
    }

    /// Calling -> Failed. Raw outputs gathered so far are kept.
    pub fn fail(&mut self) -> Result<(), InvalidTransition> {
        self.expect_phase(RunPhase::Calling, "fail")?;
        self.phase = RunPhase::Failed;
        Ok(())
    }

    /// The decision reported to callers: SKIP, or the last real action.
    pub fn last_decision_label(&self) -> &'static str {
        if self.phase == RunPhase::Skipped {
            return SKIP_DECISION;
        }
        self.decisions
            .last()
            .copied()
            .unwrap_or(Action::Allow)
            .as_str()
    }

    pub fn decision_labels(&self) -> Vec<String> {
        self.decisions.iter().map(|a| a.as_str().to_string()).collect()
    }

    /// Give up the collected raw outputs, e.g. to attach them to an error.
    pub fn into_raw_outputs(self) -> Vec<String> {
        self.raw_outputs
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
