//! The request driver: owns the call loop around one wrapper instance.

use std::sync::Arc;
use std::time::Duration;

use tracing::Instrument;
use wrapbench_persist::TraceOutcome;
use wrapbench_persist::TraceRecord;
use wrapbench_persist::TraceSink;
use wrapbench_persist::timestamp_now;
use wrapbench_provider::ModelClient;
use wrapbench_provider::ProviderError;

use crate::action::Action;
use crate::api::ConfigView;
use crate::api::QueryRequest;
use crate::api::QueryResponse;
use crate::budget::CallBudget;
use crate::config::WrappersConfig;
use crate::error::Result;
use crate::error::RunError;
use crate::registry::WrapperKind;
use crate::run_state::RequestRun;
use crate::run_state::RunPhase;
use crate::summary::decision_summary;

/// Upper bound on a single model call unless configured otherwise.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(60);

/// Everything a finished (or skipped) run produced, before it is traced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub kind: WrapperKind,
    /// The trimmed prompt actually evaluated.
    pub prompt: String,
    pub run: RequestRun,
    /// Final wrapper state snapshot; `{}` when no wrapper was built.
    pub wrapper_state: serde_json::Value,
}

impl RunReport {
    pub fn outcome(&self) -> TraceOutcome {
        match self.run.phase() {
            RunPhase::Exhausted => TraceOutcome::Exhausted,
            RunPhase::Skipped => TraceOutcome::Skipped,
            _ => TraceOutcome::Terminal,
        }
    }

    pub fn summary(&self) -> String {
        decision_summary(self.kind, &self.run)
    }

    pub fn response(&self) -> QueryResponse {
        QueryResponse {
            final_output: self.run.final_output().to_string(),
            wrapper_decision: self.run.last_decision_label().to_string(),
            decision_summary: self.summary(),
            model_call_count: self.run.model_calls(),
            raw_outputs: self.run.raw_outputs().to_vec(),
            decisions_sequence: self.run.decision_labels(),
        }
    }

    pub fn trace_record(&self, model_name: &str, wrappers: &WrappersConfig) -> TraceRecord {
        TraceRecord {
            timestamp: timestamp_now(),
            model_name: model_name.to_string(),
            wrapper_name: self.kind.id().to_string(),
            wrapper_config: wrappers.block_for(self.kind),
            user_prompt: self.prompt.clone(),
            raw_model_outputs: self.run.raw_outputs().to_vec(),
            wrapper_decisions: self.run.decision_labels(),
            final_output: self.run.final_output().to_string(),
            total_model_calls: self.run.model_calls(),
            wrapper_state: self.wrapper_state.clone(),
            outcome: self.outcome(),
        }
    }
}

/// Drives requests: builds a fresh wrapper per request, loops over model
/// calls within the resolved budget, and writes one trace per completed run.
///
/// Shared across requests behind an `Arc`; it holds no per-request state.
pub struct Orchestrator {
    client: Arc<dyn ModelClient>,
    sink: Arc<dyn TraceSink>,
    wrappers: WrappersConfig,
    call_timeout: Duration,
}

impl Orchestrator {
    pub fn new(
        client: Arc<dyn ModelClient>,
        sink: Arc<dyn TraceSink>,
        wrappers: WrappersConfig,
    ) -> Self {
        Self {
            client,
            sink,
            wrappers,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub fn wrappers(&self) -> &WrappersConfig {
        &self.wrappers
    }

    pub fn model_name(&self) -> &str {
        self.client.model_name()
    }

    pub fn config_view(&self) -> ConfigView {
        ConfigView::new(self.model_name(), &self.wrappers)
    }

    /// Resolve the wrapper id, or the configured default when absent or blank.
    pub fn resolve_kind(&self, wrapper_name: Option<&str>) -> Result<WrapperKind> {
        match wrapper_name.map(str::trim).filter(|name| !name.is_empty()) {
            Some(name) => name.parse(),
            None => Ok(self.wrappers.default),
        }
    }

    /// Validate, run, trace, and answer one query.
    ///
    /// Completed and skipped runs are traced exactly once. Failed runs are
    /// not traced.
    pub async fn handle(&self, request: QueryRequest) -> Result<QueryResponse> {
        let kind = self.resolve_kind(request.wrapper_name.as_deref())?;
        let budget = CallBudget::resolve(kind, &self.wrappers, request.max_queries);
        let span = tracing::info_span!(
            "wrapbench.query",
            wrapper = %kind,
            budget = budget.get(),
        );
        async move {
            let report = self.run(kind, budget, &request.prompt).await?;
            let record = report.trace_record(self.model_name(), &self.wrappers);
            self.sink.append(&record).await?;
            Ok(report.response())
        }
        .instrument(span)
        .await
    }

    /// The request loop, without tracing.
    pub async fn run(&self, kind: WrapperKind, budget: CallBudget, prompt: &str) -> Result<RunReport> {
        let prompt = prompt.trim();
        let mut run = RequestRun::new(budget);

        if prompt.is_empty() {
            run.skip()?;
            tracing::info!(outcome = "skipped", "empty prompt; no model call");
            return Ok(RunReport {
                kind,
                prompt: String::new(),
                run,
                wrapper_state: serde_json::json!({}),
            });
        }

        let mut wrapper = kind.build(&self.wrappers, budget);

        if wrapper.supports_precheck() {
            let decision = wrapper.step(prompt, "", 0);
            if decision.action == Action::Block {
                run.precheck_block(decision)?;
                tracing::info!(outcome = "blocked", calls = 0, "blocked before model call");
                return Ok(RunReport {
                    kind,
                    prompt: prompt.to_string(),
                    run,
                    wrapper_state: wrapper.state().to_json(),
                });
            }
        }

        wrapper.reset();
        run.start_calling()?;
        while run.has_budget() {
            let call_index = run.call_index();
            tracing::debug!(call_index, "calling model");
            let raw = match self.complete(prompt).await {
                Ok(raw) => raw,
                Err(source) => {
                    run.fail()?;
                    tracing::warn!(call_index, error = %source, "model call failed");
                    return Err(RunError::Upstream {
                        call_index,
                        raw_outputs: run.into_raw_outputs(),
                        source,
                    });
                }
            };
            let decision = wrapper.step(prompt, &raw, call_index);
            tracing::debug!(call_index, action = %decision.action, "wrapper decision");
            run.record_call(raw, decision)?;
        }

        tracing::info!(
            phase = ?run.phase(),
            calls = run.model_calls(),
            decision = run.last_decision_label(),
            "run finished"
        );
        Ok(RunReport {
            kind,
            prompt: prompt.to_string(),
            run,
            wrapper_state: wrapper.state().to_json(),
        })
    }

    async fn complete(&self, prompt: &str) -> std::result::Result<String, ProviderError> {
        tokio::time::timeout(self.call_timeout, self.client.complete(prompt))
            .await
            .map_err(|_| ProviderError::Timeout(self.call_timeout))?
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
