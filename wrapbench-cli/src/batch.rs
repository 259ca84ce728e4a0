//! Runs labelled prompt sets through every selected wrapper, in-process.
//!
//! Each prompt goes through [`Orchestrator::handle`], so traces are written
//! exactly as for HTTP requests. A failing prompt is reported and skipped.

use std::io::Write;

use wrapbench_runtime::Orchestrator;
use wrapbench_runtime::QueryRequest;
use wrapbench_runtime::WrapperKind;

/// Counts for one batch invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub completed: usize,
    pub failed: usize,
}

/// One named prompt set, e.g. `risky` or `benign`.
pub struct PromptSet<'a> {
    pub label: &'a str,
    pub prompts: &'a [String],
}

/// Writes one line per prompt to `out`. Pass an unlocked handle such as
/// `std::io::stdout()` so the log subscriber can interleave between lines.
pub async fn run_batch(
    orchestrator: &Orchestrator,
    sets: &[PromptSet<'_>],
    kinds: &[WrapperKind],
    out: &mut impl Write,
) -> anyhow::Result<BatchSummary> {
    let mut summary = BatchSummary::default();
    for &kind in kinds {
        for set in sets {
            for (i, prompt) in set.prompts.iter().enumerate() {
                let request = QueryRequest::new(prompt.as_str()).with_wrapper(kind);
                match orchestrator.handle(request).await {
                    Ok(resp) => {
                        summary.completed += 1;
                        writeln!(out, "{} {kind} [{i}] calls={}", set.label, resp.model_call_count)?;
                    }
                    Err(e) => {
                        summary.failed += 1;
                        writeln!(out, "{} {kind} [{i}] error: {e}", set.label)?;
                    }
                }
            }
        }
    }
    tracing::info!(completed = summary.completed, failed = summary.failed, "batch finished");
    Ok(summary)
}
