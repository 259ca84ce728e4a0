use std::path::Path;

use anyhow::Context;
use wrapbench_persist::RiskyPrompts;
use wrapbench_persist::WrapperMetrics;
use wrapbench_persist::compute_metrics;
use wrapbench_persist::load_prompt_list;
use wrapbench_persist::read_traces;

/// Compute per-wrapper metrics from a trace file.
///
/// A missing risky-prompt file means every record counts as benign.
pub fn analyze(trace_path: &Path, risky_path: &Path) -> anyhow::Result<Vec<WrapperMetrics>> {
    let records = read_traces(trace_path)
        .with_context(|| format!("reading traces from {}", trace_path.display()))?;
    let risky = if risky_path.exists() {
        let prompts = load_prompt_list(risky_path)
            .with_context(|| format!("reading risky prompts from {}", risky_path.display()))?;
        RiskyPrompts::new(prompts)
    } else {
        tracing::warn!(path = %risky_path.display(), "no risky prompt list; treating all prompts as benign");
        RiskyPrompts::default()
    };
    tracing::info!(records = records.len(), risky = risky.len(), "analyzing traces");
    Ok(compute_metrics(&records, &risky))
}
