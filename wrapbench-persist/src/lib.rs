pub mod analysis;
pub mod error;
pub mod trace;

// Re-export key types for convenience.
pub use analysis::{RiskyPrompts, WrapperMetrics, compute_metrics, load_prompt_list, render_table};
pub use error::{PersistError, Result};
pub use trace::{
    DEFAULT_LOG_DIR, DEFAULT_TRACE_FILE, JsonlTraceLogger, TraceOutcome, TraceRecord, TraceSink,
    read_traces, timestamp_now,
};
