use std::path::Path;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::Result;

pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_TRACE_FILE: &str = "traces.jsonl";

/// How a traced request ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceOutcome {
    /// The wrapper chose ALLOW, BLOCK, or MODIFY.
    #[default]
    Terminal,
    /// Every call was requeried until the call budget ran out.
    Exhausted,
    /// Empty prompt; no wrapper ran and no model call was made.
    Skipped,
}

/// One line of the trace log: a full request's inputs, decisions, and outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceRecord {
    pub timestamp: String,
    pub model_name: String,
    pub wrapper_name: String,
    pub wrapper_config: serde_json::Value,
    pub user_prompt: String,
    pub raw_model_outputs: Vec<String>,
    pub wrapper_decisions: Vec<String>,
    pub final_output: String,
    pub total_model_calls: usize,
    #[serde(default)]
    pub wrapper_state: serde_json::Value,
    #[serde(default)]
    pub outcome: TraceOutcome,
}

impl TraceRecord {
    /// Whether any decision in this run was a BLOCK.
    pub fn was_blocked(&self) -> bool {
        self.wrapper_decisions.iter().any(|d| d == "BLOCK")
    }
}

/// RFC 3339 UTC timestamp for a record written now.
pub fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Destination for completed-run records.
#[async_trait]
pub trait TraceSink: Send + Sync {
    /// Append one record. Records are never edited once written.
    async fn append(&self, record: &TraceRecord) -> Result<()>;
}

/// Append-only JSONL trace file.
///
/// Each record is serialized up front and written with a single `write_all`
/// while holding the writer lock, so concurrent requests never interleave
/// partial lines.
pub struct JsonlTraceLogger {
    dir: PathBuf,
    file_name: String,
    write_lock: Mutex<()>,
}

impl JsonlTraceLogger {
    /// The directory is created on first append, not at construction time.
    pub fn new(dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            file_name: file_name.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

#[async_trait]
impl TraceSink for JsonlTraceLogger {
    async fn append(&self, record: &TraceRecord) -> Result<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        tokio::fs::create_dir_all(&self.dir).await?;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path())
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

/// Load every well-formed record from a trace file.
///
/// A missing file yields no records. Blank lines and lines that do not parse
/// as a [`TraceRecord`] are skipped.
pub fn read_traces(path: &Path) -> Result<Vec<TraceRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let data = std::fs::read_to_string(path)?;
    let mut records = Vec::new();
    for (lineno, line) in data.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<TraceRecord>(line) {
            Ok(record) => records.push(record),
            Err(e) => tracing::debug!(line = lineno + 1, "skipping malformed trace line: {e}"),
        }
    }
    Ok(records)
}
