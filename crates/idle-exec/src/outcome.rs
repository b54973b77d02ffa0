//! Structured outcomes of an idle CLI invocation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Terminal result of one `run` call. Every failure mode is a value;
/// `run` never returns an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExecOutcome {
    Completed(ExecReport),
    SpawnFailed(SpawnFailure),
}

/// Report for a process that was actually started and reaped.
///
/// `ok` is true only for a clean exit: code 0 and no terminating
/// signal. A process killed on timeout is never `ok`, whatever it
/// managed to write before dying.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecReport {
    pub ok: bool,
    pub code: Option<i32>,
    pub signal: Option<String>,
    pub idle_path: String,
    pub args: Vec<String>,
    pub cwd: String,
    pub stdout: String,
    pub stderr: String,
    pub json: Option<Value>,
    pub json_parse_error: Option<String>,
}

/// The executable could not be started at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpawnFailure {
    pub ok: bool,
    /// Install/locate guidance for the caller.
    pub error: String,
    pub spawn_error: String,
}

impl ExecOutcome {
    pub fn is_ok(&self) -> bool {
        match self {
            ExecOutcome::Completed(report) => report.ok,
            ExecOutcome::SpawnFailed(_) => false,
        }
    }
}

/// Parse stdout as JSON after trimming. Empty stdout and parse
/// failures both come back as `Err` with a reason string.
pub(crate) fn parse_stdout_json(text: &str) -> Result<Value, String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err("empty stdout".to_string());
    }
    serde_json::from_str(trimmed).map_err(|e| e.to_string())
}
