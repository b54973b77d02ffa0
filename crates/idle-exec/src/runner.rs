//! Spawn the idle CLI, capture its output, enforce the timeout.

use std::process::Stdio;
use std::time::Duration;

use serde_json::Value;
use tokio::io::AsyncReadExt;
use tokio::process::Command;

use crate::outcome::{parse_stdout_json, ExecOutcome, ExecReport, SpawnFailure};

/// Environment variable naming the default `idle` executable.
pub const IDLE_PATH_ENV: &str = "IDLE_CLI_PATH";

/// Fallback executable name when neither an override nor the
/// environment supplies a path.
pub const DEFAULT_IDLE_PATH: &str = "idle";

pub const DEFAULT_TIMEOUT_MS: f64 = 60_000.0;

/// One invocation of the idle CLI, as requested by the caller.
/// Everything is optional except `args` semantics decided by the
/// caller; resolution fills in defaults.
#[derive(Debug, Clone, Default)]
pub struct ExecRequest {
    pub args: Vec<Value>,
    pub cwd: Option<String>,
    pub timeout_ms: Option<f64>,
    pub idle_path: Option<String>,
}

/// A request with every default applied.
#[derive(Debug, Clone)]
pub struct ResolvedExec {
    pub idle_path: String,
    pub args: Vec<String>,
    pub cwd: String,
    pub timeout: Duration,
}

impl ExecRequest {
    /// Apply defaults: executable override → `IDLE_CLI_PATH` → `idle`;
    /// args coerced element-wise to strings; cwd falls back to the
    /// current directory; finite timeouts are used as-is, anything
    /// else gets the 60s default.
    pub fn resolve(&self) -> ResolvedExec {
        let idle_path = resolve_idle_path(
            self.idle_path.as_deref(),
            std::env::var(IDLE_PATH_ENV).ok(),
        );

        let args = self.args.iter().map(coerce_arg).collect();

        let cwd = self
            .cwd
            .clone()
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| {
                std::env::current_dir()
                    .map(|d| d.display().to_string())
                    .unwrap_or_else(|_| ".".to_string())
            });

        let millis = match self.timeout_ms {
            Some(ms) if ms.is_finite() => ms.max(0.0),
            _ => DEFAULT_TIMEOUT_MS,
        };

        ResolvedExec {
            idle_path,
            args,
            cwd,
            timeout: Duration::from_millis(millis as u64),
        }
    }
}

/// Executable precedence: non-blank override → non-empty environment
/// value → the hard-coded name.
fn resolve_idle_path(override_path: Option<&str>, env_path: Option<String>) -> String {
    override_path
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .or_else(|| env_path.filter(|p| !p.is_empty()))
        .unwrap_or_else(|| DEFAULT_IDLE_PATH.to_string())
}

fn coerce_arg(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Run the idle CLI to completion or forced termination.
///
/// Always resolves to a value: spawn failures, timeouts, kills, and
/// non-zero exits are all encoded in the returned [`ExecOutcome`].
pub async fn run(request: ExecRequest) -> ExecOutcome {
    let resolved = request.resolve();
    run_resolved(resolved).await
}

async fn run_resolved(resolved: ResolvedExec) -> ExecOutcome {
    let mut command = Command::new(&resolved.idle_path);
    command
        .args(&resolved.args)
        .current_dir(&resolved.cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) => {
            tracing::warn!("failed to spawn {}: {e}", resolved.idle_path);
            return spawn_failed(&resolved.idle_path, e.to_string());
        }
    };

    let stdout_pipe = child.stdout.take();
    let stderr_pipe = child.stderr.take();
    let stdout_task = tokio::spawn(drain(stdout_pipe));
    let stderr_task = tokio::spawn(drain(stderr_pipe));

    // Timeout is the only cancellation path; no graceful signal first.
    let status = match tokio::time::timeout(resolved.timeout, child.wait()).await {
        Ok(Ok(status)) => status,
        Ok(Err(e)) => return spawn_failed(&resolved.idle_path, e.to_string()),
        Err(_) => {
            tracing::warn!(
                "{} exceeded {}ms, sending SIGKILL",
                resolved.idle_path,
                resolved.timeout.as_millis()
            );
            let _ = child.start_kill();
            match child.wait().await {
                Ok(status) => status,
                Err(e) => return spawn_failed(&resolved.idle_path, e.to_string()),
            }
        }
    };

    let stdout_bytes = stdout_task.await.unwrap_or_default();
    let stderr_bytes = stderr_task.await.unwrap_or_default();
    let stdout = String::from_utf8_lossy(&stdout_bytes).into_owned();
    let stderr = String::from_utf8_lossy(&stderr_bytes).into_owned();

    let code = status.code();
    let signal = terminating_signal(&status);
    let (json, json_parse_error) = match parse_stdout_json(&stdout) {
        Ok(value) => (Some(value), None),
        Err(reason) => (None, Some(reason)),
    };

    ExecOutcome::Completed(ExecReport {
        ok: code == Some(0) && signal.is_none(),
        code,
        signal,
        idle_path: resolved.idle_path,
        args: resolved.args,
        cwd: resolved.cwd,
        stdout,
        stderr,
        json,
        json_parse_error,
    })
}

async fn drain<R: AsyncReadExt + Unpin>(pipe: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut reader) = pipe {
        let _ = reader.read_to_end(&mut buf).await;
    }
    buf
}

fn spawn_failed(idle_path: &str, spawn_error: String) -> ExecOutcome {
    ExecOutcome::SpawnFailed(SpawnFailure {
        ok: false,
        error: install_guidance(idle_path),
        spawn_error,
    })
}

fn install_guidance(idle_path: &str) -> String {
    format!(
        "idle_cli executable not found ({idle_path}).\n\
         Install via Dart: `dart pub global activate idle_cli`\n\
         Ensure `~/.pub-cache/bin` is on PATH, then re-run `{idle_path} <command>`.\n\
         Or set `IDLE_CLI_PATH` to an absolute path to the `idle` executable."
    )
}

#[cfg(unix)]
fn terminating_signal(status: &std::process::ExitStatus) -> Option<String> {
    use std::os::unix::process::ExitStatusExt;
    status.signal().map(signal_name)
}

#[cfg(not(unix))]
fn terminating_signal(_status: &std::process::ExitStatus) -> Option<String> {
    None
}

#[cfg(unix)]
fn signal_name(signal: i32) -> String {
    match signal {
        2 => "SIGINT".to_string(),
        9 => "SIGKILL".to_string(),
        15 => "SIGTERM".to_string(),
        n => format!("SIG{n}"),
    }
}
