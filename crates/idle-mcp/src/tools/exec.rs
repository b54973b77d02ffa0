//! Tool: idle.exec — run the idle CLI and return its captured output.

use serde::Deserialize;
use serde_json::{json, Value};

use idle_exec::{run, ExecRequest};

use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

/// Arguments are validated against the declared schema before the
/// runner sees them: `args` is required, everything else optional.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ExecToolParams {
    args: Vec<Value>,
    #[serde(default)]
    cwd: Option<String>,
    #[serde(default)]
    timeout_ms: Option<f64>,
    #[serde(default)]
    idle_path: Option<String>,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "idle.exec".to_string(),
        description: Some(
            "Run idle_cli (idle <args...>) and return stdout/stderr plus parsed JSON \
             (if stdout is valid JSON). This is the ONLY allowed execution surface for \
             behavior claims about the Dart/Flutter Idle packages."
                .to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "args": { "type": "array", "items": { "type": "string" } },
                "cwd": { "type": "string" },
                "timeoutMs": { "type": "number" },
                "idlePath": {
                    "type": "string",
                    "description": "Optional override path to the `idle` executable."
                }
            },
            "required": ["args"]
        }),
    }
}

pub async fn execute(args: Value) -> McpResult<ToolCallResult> {
    let params: ExecToolParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    let outcome = run(ExecRequest {
        args: params.args,
        cwd: params.cwd,
        timeout_ms: params.timeout_ms,
        idle_path: params.idle_path,
    })
    .await;

    // The full outcome is embedded either way; only the error flag
    // differs.
    if outcome.is_ok() {
        Ok(ToolCallResult::json(&outcome))
    } else {
        Ok(ToolCallResult::json_error(&outcome))
    }
}
