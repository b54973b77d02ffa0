//! Tool: idle.contract — return the agent contract document.

use std::sync::Arc;

use serde_json::json;

use crate::session::ServerSession;
use crate::types::{McpResult, ToolCallResult, ToolDefinition};

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "idle.contract".to_string(),
        description: Some(
            "Return the agent contract / verification policy enforced by this MCP \
             (from AGENTS.md)."
                .to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {}
        }),
    }
}

pub fn execute(session: &Arc<ServerSession>) -> McpResult<ToolCallResult> {
    Ok(ToolCallResult::json(&json!({
        "ok": true,
        "contract": session.contract_text(),
    })))
}
