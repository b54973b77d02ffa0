//! Tool registration and dispatch.

use std::sync::Arc;

use serde_json::Value;

use crate::session::ServerSession;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

use super::{contract, exec};

pub struct ToolRegistry;

impl ToolRegistry {
    pub fn list_tools() -> Vec<ToolDefinition> {
        vec![exec::definition(), contract::definition()]
    }

    pub async fn call(
        name: &str,
        arguments: Option<Value>,
        session: &Arc<ServerSession>,
    ) -> McpResult<ToolCallResult> {
        let args = arguments.unwrap_or(Value::Object(serde_json::Map::new()));

        match name {
            "idle.exec" => exec::execute(args).await,
            "idle.contract" => contract::execute(session),
            _ => Err(McpError::ToolNotFound(name.to_string())),
        }
    }
}
