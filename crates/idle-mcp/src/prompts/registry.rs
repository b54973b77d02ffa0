//! Prompt registration and dispatch.

use serde_json::Value;

use crate::types::{McpError, McpResult, PromptDefinition, PromptGetResult};

use super::sync_check;

pub struct PromptRegistry;

impl PromptRegistry {
    pub fn list_prompts() -> Vec<PromptDefinition> {
        vec![sync_check::definition()]
    }

    pub fn get(name: &str, arguments: Option<Value>) -> McpResult<PromptGetResult> {
        let args = arguments.unwrap_or(Value::Object(serde_json::Map::new()));

        match name {
            sync_check::PROMPT_NAME => sync_check::expand(args),
            _ => Err(McpError::PromptNotFound(name.to_string())),
        }
    }
}
