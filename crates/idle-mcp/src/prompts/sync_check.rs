//! Prompt: idle.sync_check — verification workflow for the Idle SDK.

use serde_json::Value;

use crate::types::{McpResult, PromptDefinition, PromptGetResult, PromptMessage, ToolContent};

pub const PROMPT_NAME: &str = "idle.sync_check";

pub fn definition() -> PromptDefinition {
    PromptDefinition {
        name: PROMPT_NAME.to_string(),
        description: Some(
            "Workflow prompt for verifying Idle SDK behavior using idle_cli JSON output \
             (no Dart API calls, no Flutter execution)."
                .to_string(),
        ),
    }
}

pub fn expand(_args: Value) -> McpResult<PromptGetResult> {
    let text = "You are a Local SDK Synchronization & Verification Agent for the Idle SDK.\n\
        \n\
        Hard rules:\n\
        - The ONLY allowed execution surface is idle_cli: run `idle <command>`.\n\
        - Base claims on JSON output from stdout; stderr is logs/errors.\n\
        - Never execute or import Flutter (idle_flutter is conceptual only).\n\
        - If idle_cli is missing, return installation guidance; never fabricate outcomes.\n\
        \n\
        Verification pattern:\n\
        1) State the claim.\n\
        2) Run the relevant `idle` command(s).\n\
        3) Inspect the returned JSON.\n\
        4) Compare expected vs actual.\n\
        5) Assess impact across idle_core / idle_save / idle_flutter.\n\
        6) Declare confidence (execution-verified >= 90%)."
        .to_string();

    Ok(PromptGetResult {
        description: Some("Idle SDK synchronization checklist".to_string()),
        messages: vec![PromptMessage {
            role: "system".to_string(),
            content: ToolContent::Text { text },
        }],
    })
}
