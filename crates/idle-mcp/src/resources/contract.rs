//! Resource: idle://contract — the agent contract document.

use std::sync::Arc;

use crate::session::ServerSession;
use crate::types::{McpResult, ReadResourceResult, ResourceContent, ResourceDefinition};

pub const CONTRACT_URI: &str = "idle://contract";

pub fn definition() -> ResourceDefinition {
    ResourceDefinition {
        uri: CONTRACT_URI.to_string(),
        name: "Idle SDK Agent Contract".to_string(),
        description: Some(
            "Operational constraints: idle_cli is the only execution surface, \
             JSON-only stdout, no Flutter execution."
                .to_string(),
        ),
        mime_type: Some("text/markdown".to_string()),
    }
}

pub fn read(session: &Arc<ServerSession>) -> McpResult<ReadResourceResult> {
    Ok(ReadResourceResult {
        contents: vec![ResourceContent {
            uri: CONTRACT_URI.to_string(),
            mime_type: Some("text/markdown".to_string()),
            text: Some(session.contract_text().to_string()),
        }],
    })
}
