//! JSON-RPC envelope validation.

use crate::types::{McpError, McpResult, JSONRPC_VERSION};

/// Check the protocol version tag and method name. Messages failing
/// this check are silently dropped by the dispatcher, never answered.
pub fn validate_envelope(jsonrpc: &str, method: &str) -> McpResult<()> {
    if jsonrpc != JSONRPC_VERSION {
        return Err(McpError::InvalidRequest(format!(
            "expected jsonrpc \"{JSONRPC_VERSION}\", got \"{jsonrpc}\""
        )));
    }

    if method.is_empty() {
        return Err(McpError::InvalidRequest(
            "method name must not be empty".to_string(),
        ));
    }

    Ok(())
}
