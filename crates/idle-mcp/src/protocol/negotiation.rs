//! Session negotiation state recorded during initialization.

use crate::types::{Implementation, InitializeParams, InitializeResult};

/// What the client told us at `initialize`, plus the handshake mark.
/// No method enforces initialization as a precondition.
#[derive(Debug, Default)]
pub struct SessionState {
    pub client: Option<Implementation>,
    pub protocol_version: Option<String>,
    pub initialized: bool,
}

impl SessionState {
    /// Record the client's parameters and produce the server's
    /// `initialize` result, echoing the requested protocol version.
    pub fn negotiate(&mut self, params: InitializeParams) -> InitializeResult {
        if let Some(client) = &params.client_info {
            tracing::info!("client: {} v{}", client.name, client.version);
        }

        self.protocol_version = params.protocol_version.clone();
        self.client = params.client_info;

        InitializeResult::for_request(self.protocol_version.as_deref())
    }

    pub fn mark_initialized(&mut self) {
        self.initialized = true;
        tracing::info!("MCP handshake complete");
    }
}
