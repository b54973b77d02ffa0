//! Per-process session state: server identity and the cached agent
//! contract document. Loaded once at startup, immutable thereafter.

use std::path::Path;

/// State shared by every handler for the lifetime of one peer.
pub struct ServerSession {
    contract: String,
}

impl ServerSession {
    /// Load the contract document. A missing or unreadable file is
    /// not fatal — the server serves an empty contract and says so.
    pub fn load(contract_path: &Path) -> Self {
        let contract = match std::fs::read_to_string(contract_path) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    "contract document not readable at {}: {e}",
                    contract_path.display()
                );
                String::new()
            }
        };

        Self { contract }
    }

    pub fn contract_text(&self) -> &str {
        &self.contract
    }
}
