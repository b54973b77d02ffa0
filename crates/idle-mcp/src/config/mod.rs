//! Configuration loading and resolution.

use std::path::PathBuf;

/// Environment variable naming the contract document path.
pub const CONTRACT_PATH_ENV: &str = "IDLE_MCP_CONTRACT";

const DEFAULT_CONTRACT_FILE: &str = "AGENTS.md";

/// Resolve the contract document path: explicit flag, then the
/// environment, then `AGENTS.md` in the current directory.
pub fn resolve_contract_path(explicit: Option<&str>) -> PathBuf {
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }

    if let Ok(env_path) = std::env::var(CONTRACT_PATH_ENV) {
        if !env_path.is_empty() {
            return PathBuf::from(env_path);
        }
    }

    PathBuf::from(DEFAULT_CONTRACT_FILE)
}
