//! Resource registration and dispatch.

use std::sync::Arc;

use crate::session::ServerSession;
use crate::types::{McpError, McpResult, ReadResourceResult, ResourceDefinition};

use super::contract;

pub struct ResourceRegistry;

impl ResourceRegistry {
    pub fn list_resources() -> Vec<ResourceDefinition> {
        vec![contract::definition()]
    }

    pub fn read(uri: &str, session: &Arc<ServerSession>) -> McpResult<ReadResourceResult> {
        match uri {
            contract::CONTRACT_URI => contract::read(session),
            _ => Err(McpError::ResourceNotFound(uri.to_string())),
        }
    }
}
