//! Main request dispatcher — receives JSON-RPC messages, routes to handlers.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde_json::Value;

use crate::prompts::PromptRegistry;
use crate::resources::ResourceRegistry;
use crate::session::ServerSession;
use crate::tools::ToolRegistry;
use crate::types::*;

use super::negotiation::SessionState;
use super::validator::validate_envelope;

/// The main protocol handler that dispatches incoming JSON-RPC messages.
pub struct ProtocolHandler {
    session: Arc<ServerSession>,
    state: Mutex<SessionState>,
}

impl ProtocolHandler {
    pub fn new(session: Arc<ServerSession>) -> Self {
        Self {
            session,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Handle one decoded message, producing at most one response
    /// value. Requests (id present, `0` included) get exactly one
    /// response; notifications and undecodable envelopes get none.
    pub async fn handle_message(&self, msg: JsonRpcMessage) -> Option<Value> {
        match msg {
            JsonRpcMessage::Request(req) => {
                if let Err(e) = validate_envelope(&req.jsonrpc, &req.method) {
                    tracing::debug!("ignoring invalid request envelope: {e}");
                    return None;
                }
                Some(self.handle_request(req).await)
            }
            JsonRpcMessage::Notification(notif) => {
                if let Err(e) = validate_envelope(&notif.jsonrpc, &notif.method) {
                    tracing::debug!("ignoring invalid notification envelope: {e}");
                    return None;
                }
                self.handle_notification(notif).await;
                None
            }
            _ => {
                tracing::debug!("ignoring response-shaped message from client");
                None
            }
        }
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> Value {
        let id = request.id.clone();
        let result = self.dispatch_request(&request).await;

        match result {
            Ok(value) => serde_json::to_value(JsonRpcResponse::new(id, value)).unwrap_or_default(),
            Err(e) => serde_json::to_value(e.to_json_rpc_error(id)).unwrap_or_default(),
        }
    }

    async fn dispatch_request(&self, request: &JsonRpcRequest) -> McpResult<Value> {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request.params.clone()).await,

            "tools/list" => self.handle_tools_list(),
            "tools/call" => self.handle_tools_call(request.params.clone()).await,

            "resources/list" => self.handle_resources_list(),
            "resources/read" => self.handle_resources_read(request.params.clone()),

            "prompts/list" => self.handle_prompts_list(),
            "prompts/get" => self.handle_prompts_get(request.params.clone()),

            _ => Err(McpError::MethodNotFound(request.method.clone())),
        }
    }

    async fn handle_notification(&self, notification: JsonRpcNotification) {
        match notification.method.as_str() {
            "initialized" | "notifications/initialized" => {
                self.state.lock().await.mark_initialized();
            }
            _ => {
                tracing::debug!("unknown notification: {}", notification.method);
            }
        }
    }

    async fn handle_initialize(&self, params: Option<Value>) -> McpResult<Value> {
        // Missing or partial params are tolerated.
        let init_params: InitializeParams = params
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| McpError::InvalidParams(e.to_string()))?
            .unwrap_or_default();

        let result = self.state.lock().await.negotiate(init_params);
        serde_json::to_value(result).map_err(McpError::Json)
    }

    fn handle_tools_list(&self) -> McpResult<Value> {
        let result = ToolListResult {
            tools: ToolRegistry::list_tools(),
        };
        serde_json::to_value(result).map_err(McpError::Json)
    }

    async fn handle_tools_call(&self, params: Option<Value>) -> McpResult<Value> {
        let call_params: ToolCallParams = params
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| McpError::InvalidParams(e.to_string()))?
            .ok_or_else(|| McpError::InvalidParams("tool call params required".to_string()))?;

        let result =
            ToolRegistry::call(&call_params.name, call_params.arguments, &self.session).await?;

        serde_json::to_value(result).map_err(McpError::Json)
    }

    fn handle_resources_list(&self) -> McpResult<Value> {
        let result = ResourceListResult {
            resources: ResourceRegistry::list_resources(),
        };
        serde_json::to_value(result).map_err(McpError::Json)
    }

    fn handle_resources_read(&self, params: Option<Value>) -> McpResult<Value> {
        let read_params: ResourceReadParams = params
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| McpError::InvalidParams(e.to_string()))?
            .ok_or_else(|| McpError::InvalidParams("resource read params required".to_string()))?;

        let result = ResourceRegistry::read(&read_params.uri, &self.session)?;
        serde_json::to_value(result).map_err(McpError::Json)
    }

    fn handle_prompts_list(&self) -> McpResult<Value> {
        let result = PromptListResult {
            prompts: PromptRegistry::list_prompts(),
        };
        serde_json::to_value(result).map_err(McpError::Json)
    }

    fn handle_prompts_get(&self, params: Option<Value>) -> McpResult<Value> {
        let get_params: PromptGetParams = params
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| McpError::InvalidParams(e.to_string()))?
            .ok_or_else(|| McpError::InvalidParams("prompt get params required".to_string()))?;

        let result = PromptRegistry::get(&get_params.name, get_params.arguments)?;
        serde_json::to_value(result).map_err(McpError::Json)
    }
}
