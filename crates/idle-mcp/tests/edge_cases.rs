//! Edge case integration tests for idle-mcp.
//!
//! Drives the protocol handler and the frame codec directly, covering
//! framing, dispatch, reply obligation, and the exec tool's failure
//! modes.

use std::io::Write;
use std::sync::Arc;

use serde_json::{json, Value};

use idle_mcp::protocol::ProtocolHandler;
use idle_mcp::session::ServerSession;
use idle_mcp::transport::framing::{self, FrameDecoder};
use idle_mcp::types::*;

// ─────────────────────── helpers ───────────────────────

const CONTRACT_TEXT: &str = "# Idle Agent Contract\nidle_cli is the only execution surface.\n";

/// Create a handler backed by a contract file in a temp dir.
fn handler_with_contract(dir: &tempfile::TempDir) -> ProtocolHandler {
    let path = dir.path().join("AGENTS.md");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(CONTRACT_TEXT.as_bytes()).unwrap();
    ProtocolHandler::new(Arc::new(ServerSession::load(&path)))
}

/// Build an MCP JSON-RPC request.
fn mcp_request(id: i64, method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params
    })
}

/// Build an initialize request.
fn init_request() -> Value {
    mcp_request(
        0,
        "initialize",
        json!({
            "protocolVersion": "2024-11-05",
            "capabilities": {},
            "clientInfo": { "name": "test-client", "version": "1.0" }
        }),
    )
}

/// Send a JSON-RPC message through the handler and return the response.
async fn send(handler: &ProtocolHandler, msg: Value) -> Option<Value> {
    let parsed: JsonRpcMessage = serde_json::from_value(msg).unwrap();
    handler.handle_message(parsed).await
}

/// Send and unwrap the response.
async fn send_unwrap(handler: &ProtocolHandler, msg: Value) -> Value {
    send(handler, msg).await.expect("expected response")
}

/// Extract the embedded JSON payload from a tool call response's text
/// content.
fn tool_payload(response: &Value) -> Value {
    let text = response["result"]["content"][0]["text"]
        .as_str()
        .expect("text content");
    serde_json::from_str(text).expect("payload is JSON")
}

fn frame_bytes(value: &Value) -> Vec<u8> {
    let (header, body) = framing::encode_frame(value).unwrap();
    let mut bytes = header;
    bytes.extend_from_slice(&body);
    bytes
}

// ═══════════════════════════════════════════════════════
// FRAMING
// ═══════════════════════════════════════════════════════

#[test]
fn test_chunked_stream_equals_whole_stream() {
    let messages = vec![
        mcp_request(1, "tools/list", json!({})),
        mcp_request(2, "prompts/list", json!({})),
    ];
    let mut stream = Vec::new();
    for m in &messages {
        stream.extend_from_slice(&frame_bytes(m));
    }

    let mut whole = FrameDecoder::new();
    whole.feed(&stream);
    let mut expected = Vec::new();
    while let Some(m) = whole.next_message() {
        expected.push(m);
    }
    assert_eq!(expected, messages);

    // Byte-at-a-time must decode identically.
    let mut decoder = FrameDecoder::new();
    let mut decoded = Vec::new();
    for byte in &stream {
        decoder.feed(std::slice::from_ref(byte));
        while let Some(m) = decoder.next_message() {
            decoded.push(m);
        }
    }
    assert_eq!(decoded, expected);
}

#[test]
fn test_short_body_never_delivers_early() {
    let msg = mcp_request(9, "tools/list", json!({}));
    let bytes = frame_bytes(&msg);

    let mut decoder = FrameDecoder::new();
    for prefix_len in 0..bytes.len() {
        let mut d = FrameDecoder::new();
        d.feed(&bytes[..prefix_len]);
        assert!(d.next_message().is_none(), "prefix_len={prefix_len}");
    }
    decoder.feed(&bytes);
    assert_eq!(decoder.next_message(), Some(msg));
}

#[test]
fn test_malformed_header_does_not_corrupt_next_frame() {
    let msg = mcp_request(3, "tools/list", json!({}));
    let mut decoder = FrameDecoder::new();
    decoder.feed(b"Content-Length: -5\r\n\r\n");
    decoder.feed(&frame_bytes(&msg));
    assert_eq!(decoder.next_message(), Some(msg));
}

// ═══════════════════════════════════════════════════════
// DISPATCH & REPLY OBLIGATION
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_request_with_id_zero_gets_reply() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_with_contract(&dir);

    let resp = send_unwrap(&handler, mcp_request(0, "tools/list", json!({}))).await;
    assert_eq!(resp["id"], 0);
    assert!(resp["result"]["tools"].is_array());
}

#[tokio::test]
async fn test_notification_never_gets_reply() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_with_contract(&dir);

    let notif = json!({"jsonrpc": "2.0", "method": "tools/list"});
    assert!(send(&handler, notif).await.is_none());
}

#[tokio::test]
async fn test_unknown_method_request_is_32601() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_with_contract(&dir);

    let resp = send_unwrap(&handler, mcp_request(5, "bogus/method", json!({}))).await;
    assert_eq!(resp["error"]["code"], -32601);
    assert!(resp["error"]["message"]
        .as_str()
        .unwrap()
        .contains("bogus/method"));
}

#[tokio::test]
async fn test_unknown_method_notification_is_silent() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_with_contract(&dir);

    let notif = json!({"jsonrpc": "2.0", "method": "bogus/method"});
    assert!(send(&handler, notif).await.is_none());
}

#[tokio::test]
async fn test_wrong_jsonrpc_version_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_with_contract(&dir);

    let msg = json!({"jsonrpc": "1.0", "id": 1, "method": "tools/list"});
    assert!(send(&handler, msg).await.is_none());
}

#[tokio::test]
async fn test_response_shaped_message_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_with_contract(&dir);

    let msg = json!({"jsonrpc": "2.0", "id": 1, "result": {}});
    assert!(send(&handler, msg).await.is_none());
}

// ═══════════════════════════════════════════════════════
// LIFECYCLE
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_initialize_echoes_requested_version() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_with_contract(&dir);

    let resp = send_unwrap(
        &handler,
        mcp_request(1, "initialize", json!({"protocolVersion": "2025-03-26"})),
    )
    .await;
    assert_eq!(resp["result"]["protocolVersion"], "2025-03-26");
    assert_eq!(resp["result"]["serverInfo"]["name"], "idle-mcp");
}

#[tokio::test]
async fn test_initialize_without_params_defaults_version() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_with_contract(&dir);

    let msg = json!({"jsonrpc": "2.0", "id": 1, "method": "initialize"});
    let resp = send_unwrap(&handler, msg).await;
    assert_eq!(resp["result"]["protocolVersion"], "2024-11-05");
}

/// No session precondition: listing works before any initialize.
#[tokio::test]
async fn test_tools_list_before_initialize_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_with_contract(&dir);

    let resp = send_unwrap(&handler, mcp_request(1, "tools/list", json!({}))).await;
    let names: Vec<&str> = resp["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["idle.exec", "idle.contract"]);
}

// ═══════════════════════════════════════════════════════
// TOOLS
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_unknown_tool_is_32601() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_with_contract(&dir);

    let resp = send_unwrap(
        &handler,
        mcp_request(2, "tools/call", json!({"name": "idle.nope"})),
    )
    .await;
    assert_eq!(resp["error"]["code"], -32601);
    assert_eq!(resp["error"]["message"], "Unknown tool: idle.nope");
}

#[tokio::test]
async fn test_exec_missing_args_is_invalid_params() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_with_contract(&dir);

    let resp = send_unwrap(
        &handler,
        mcp_request(2, "tools/call", json!({"name": "idle.exec", "arguments": {}})),
    )
    .await;
    assert_eq!(resp["error"]["code"], -32602);
}

#[tokio::test]
async fn test_exec_absent_executable_returns_guidance_not_error() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_with_contract(&dir);

    let resp = send_unwrap(
        &handler,
        mcp_request(
            3,
            "tools/call",
            json!({
                "name": "idle.exec",
                "arguments": {
                    "args": ["version"],
                    "idlePath": "/definitely/not/a/real/idle-binary"
                }
            }),
        ),
    )
    .await;

    // A failed run is a tool-level error result, never a JSON-RPC error.
    assert!(resp["error"].is_null());
    assert_eq!(resp["result"]["isError"], true);
    let payload = tool_payload(&resp);
    assert_eq!(payload["ok"], false);
    assert!(payload["error"]
        .as_str()
        .unwrap()
        .contains("idle_cli executable not found"));
    assert!(!payload["spawnError"].as_str().unwrap().is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn test_exec_json_stdout_success() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_with_contract(&dir);

    let resp = send_unwrap(
        &handler,
        mcp_request(
            4,
            "tools/call",
            json!({
                "name": "idle.exec",
                "arguments": {
                    "args": ["-c", "printf '{\"a\":1}'"],
                    "idlePath": "/bin/sh"
                }
            }),
        ),
    )
    .await;

    assert!(resp["result"]["isError"].is_null());
    let payload = tool_payload(&resp);
    assert_eq!(payload["ok"], true);
    assert_eq!(payload["code"], 0);
    assert_eq!(payload["json"], json!({"a": 1}));
    assert!(payload["jsonParseError"].is_null());
}

#[cfg(unix)]
#[tokio::test]
async fn test_exec_non_json_stdout_is_still_success() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_with_contract(&dir);

    let resp = send_unwrap(
        &handler,
        mcp_request(
            5,
            "tools/call",
            json!({
                "name": "idle.exec",
                "arguments": {
                    "args": ["-c", "printf 'not json'"],
                    "idlePath": "/bin/sh"
                }
            }),
        ),
    )
    .await;

    assert!(resp["result"]["isError"].is_null());
    let payload = tool_payload(&resp);
    assert_eq!(payload["ok"], true);
    assert!(payload["json"].is_null());
    assert!(!payload["jsonParseError"].as_str().unwrap().is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn test_exec_timeout_is_tool_error_with_full_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_with_contract(&dir);

    let resp = send_unwrap(
        &handler,
        mcp_request(
            6,
            "tools/call",
            json!({
                "name": "idle.exec",
                "arguments": {
                    "args": ["-c", "printf '{\"partial\":true}'; sleep 5"],
                    "idlePath": "/bin/sh",
                    "timeoutMs": 150
                }
            }),
        ),
    )
    .await;

    assert_eq!(resp["result"]["isError"], true);
    let payload = tool_payload(&resp);
    assert_eq!(payload["ok"], false);
    assert_eq!(payload["signal"], "SIGKILL");
}

#[tokio::test]
async fn test_contract_tool_returns_document() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_with_contract(&dir);

    let resp = send_unwrap(
        &handler,
        mcp_request(7, "tools/call", json!({"name": "idle.contract"})),
    )
    .await;

    assert!(resp["result"]["isError"].is_null());
    let payload = tool_payload(&resp);
    assert_eq!(payload["ok"], true);
    assert_eq!(payload["contract"], CONTRACT_TEXT);
}

// ═══════════════════════════════════════════════════════
// RESOURCES & PROMPTS
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_resources_list_and_read() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_with_contract(&dir);

    let resp = send_unwrap(&handler, mcp_request(1, "resources/list", json!({}))).await;
    assert_eq!(resp["result"]["resources"][0]["uri"], "idle://contract");

    let resp = send_unwrap(
        &handler,
        mcp_request(2, "resources/read", json!({"uri": "idle://contract"})),
    )
    .await;
    let content = &resp["result"]["contents"][0];
    assert_eq!(content["mimeType"], "text/markdown");
    assert_eq!(content["text"], CONTRACT_TEXT);
}

#[tokio::test]
async fn test_unknown_resource_uri_is_32602() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_with_contract(&dir);

    let resp = send_unwrap(
        &handler,
        mcp_request(3, "resources/read", json!({"uri": "idle://nope"})),
    )
    .await;
    assert_eq!(resp["error"]["code"], -32602);
    assert_eq!(resp["error"]["message"], "Unknown resource URI: idle://nope");
}

#[tokio::test]
async fn test_prompts_list_and_get() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_with_contract(&dir);

    let resp = send_unwrap(&handler, mcp_request(1, "prompts/list", json!({}))).await;
    assert_eq!(resp["result"]["prompts"][0]["name"], "idle.sync_check");

    let resp = send_unwrap(
        &handler,
        mcp_request(2, "prompts/get", json!({"name": "idle.sync_check"})),
    )
    .await;
    let message = &resp["result"]["messages"][0];
    assert_eq!(message["role"], "system");
    assert!(message["content"]["text"]
        .as_str()
        .unwrap()
        .contains("idle_cli"));
}

#[tokio::test]
async fn test_unknown_prompt_is_32602() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_with_contract(&dir);

    let resp = send_unwrap(
        &handler,
        mcp_request(3, "prompts/get", json!({"name": "idle.nope"})),
    )
    .await;
    assert_eq!(resp["error"]["code"], -32602);
    assert_eq!(resp["error"]["message"], "Unknown prompt: idle.nope");
}

// ═══════════════════════════════════════════════════════
// SMOKE SEQUENCE
// ═══════════════════════════════════════════════════════

/// initialize → initialized → tools/list → tools/call, end to end.
#[tokio::test]
async fn test_smoke_sequence() {
    let dir = tempfile::tempdir().unwrap();
    let handler = handler_with_contract(&dir);

    let resp = send_unwrap(&handler, init_request()).await;
    assert_eq!(resp["id"], 0);
    assert!(resp["result"]["capabilities"]["tools"].is_object());

    let initialized = json!({"jsonrpc": "2.0", "method": "initialized"});
    assert!(send(&handler, initialized).await.is_none());

    let resp = send_unwrap(&handler, mcp_request(1, "tools/list", json!({}))).await;
    assert_eq!(resp["result"]["tools"].as_array().unwrap().len(), 2);

    let resp = send_unwrap(
        &handler,
        mcp_request(2, "tools/call", json!({"name": "idle.contract"})),
    )
    .await;
    assert_eq!(tool_payload(&resp)["ok"], true);
}
