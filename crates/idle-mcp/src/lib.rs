//! idle-mcp — MCP server exposing the idle CLI to agents over stdio JSON-RPC.

pub mod config;
pub mod prompts;
pub mod protocol;
pub mod resources;
pub mod session;
pub mod tools;
pub mod transport;
pub mod types;

pub use config::resolve_contract_path;
pub use protocol::ProtocolHandler;
pub use session::ServerSession;
pub use transport::StdioTransport;
