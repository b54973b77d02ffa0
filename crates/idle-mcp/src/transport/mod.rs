//! Transport layer for MCP communication.

pub mod framing;
pub mod stdio;

pub use framing::FrameDecoder;
pub use stdio::StdioTransport;
