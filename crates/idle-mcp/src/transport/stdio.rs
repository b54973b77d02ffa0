//! Stdio transport — reads framed JSON-RPC from stdin, writes to stdout.

use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::protocol::ProtocolHandler;
use crate::types::{JsonRpcMessage, McpError, McpResult};

use super::framing::{self, FrameDecoder};

const READ_CHUNK: usize = 8192;

/// Stdio transport for a single connected peer.
pub struct StdioTransport {
    handler: ProtocolHandler,
}

impl StdioTransport {
    pub fn new(handler: ProtocolHandler) -> Self {
        Self { handler }
    }

    /// Run the transport loop until EOF on stdin.
    ///
    /// Each decoded frame is dispatched to completion before the next
    /// buffered frame is considered, so responses preserve arrival
    /// order.
    pub async fn run(&self) -> McpResult<()> {
        let mut stdin = tokio::io::stdin();
        let mut stdout = tokio::io::stdout();
        let mut decoder = FrameDecoder::new();
        let mut chunk = [0u8; READ_CHUNK];

        tracing::info!("stdio transport started");

        loop {
            let n = stdin.read(&mut chunk).await.map_err(McpError::Io)?;
            if n == 0 {
                tracing::info!("EOF on stdin, shutting down");
                break;
            }

            decoder.feed(&chunk[..n]);
            while let Some(raw) = decoder.next_message() {
                let msg: JsonRpcMessage = match serde_json::from_value(raw) {
                    Ok(msg) => msg,
                    Err(e) => {
                        // Valid JSON that is not a JSON-RPC envelope;
                        // skipped without a reply.
                        tracing::debug!("ignoring non-JSON-RPC payload: {e}");
                        continue;
                    }
                };

                if let Some(response) = self.handler.handle_message(msg).await {
                    let (header, body) = framing::encode_frame(&response)?;
                    stdout.write_all(&header).await.map_err(McpError::Io)?;
                    stdout.write_all(&body).await.map_err(McpError::Io)?;
                    stdout.flush().await.map_err(McpError::Io)?;
                }
            }
        }

        Ok(())
    }
}
