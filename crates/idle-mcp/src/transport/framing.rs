//! Content-Length framing: `Key: Value` header lines, a blank line,
//! then exactly that many bytes of UTF-8 JSON.

use serde_json::Value;

use crate::types::{McpError, McpResult};

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Incremental frame decoder over an append-only byte stream.
///
/// Chunks may split a header or a body at any byte boundary; complete
/// frames are surfaced in arrival order. A malformed header block or
/// an unparsable body drops that one frame only — the decoder keeps
/// scanning from the next byte after it.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buf: Vec<u8>,
    // Read cursor into `buf`; consumed bytes are reclaimed on the
    // next feed rather than on every extraction.
    pos: usize,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk of raw bytes from the peer.
    pub fn feed(&mut self, chunk: &[u8]) {
        if self.pos > 0 {
            self.buf.drain(..self.pos);
            self.pos = 0;
        }
        self.buf.extend_from_slice(chunk);
    }

    /// Extract the next complete frame's JSON value, if one is fully
    /// buffered. Returns `None` once the remaining bytes form at most
    /// a partial frame.
    pub fn next_message(&mut self) -> Option<Value> {
        loop {
            let pending = &self.buf[self.pos..];
            let header_end = find_subslice(pending, HEADER_TERMINATOR)?;

            let header_text = String::from_utf8_lossy(&pending[..header_end]);
            let body_start = header_end + HEADER_TERMINATOR.len();

            let content_length = match parse_content_length(&header_text) {
                Some(len) => len,
                None => {
                    tracing::warn!("invalid or missing Content-Length, dropping header block");
                    self.pos += body_start;
                    continue;
                }
            };

            if pending.len() < body_start + content_length {
                // Body not fully arrived yet.
                return None;
            }

            let body = &pending[body_start..body_start + content_length];
            let parsed: Result<Value, _> = serde_json::from_slice(body);
            self.pos += body_start + content_length;

            match parsed {
                Ok(value) => return Some(value),
                Err(e) => {
                    tracing::warn!("invalid JSON-RPC message body: {e}");
                    continue;
                }
            }
        }
    }
}

/// Parse the header block case-insensitively and return the declared
/// content length. `None` for a missing, non-numeric, or negative
/// value. Unknown headers are ignored.
fn parse_content_length(header_text: &str) -> Option<usize> {
    for line in header_text.split("\r\n") {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        if key.trim().eq_ignore_ascii_case("content-length") {
            return value.trim().parse::<usize>().ok();
        }
    }
    None
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Encode a value as a frame: header and body as separate buffers so
/// the transport can issue two writes, header first.
pub fn encode_frame(value: &Value) -> McpResult<(Vec<u8>, Vec<u8>)> {
    let body = serde_json::to_vec(value).map_err(McpError::Json)?;
    let header = format!("Content-Length: {}\r\n\r\n", body.len()).into_bytes();
    Ok((header, body))
}
