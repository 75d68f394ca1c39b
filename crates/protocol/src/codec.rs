//! Incremental frame codec.
//!
//! The wire carries JSON objects with no length prefix and no guaranteed
//! framing boundary: one object may arrive split across multiple reads, or
//! several objects may arrive in a single read. The decoder buffers raw
//! bytes and yields every syntactically complete object, retaining partial
//! trailing data for the next push.
//!
//! A malformed (but brace-balanced) object is logged and skipped; it never
//! corrupts recovery of later frames, and it never crashes the transport.

use agentwire_core::Frame;
use tracing::warn;

/// Encode one frame as a newline-terminated JSON line.
///
/// One frame per line keeps the peer's incremental reader simple: it can
/// make progress on every newline without any additional framing.
pub fn encode(frame: &Frame) -> Vec<u8> {
    // Frame serialization cannot fail: every field is a plain string/enum.
    let mut bytes = serde_json::to_vec(frame).unwrap_or_default();
    bytes.push(b'\n');
    bytes
}

/// What the object scanner found in the buffer.
enum Scan {
    /// A balanced object spans `[start, end)` of the scanned slice.
    Complete { start: usize, end: usize },
    /// An object starts at `start` but the buffer ends before it closes.
    Partial { start: usize },
    /// No object start in the scanned slice.
    Nothing,
}

/// Scan for the first complete top-level JSON object.
///
/// Tracks brace depth with string/escape awareness. Operating on bytes is
/// UTF-8 safe: `{`, `}`, `"` and `\` never occur as continuation bytes.
fn scan_object(bytes: &[u8]) -> Scan {
    let Some(start) = bytes.iter().position(|&b| b == b'{') else {
        return Scan::Nothing;
    };

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Scan::Complete { start, end: i + 1 };
                }
            }
            _ => {}
        }
    }

    Scan::Partial { start }
}

/// Incremental decoder for a stream of JSON frames.
///
/// Feed it raw byte chunks as they arrive; it yields complete frames in
/// order and keeps unconsumed bytes buffered. One decoder instance per
/// pipe direction.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
    decode_errors: u64,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and decode every complete frame now available.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Frame> {
        self.buffer.extend_from_slice(chunk);

        let mut frames = Vec::new();
        let mut consumed = 0;

        loop {
            match scan_object(&self.buffer[consumed..]) {
                Scan::Complete { start, end } => {
                    let slice = &self.buffer[consumed + start..consumed + end];
                    match serde_json::from_slice::<Frame>(slice) {
                        Ok(frame) => frames.push(frame),
                        Err(e) => {
                            self.decode_errors += 1;
                            warn!(
                                error = %e,
                                object = %String::from_utf8_lossy(slice),
                                "Skipping malformed frame"
                            );
                        }
                    }
                    consumed += end;
                }
                Scan::Partial { start } => {
                    // Keep the partial object (and nothing before it).
                    consumed += start;
                    break;
                }
                Scan::Nothing => {
                    // No object start anywhere: drop inter-frame noise.
                    consumed = self.buffer.len();
                    break;
                }
            }
        }

        self.buffer.drain(..consumed);
        frames
    }

    /// Bytes currently buffered waiting for the rest of a frame.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// How many malformed objects have been skipped so far.
    pub fn decode_errors(&self) -> u64 {
        self.decode_errors
    }
}
