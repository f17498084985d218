//! Incremental line framing over a raw byte stream.
//!
//! The serial link is line oriented in both directions: mode sentinels and
//! diagnostics are ASCII text, relay responses are binary, and all of them end
//! with the `0x0A` terminator. `LineFramer` accumulates whatever the transport
//! produces and splits out complete lines as they arrive.

use bytes::BytesMut;

/// Initial buffer capacity; lines on this link are short.
const FRAMER_CAPACITY: usize = 256;

/// Accumulates received bytes and yields newline-terminated lines.
#[derive(Debug, Default)]
pub struct LineFramer {
    buffer: BytesMut,
}

impl LineFramer {
    /// Create a new framer.
    pub fn new() -> Self {
        LineFramer {
            buffer: BytesMut::with_capacity(FRAMER_CAPACITY),
        }
    }

    /// Add received data to the buffer.
    pub fn push(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Take the next complete line, including its terminator.
    ///
    /// Returns `None` until a terminator has been buffered.
    pub fn next_line(&mut self) -> Option<Vec<u8>> {
        let end = self
            .buffer
            .iter()
            .position(|&b| b == crate::FRAME_TERMINATOR)?;
        let line = self.buffer.split_to(end + 1).to_vec();
        Some(line)
    }

    /// Number of buffered bytes not yet part of a complete line.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Discard any buffered partial line.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
