//! Error types for the client crate.

use thiserror::Error;
use wheelwriter_protocol::ProtocolError;

use crate::session::Mode;

/// Errors that can occur while driving the interface board.
#[derive(Error, Debug)]
pub enum ClientError {
    /// I/O error on the transport.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serial port error while opening or configuring the device.
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// Wire protocol error, including errors reported by the board.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The board never answered the ready handshake.
    #[error("failed to connect to the interface board after {attempts} attempts")]
    ConnectionTimeout {
        /// Number of probes sent before giving up.
        attempts: u32,
    },

    /// The board never acknowledged a mode switch with `[BEGIN]`.
    #[error("timed out waiting for the board to enter {mode} mode")]
    ModeSwitchTimeout {
        /// Mode that was being entered.
        mode: Mode,
    },

    /// An operation required a mode the session is not in.
    #[error("operation requires {required} mode, but the session is in {actual} mode")]
    WrongMode {
        /// Mode the operation requires.
        required: Mode,
        /// Mode the session is actually in.
        actual: Mode,
    },

    /// The selected keyboard has no host-side glyph table.
    #[error("no glyph table for keyboard {0}")]
    UnsupportedKeyboard(crate::glyphs::Keyboard),
}
