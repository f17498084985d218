//! Protocol error types.

use thiserror::Error;

/// Errors that can occur when building frames or interpreting responses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A batch frame exceeds the one-byte count field.
    #[error("batch of {len} entries exceeds the maximum of {max}", max = crate::MAX_BATCH_SIZE)]
    BatchTooLarge {
        /// Number of entries requested.
        len: usize,
    },

    /// A batch frame was built with no entries.
    #[error("batch frames must contain at least one entry")]
    EmptyBatch,

    /// Per-entry address list does not line up with the entry list.
    #[error("batch has {entries} entries but {addresses} addresses")]
    BatchLengthMismatch {
        /// Number of command entries.
        entries: usize,
        /// Number of addresses supplied.
        addresses: usize,
    },

    /// Response line is too short to carry identifier, status and result.
    #[error("response too short: expected at least {expected} bytes, got {actual}")]
    ResponseTooShort {
        /// Expected minimum length.
        expected: usize,
        /// Actual length received.
        actual: usize,
    },

    /// The board reported a non-success status for a command.
    #[error("interface returned error status 0x{status:02X} with data 0x{code:02X}")]
    CommandFailed {
        /// Status byte from the response.
        status: u8,
        /// Result/error payload byte from the response.
        code: u8,
    },
}
