//! Responses from the interface board.
//!
//! In relay mode the board answers every command frame with one newline
//! terminated line of at least three bytes: the echoed frame identifier, a
//! status byte, and a result byte. The board may emit unrelated diagnostic
//! lines first; callers match on the identifier to find the real reply.

use crate::constants::*;
use crate::error::ProtocolError;

/// A parsed relay response line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response {
    /// Echoed frame identifier byte.
    pub identifier: u8,
    /// Status byte; [`STATUS_OK`] means the command succeeded.
    pub status: u8,
    /// Result byte: the queried value on success, an error payload otherwise.
    pub result: u8,
}

impl Response {
    /// Parse a response from a raw line.
    ///
    /// The trailing terminator, if present, is ignored.
    pub fn parse(line: &[u8]) -> Result<Self, ProtocolError> {
        if line.len() < 3 {
            return Err(ProtocolError::ResponseTooShort {
                expected: 3,
                actual: line.len(),
            });
        }
        Ok(Response {
            identifier: line[0],
            status: line[1],
            result: line[2],
        })
    }

    /// Whether this line answers a frame with the given identifier.
    pub fn answers(line: &[u8], identifier: u8) -> bool {
        line.first() == Some(&identifier)
    }

    /// Convert the response into the command's result byte, surfacing a
    /// non-success status as [`ProtocolError::CommandFailed`].
    pub fn into_result(self) -> Result<u8, ProtocolError> {
        if self.status == STATUS_OK {
            Ok(self.result)
        } else {
            Err(ProtocolError::CommandFailed {
                status: self.status,
                code: self.result,
            })
        }
    }
}
