//! Command frame building and encoding.
//!
//! A frame carries one or more typewriter commands to the interface board.
//! The leading identifier byte selects between single and batch cardinality
//! and between addressed and abbreviated (default bus address) forms:
//!
//! ```text
//! +------+---------------------------+------+
//! | 0x10 | addr cmd d0 d1            | 0x0A |   single, addressed
//! | 0x11 | cmd d0 d1                 | 0x0A |   single, abbreviated
//! | 0x12 | n (addr cmd d0 d1) x n    | 0x0A |   batch, addressed
//! | 0x13 | n (cmd d0 d1) x n         | 0x0A |   batch, abbreviated
//! +------+---------------------------+------+
//! ```

use log::trace;

use crate::constants::*;
use crate::error::ProtocolError;

/// One typewriter command with its two data bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusCommand {
    /// Typewriter command code (`CMD_*`).
    pub command: u8,
    /// Two data bytes; meaning depends on the command.
    pub data: [u8; 2],
}

impl BusCommand {
    /// Create a command with both data bytes.
    pub fn new(command: u8, data: [u8; 2]) -> Self {
        BusCommand { command, data }
    }

    /// Create a command carrying a single data value; the second byte is zero.
    pub fn with_value(command: u8, value: u8) -> Self {
        BusCommand {
            command,
            data: [value, 0],
        }
    }

    /// Create a query command with no data.
    pub fn query(command: u8) -> Self {
        BusCommand {
            command,
            data: [0, 0],
        }
    }
}

/// A batch of commands delivered to the board as one frame.
///
/// The board forwards the entries onto the bus back to back and acknowledges
/// the whole batch with a single response. The two constructors replace the
/// scalar-or-sequence arguments of older client implementations: pick
/// [`Batch::uniform`] to repeat one command, [`Batch::per_entry`] to supply
/// each entry yourself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    entries: Vec<BusCommand>,
    addresses: Option<Vec<u8>>,
}

impl Batch {
    /// Build a batch repeating the same command `count` times.
    pub fn uniform(entry: BusCommand, count: usize) -> Self {
        Batch {
            entries: vec![entry; count],
            addresses: None,
        }
    }

    /// Build a batch from explicit per-entry commands.
    pub fn per_entry(entries: Vec<BusCommand>) -> Self {
        Batch {
            entries,
            addresses: None,
        }
    }

    /// Address every entry at the same bus address (selects the 0x12 kind).
    pub fn addressed(mut self, address: u8) -> Self {
        self.addresses = Some(vec![address; self.entries.len()]);
        self
    }

    /// Supply one bus address per entry (selects the 0x12 kind).
    pub fn addressed_per_entry(mut self, addresses: Vec<u8>) -> Self {
        self.addresses = Some(addresses);
        self
    }

    /// Number of entries in the batch.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the batch has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn validate(&self) -> Result<(), ProtocolError> {
        if self.entries.is_empty() {
            return Err(ProtocolError::EmptyBatch);
        }
        if self.entries.len() > MAX_BATCH_SIZE {
            return Err(ProtocolError::BatchTooLarge {
                len: self.entries.len(),
            });
        }
        if let Some(addresses) = &self.addresses {
            if addresses.len() != self.entries.len() {
                return Err(ProtocolError::BatchLengthMismatch {
                    entries: self.entries.len(),
                    addresses: addresses.len(),
                });
            }
        }
        Ok(())
    }
}

/// A complete command frame, ready to encode for the serial link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandFrame {
    /// One command; `address` of `None` selects the abbreviated 0x11 kind.
    Single {
        /// Explicit bus address, or `None` for the board's default target.
        address: Option<u8>,
        /// The command entry.
        entry: BusCommand,
    },
    /// A batch of commands sent as one unit.
    Batch(Batch),
}

impl CommandFrame {
    /// Build a single-command frame.
    pub fn single(address: Option<u8>, entry: BusCommand) -> Self {
        CommandFrame::Single { address, entry }
    }

    /// The identifier byte this frame starts with; the board echoes it back
    /// as the first byte of the matching response line.
    pub fn identifier(&self) -> u8 {
        match self {
            CommandFrame::Single { address: Some(_), .. } => FRAME_SINGLE_ADDRESSED,
            CommandFrame::Single { address: None, .. } => FRAME_SINGLE_ABBREVIATED,
            CommandFrame::Batch(batch) if batch.addresses.is_some() => FRAME_BATCH_ADDRESSED,
            CommandFrame::Batch(_) => FRAME_BATCH_ABBREVIATED,
        }
    }

    /// Encode the frame to wire bytes, including the terminator.
    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        buf.push(self.identifier());

        match self {
            CommandFrame::Single { address, entry } => {
                if let Some(address) = address {
                    buf.push(*address);
                }
                buf.push(entry.command);
                buf.extend_from_slice(&entry.data);
            }

            CommandFrame::Batch(batch) => {
                batch.validate()?;
                buf.push(batch.entries.len() as u8);
                match &batch.addresses {
                    Some(addresses) => {
                        for (address, entry) in addresses.iter().zip(&batch.entries) {
                            buf.push(*address);
                            buf.push(entry.command);
                            buf.extend_from_slice(&entry.data);
                        }
                    }
                    None => {
                        for entry in &batch.entries {
                            buf.push(entry.command);
                            buf.extend_from_slice(&entry.data);
                        }
                    }
                }
            }
        }

        buf.push(FRAME_TERMINATOR);
        trace!("encoded frame: [{}]", crate::hex_bytes(&buf));
        Ok(buf)
    }

    fn encoded_len(&self) -> usize {
        match self {
            CommandFrame::Single { address, .. } => {
                if address.is_some() {
                    6
                } else {
                    5
                }
            }
            CommandFrame::Batch(batch) => {
                let entry_len = if batch.addresses.is_some() { 4 } else { 3 };
                3 + batch.entries.len() * entry_len
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_addressed_encoding() {
        let frame = CommandFrame::single(Some(0x21), BusCommand::new(0x08, [0, 0]));
        assert_eq!(frame.identifier(), FRAME_SINGLE_ADDRESSED);
        let bytes = frame.encode().expect("encode should succeed");
        assert_eq!(bytes, vec![0x10, 0x21, 0x08, 0x00, 0x00, 0x0A]);
    }

    #[test]
    fn test_single_abbreviated_encoding() {
        let frame = CommandFrame::single(None, BusCommand::query(0x08));
        assert_eq!(frame.identifier(), FRAME_SINGLE_ABBREVIATED);
        let bytes = frame.encode().expect("encode should succeed");
        assert_eq!(bytes, vec![0x11, 0x08, 0x00, 0x00, 0x0A]);
    }

    #[test]
    fn test_scalar_data_expands_to_two_bytes() {
        let entry = BusCommand::with_value(0x05, 0x90);
        assert_eq!(entry.data, [0x90, 0x00]);
    }

    #[test]
    fn test_batch_abbreviated_encoding() {
        // Four type-and-advance commands with identical spacing: 18 bytes.
        let entry = BusCommand::new(CMD_TYPE_AND_ADVANCE, [0x01, 0x0A]);
        let frame = CommandFrame::Batch(Batch::uniform(entry, 4));
        assert_eq!(frame.identifier(), FRAME_BATCH_ABBREVIATED);
        let bytes = frame.encode().expect("encode should succeed");
        assert_eq!(bytes.len(), 18);
        assert_eq!(bytes[0], 0x13);
        assert_eq!(bytes[1], 4);
        assert_eq!(&bytes[2..5], &[CMD_TYPE_AND_ADVANCE, 0x01, 0x0A]);
        assert_eq!(bytes[17], 0x0A);
    }

    #[test]
    fn test_batch_addressed_encoding() {
        let entries = vec![
            BusCommand::new(0x03, [0x01, 0x0A]),
            BusCommand::new(0x03, [0x59, 0x0A]),
        ];
        let frame = CommandFrame::Batch(Batch::per_entry(entries).addressed(0x21));
        assert_eq!(frame.identifier(), FRAME_BATCH_ADDRESSED);
        let bytes = frame.encode().expect("encode should succeed");
        assert_eq!(
            bytes,
            vec![0x12, 2, 0x21, 0x03, 0x01, 0x0A, 0x21, 0x03, 0x59, 0x0A, 0x0A]
        );
    }

    #[test]
    fn test_batch_too_large_is_rejected() {
        let entry = BusCommand::query(0x03);
        let frame = CommandFrame::Batch(Batch::uniform(entry, 256));
        let err = frame.encode().expect_err("encode should fail");
        assert_eq!(err, ProtocolError::BatchTooLarge { len: 256 });
    }

    #[test]
    fn test_batch_at_limit_is_accepted() {
        let entry = BusCommand::query(0x03);
        let frame = CommandFrame::Batch(Batch::uniform(entry, 255));
        let bytes = frame.encode().expect("encode should succeed");
        assert_eq!(bytes[1], 255);
        assert_eq!(bytes.len(), 2 + 255 * 3 + 1);
    }

    #[test]
    fn test_empty_batch_is_rejected() {
        let frame = CommandFrame::Batch(Batch::per_entry(Vec::new()));
        let err = frame.encode().expect_err("encode should fail");
        assert_eq!(err, ProtocolError::EmptyBatch);
    }

    #[test]
    fn test_batch_address_length_mismatch() {
        let entries = vec![BusCommand::query(0x03); 3];
        let frame =
            CommandFrame::Batch(Batch::per_entry(entries).addressed_per_entry(vec![0x21, 0x21]));
        let err = frame.encode().expect_err("encode should fail");
        assert_eq!(
            err,
            ProtocolError::BatchLengthMismatch {
                entries: 3,
                addresses: 2
            }
        );
    }
}
