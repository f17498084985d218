//! Wheelwriter Relay Protocol
//!
//! This crate provides types and utilities for the binary relay protocol spoken
//! by the Wheelwriter interface board. The board sits between a host serial
//! connection and the typewriter's internal option bus: in relay mode it
//! forwards command frames onto the bus and reports a structured response line
//! for each one.
//!
//! # Protocol Overview
//!
//! Every command frame starts with an identifier byte selecting the frame kind
//! and ends with a newline terminator:
//!
//! - **Single, addressed** (`0x10`): address, command, data0, data1
//! - **Single, abbreviated** (`0x11`): command, data0, data1
//! - **Batch, addressed** (`0x12`): count, then count x (address, command, data0, data1)
//! - **Batch, abbreviated** (`0x13`): count, then count x (command, data0, data1)
//!
//! Abbreviated frames omit the bus address; the board substitutes its default
//! target (the typewriter's motor controller). The board answers with a
//! three-byte response line echoing the frame identifier, followed by a status
//! byte and a result byte.
//!
//! # Example
//!
//! ```rust,ignore
//! use wheelwriter_protocol::{BusCommand, CommandFrame, CMD_QUERY_PRINTWHEEL};
//!
//! let frame = CommandFrame::single(None, BusCommand::query(CMD_QUERY_PRINTWHEEL));
//! let bytes = frame.encode()?;
//! ```

mod constants;
mod error;
mod frame;
mod framer;
mod response;
mod types;

pub use constants::*;
pub use error::*;
pub use frame::*;
pub use framer::*;
pub use response::*;
pub use types::*;
