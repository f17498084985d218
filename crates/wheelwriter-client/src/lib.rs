//! Wheelwriter client
//!
//! Host-side driver for the Wheelwriter serial interface board. The board
//! boots into a ready state and offers three operating modes:
//!
//! - **relay** — binary command frames are forwarded onto the typewriter's
//!   option bus and each is acknowledged with a structured response
//! - **type** — raw characters are translated by the board's own keyboard
//!   tables and typed directly
//! - **read** — bus traffic is reported passively as text lines
//!
//! A [`Session`] owns the transport and the single mode state; entering a mode
//! hands back a guard that restores the board to ready on every exit path.
//! In relay mode, [`Typewriter`] turns semantic operations (type a character,
//! move the carriage, feed the platen) into bus command frames.
//!
//! ```rust,ignore
//! use wheelwriter_client::{Session, SerialTransport, SessionConfig, Typewriter};
//!
//! let transport = SerialTransport::open("/dev/ttyACM0", 115200, true)?;
//! let mut session = Session::new(transport, SessionConfig::default());
//! session.connect()?;
//!
//! let relay = session.enter_relay()?;
//! let mut typewriter = Typewriter::new(relay);
//! typewriter.calibrate_pitch()?;
//! typewriter.type_str("Hello, world!")?;
//! typewriter.carriage_return()?;
//! ```

mod error;
mod glyphs;
mod modes;
mod session;
mod transport;
mod typewriter;

pub use error::*;
pub use glyphs::*;
pub use modes::*;
pub use session::*;
pub use transport::*;
pub use typewriter::*;
