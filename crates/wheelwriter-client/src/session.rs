//! Session and mode state machine for the interface board.
//!
//! The board starts unconnected, answers a newline probe with `[READY]`, and
//! from ready can be switched into one of three operating modes. The session
//! is the single owner of the mode state; mode handlers borrow the session
//! and never track the mode themselves.

use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};
use wheelwriter_protocol::{
    BANNER_PREFIX, CTRL_EXIT_MODE, MODE_READ, MODE_RELAY, MODE_TYPE, TOKEN_BEGIN, TOKEN_READY,
};

use crate::error::ClientError;
use crate::glyphs::Keyboard;
use crate::modes::{ReadMode, RelayMode, TypeMode};
use crate::transport::{line_to_text, Transport};

/// Operating mode of the interface board, as tracked by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// No handshake has completed yet.
    Unconnected,
    /// The board is idle and accepting mode commands.
    Ready,
    /// Character relay: raw characters are typed via the board's own tables.
    TypeRelay,
    /// Bus relay: binary command frames are forwarded onto the option bus.
    BusRelay,
    /// Passive read: bus traffic is reported as text lines.
    PassiveRead,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Unconnected => write!(f, "unconnected"),
            Mode::Ready => write!(f, "ready"),
            Mode::TypeRelay => write!(f, "type"),
            Mode::BusRelay => write!(f, "relay"),
            Mode::PassiveRead => write!(f, "read"),
        }
    }
}

/// Tunable session behavior.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Number of newline probes sent before the handshake gives up.
    pub max_connect_attempts: u32,
    /// Backoff between failed probes; the board needs time to come up.
    pub connect_retry_delay: Duration,
    /// Bound on waiting for `[BEGIN]` after a mode command.
    pub mode_switch_timeout: Duration,
    /// Pause after each character streamed in type mode.
    pub type_char_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            max_connect_attempts: 5,
            connect_retry_delay: Duration::from_secs(1),
            mode_switch_timeout: Duration::from_secs(10),
            type_char_delay: Duration::from_millis(50),
        }
    }
}

/// A connection to the interface board.
///
/// Entering a mode returns a guard; dropping the guard (on any path,
/// including errors and panics) sends the exit sequence so the board is left
/// in ready for the next caller.
pub struct Session<T: Transport> {
    transport: T,
    mode: Mode,
    config: SessionConfig,
}

impl<T: Transport> Session<T> {
    /// Create a session over an open transport. No bytes are exchanged until
    /// [`Session::connect`].
    pub fn new(transport: T, config: SessionConfig) -> Self {
        Session {
            transport,
            mode: Mode::Unconnected,
            config,
        }
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Direct access to the underlying transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Perform the ready handshake. A no-op if the session is already ready.
    ///
    /// Sends a newline probe and reads the board's answer, skipping one
    /// leading `###` banner line, until the literal `[READY]` arrives.
    /// Failed probes back off before retrying; exhausting the attempt budget
    /// is a [`ClientError::ConnectionTimeout`].
    pub fn connect(&mut self) -> Result<(), ClientError> {
        match self.mode {
            Mode::Ready => return Ok(()),
            Mode::Unconnected => {}
            actual => {
                return Err(ClientError::WrongMode {
                    required: Mode::Ready,
                    actual,
                })
            }
        }

        for attempt in 1..=self.config.max_connect_attempts {
            debug!(attempt, "probing interface board");
            self.transport.write_bytes(b"\n")?;

            let mut line = line_to_text(&self.transport.read_line()?);
            if line.starts_with(BANNER_PREFIX) {
                trace!(banner = %line, "skipping banner line");
                line = line_to_text(&self.transport.read_line()?);
            }
            if line == TOKEN_READY {
                debug!("interface board is ready");
                self.mode = Mode::Ready;
                return Ok(());
            }

            if attempt < self.config.max_connect_attempts {
                thread::sleep(self.config.connect_retry_delay);
            }
        }

        Err(ClientError::ConnectionTimeout {
            attempts: self.config.max_connect_attempts,
        })
    }

    /// Enter bus relay mode.
    pub fn enter_relay(&mut self) -> Result<RelayMode<'_, T>, ClientError> {
        self.switch_mode(MODE_RELAY, Mode::BusRelay)?;
        Ok(RelayMode::new(self))
    }

    /// Enter character relay (type) mode with the given keyboard layout.
    pub fn enter_type(&mut self, keyboard: Keyboard) -> Result<TypeMode<'_, T>, ClientError> {
        let command = format!("{} {}", MODE_TYPE, keyboard.id());
        self.switch_mode(&command, Mode::TypeRelay)?;
        Ok(TypeMode::new(self))
    }

    /// Enter passive bus read mode.
    pub fn enter_read(&mut self) -> Result<ReadMode<'_, T>, ClientError> {
        self.switch_mode(MODE_READ, Mode::PassiveRead)?;
        Ok(ReadMode::new(self))
    }

    /// Write a mode command and wait for the `[BEGIN]` acknowledgement.
    ///
    /// The wait is bounded by [`SessionConfig::mode_switch_timeout`]; an
    /// unresponsive board yields [`ClientError::ModeSwitchTimeout`] instead
    /// of hanging the caller.
    fn switch_mode(&mut self, command: &str, target: Mode) -> Result<(), ClientError> {
        self.connect()?;

        debug!(%target, "switching mode");
        self.transport.write_line(command)?;

        let deadline = Instant::now() + self.config.mode_switch_timeout;
        loop {
            let line = line_to_text(&self.transport.read_line()?);
            if !line.is_empty() {
                trace!(board = %line);
            }
            if line == TOKEN_BEGIN {
                self.mode = target;
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(ClientError::ModeSwitchTimeout { mode: target });
            }
        }
    }

    /// Send the exit control byte and return to ready. A no-op outside of an
    /// operating mode, so teardown paths can call it unconditionally.
    pub(crate) fn exit_mode(&mut self) -> Result<(), ClientError> {
        if matches!(self.mode, Mode::Ready | Mode::Unconnected) {
            return Ok(());
        }
        debug!(mode = %self.mode, "exiting mode");
        self.transport.write_bytes(&[CTRL_EXIT_MODE])?;

        // One diagnostic line acknowledges the exit; log it, nothing more.
        let line = line_to_text(&self.transport.read_line()?);
        if !line.is_empty() {
            trace!(board = %line);
        }
        self.mode = Mode::Ready;
        Ok(())
    }
}

impl<T: Transport> Drop for Session<T> {
    fn drop(&mut self) {
        // Guards normally restore ready; this catches the case where a guard's
        // own exit failed, so the board is not left stuck in a mode when the
        // transport goes away.
        if let Err(e) = self.exit_mode() {
            warn!("failed to exit {} mode on teardown: {e}", self.mode);
        }
    }
}
