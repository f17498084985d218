//! Character relay (type) mode: raw characters streamed to the board.
//!
//! The board translates characters through its own keyboard tables and
//! drives the typewriter directly. Each character is followed by a short
//! pause so the host does not outrun the machine; the pause is a throughput
//! throttle, configurable via [`SessionConfig::type_char_delay`], not a
//! correctness requirement.
//!
//! [`SessionConfig::type_char_delay`]: crate::session::SessionConfig

use std::io::BufRead;
use std::thread;

use tracing::{info, warn};

use crate::error::ClientError;
use crate::session::Session;
use crate::transport::Transport;

/// Guard for type mode. Obtained from [`Session::enter_type`].
pub struct TypeMode<'s, T: Transport> {
    session: &'s mut Session<T>,
    chars_sent: u64,
}

impl<'s, T: Transport> TypeMode<'s, T> {
    pub(crate) fn new(session: &'s mut Session<T>) -> Self {
        TypeMode {
            session,
            chars_sent: 0,
        }
    }

    /// Number of characters streamed so far.
    pub fn chars_sent(&self) -> u64 {
        self.chars_sent
    }

    /// Stream a single character.
    pub fn send_char(&mut self, c: char) -> Result<(), ClientError> {
        let mut buf = [0u8; 4];
        let encoded = c.encode_utf8(&mut buf);
        self.session.transport_mut().write_bytes(encoded.as_bytes())?;
        self.chars_sent += 1;
        thread::sleep(self.session.config().type_char_delay);
        Ok(())
    }

    /// Stream every character of a string, including any newlines it holds.
    pub fn send_str(&mut self, text: &str) -> Result<(), ClientError> {
        for c in text.chars() {
            self.send_char(c)?;
        }
        Ok(())
    }

    /// Stream a whole text source line by line.
    pub fn send_reader<R: BufRead>(&mut self, reader: R) -> Result<(), ClientError> {
        for line in reader.lines() {
            self.send_str(&line?)?;
            self.send_char('\n')?;
        }
        Ok(())
    }

    /// Emit trailing line advances, e.g. to feed the page out. These are not
    /// counted as sent characters.
    pub fn advance_lines(&mut self, lines: u32) -> Result<(), ClientError> {
        for _ in 0..lines {
            self.session.transport_mut().write_bytes(b"\n")?;
            thread::sleep(self.session.config().type_char_delay);
        }
        Ok(())
    }

    /// Leave type mode, surfacing any exit error.
    pub fn exit(mut self) -> Result<(), ClientError> {
        let sent = self.chars_sent;
        info!(chars_sent = sent, "leaving type mode");
        self.session.exit_mode()
    }
}

impl<T: Transport> Drop for TypeMode<'_, T> {
    fn drop(&mut self) {
        if let Err(e) = self.session.exit_mode() {
            warn!("failed to exit type mode: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyphs::Keyboard;
    use crate::session::SessionConfig;
    use crate::transport::testing::MockTransport;
    use std::time::Duration;

    fn type_session(transport: MockTransport) -> Session<MockTransport> {
        let config = SessionConfig {
            connect_retry_delay: Duration::ZERO,
            type_char_delay: Duration::ZERO,
            ..SessionConfig::default()
        };
        Session::new(transport, config)
    }

    #[test]
    fn test_characters_are_streamed_individually() {
        let transport = MockTransport::with_lines(["[READY]", "[BEGIN]"]);
        let mut session = type_session(transport);

        {
            let mut type_mode = session.enter_type(Keyboard::Us).expect("enter type");
            type_mode.send_str("hi\n").expect("send");
            assert_eq!(type_mode.chars_sent(), 3);
        }

        assert_eq!(session.transport_mut().written(), b"\ntype 1\nhi\n\x04");
    }

    #[test]
    fn test_reader_streaming_and_trailing_advances() {
        let transport = MockTransport::with_lines(["[READY]", "[BEGIN]"]);
        let mut session = type_session(transport);

        {
            let mut type_mode = session.enter_type(Keyboard::Us).expect("enter type");
            type_mode
                .send_reader(std::io::Cursor::new("one\ntwo\n"))
                .expect("send file");
            type_mode.advance_lines(2).expect("advance");
            // Trailing advances are not counted.
            assert_eq!(type_mode.chars_sent(), 8);
        }

        assert_eq!(session.transport_mut().written(), b"\ntype 1\none\ntwo\n\n\n\x04");
    }
}
