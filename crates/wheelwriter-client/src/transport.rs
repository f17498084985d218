//! Transport abstraction over the serial link to the interface board.
//!
//! The board speaks newline-terminated lines in both directions, so the
//! transport surface is byte writes plus blocking line reads. A read that
//! times out with nothing buffered yields an empty line, which callers treat
//! as "no data yet" rather than an error; the board is slow to wake up and
//! the session layer owns all retry policy.

use std::io::{self, Read, Write};
use std::time::Duration;

use wheelwriter_protocol::LineFramer;

/// Byte-stream connection to the interface board.
pub trait Transport {
    /// Write raw bytes.
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Write a text line followed by the newline terminator.
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.write_bytes(line.as_bytes())?;
        self.write_bytes(b"\n")
    }

    /// Read one line, up to and including the terminator, blocking up to the
    /// transport's read timeout. Returns an empty vec if the timeout elapsed
    /// with no complete line available.
    fn read_line(&mut self) -> io::Result<Vec<u8>>;
}

/// Default read timeout for the serial port.
const READ_TIMEOUT: Duration = Duration::from_millis(500);

/// Serial-port transport for a directly attached interface board.
pub struct SerialTransport {
    port: Box<dyn serialport::SerialPort>,
    framer: LineFramer,
}

impl SerialTransport {
    /// Open the serial device at the given baud rate.
    ///
    /// `software_flow` enables XON/XOFF flow control, which the board uses to
    /// pace the host while the typewriter catches up.
    pub fn open(device: &str, baud: u32, software_flow: bool) -> Result<Self, serialport::Error> {
        let flow = if software_flow {
            serialport::FlowControl::Software
        } else {
            serialport::FlowControl::None
        };
        let port = serialport::new(device, baud)
            .flow_control(flow)
            .timeout(READ_TIMEOUT)
            .open()?;
        Ok(SerialTransport {
            port,
            framer: LineFramer::new(),
        })
    }
}

impl Transport for SerialTransport {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.port.write_all(bytes)?;
        self.port.flush()
    }

    fn read_line(&mut self) -> io::Result<Vec<u8>> {
        let mut chunk = [0u8; 64];
        loop {
            if let Some(line) = self.framer.next_line() {
                return Ok(line);
            }
            match self.port.read(&mut chunk) {
                Ok(0) => return Ok(Vec::new()),
                Ok(n) => self.framer.push(&chunk[..n]),
                Err(e) if e.kind() == io::ErrorKind::TimedOut => return Ok(Vec::new()),
                Err(e) => return Err(e),
            }
        }
    }
}

/// Trim the terminator and surrounding whitespace from a received line and
/// interpret it as text. Non-UTF-8 bytes are replaced, which only affects
/// diagnostic output.
pub fn line_to_text(line: &[u8]) -> String {
    String::from_utf8_lossy(line).trim().to_string()
}
