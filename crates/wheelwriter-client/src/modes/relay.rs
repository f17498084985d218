//! Bus relay mode: binary command frames in, structured responses out.

use tracing::{debug, trace, warn};
use wheelwriter_protocol::{hex_bytes, Batch, BusCommand, CommandFrame, Response};

use crate::error::ClientError;
use crate::session::Session;
use crate::transport::Transport;

/// Guard for relay mode. Obtained from [`Session::enter_relay`].
///
/// All sends are synchronous: each frame is written and the response line
/// matching its identifier is awaited before returning. The board may emit
/// unrelated diagnostic lines first; those are skipped.
pub struct RelayMode<'s, T: Transport> {
    session: &'s mut Session<T>,
}

impl<'s, T: Transport> RelayMode<'s, T> {
    pub(crate) fn new(session: &'s mut Session<T>) -> Self {
        RelayMode { session }
    }

    /// Send a frame and return the result byte of the matching response.
    ///
    /// A response with a non-success status surfaces as
    /// [`wheelwriter_protocol::ProtocolError::CommandFailed`]; it is not
    /// retried here.
    pub fn send(&mut self, frame: &CommandFrame) -> Result<u8, ClientError> {
        let bytes = frame.encode()?;
        trace!("command:  [{}]", hex_bytes(&bytes));
        self.session.transport_mut().write_bytes(&bytes)?;

        let identifier = frame.identifier();
        loop {
            let line = self.session.transport_mut().read_line()?;
            if line.is_empty() {
                continue;
            }
            trace!("response: [{}]", hex_bytes(&line));
            if !Response::answers(&line, identifier) {
                debug!("skipping unrelated line: [{}]", hex_bytes(&line));
                continue;
            }
            let response = Response::parse(&line)?;
            return Ok(response.into_result()?);
        }
    }

    /// Send a single command, abbreviated when `address` is `None`.
    pub fn send_command(
        &mut self,
        address: Option<u8>,
        entry: BusCommand,
    ) -> Result<u8, ClientError> {
        self.send(&CommandFrame::single(address, entry))
    }

    /// Send a batch of commands as one frame.
    pub fn send_batch(&mut self, batch: Batch) -> Result<u8, ClientError> {
        self.send(&CommandFrame::Batch(batch))
    }

    /// Leave relay mode, surfacing any exit error.
    pub fn exit(mut self) -> Result<(), ClientError> {
        self.session.exit_mode()
    }
}

impl<T: Transport> Drop for RelayMode<'_, T> {
    fn drop(&mut self) {
        if let Err(e) = self.session.exit_mode() {
            warn!("failed to exit relay mode: {e}");
        }
    }
}
