//! Passive bus read mode: report observed traffic, write nothing.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::warn;

use crate::error::ClientError;
use crate::session::Session;
use crate::transport::{line_to_text, Transport};

/// Guard for read mode. Obtained from [`Session::enter_read`].
pub struct ReadMode<'s, T: Transport> {
    session: &'s mut Session<T>,
}

impl<'s, T: Transport> ReadMode<'s, T> {
    pub(crate) fn new(session: &'s mut Session<T>) -> Self {
        ReadMode { session }
    }

    /// Report lines to `sink` until `cancel` is set.
    ///
    /// Cancellation is cooperative: the flag is checked before every read,
    /// and the transport's read timeout bounds how long a pending read can
    /// delay the check. Empty (timed-out) reads are not reported.
    pub fn run<F>(&mut self, cancel: &AtomicBool, mut sink: F) -> Result<(), ClientError>
    where
        F: FnMut(&str),
    {
        while !cancel.load(Ordering::Relaxed) {
            let line = self.session.transport_mut().read_line()?;
            if line.is_empty() {
                continue;
            }
            sink(&line_to_text(&line));
        }
        Ok(())
    }

    /// Leave read mode, surfacing any exit error.
    pub fn exit(mut self) -> Result<(), ClientError> {
        self.session.exit_mode()
    }
}

impl<T: Transport> Drop for ReadMode<'_, T> {
    fn drop(&mut self) {
        if let Err(e) = self.session.exit_mode() {
            warn!("failed to exit read mode: {e}");
        }
    }
}
