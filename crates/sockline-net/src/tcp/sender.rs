//! Outbound write path for one connection.

use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;
use sockline_core::logging::targets;

use super::events::SocketEvents;
use super::transport::Transport;
use crate::error::{ListenerError, Result, SocketError};

/// Writes raw bytes to the connection.
///
/// A sender is owned by the client's listener and handed to application code
/// through the `connected` signal or [`SocketClient::sender`]. It writes
/// through its own clone of the transport stream, taken on first use and
/// dropped when the connection goes away.
///
/// [`SocketClient::sender`]: super::SocketClient::sender
pub struct Sender<T: Transport> {
    transport: Arc<T>,
    events: Arc<SocketEvents<T>>,
    writer: Mutex<Option<T::Stream>>,
}

impl<T: Transport> Sender<T> {
    pub(crate) fn new(transport: Arc<T>, events: Arc<SocketEvents<T>>) -> Self {
        Self {
            transport,
            events,
            writer: Mutex::new(None),
        }
    }

    /// Whether the underlying transport is connected.
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Write all of `data` to the peer.
    ///
    /// Blocks until the bytes are handed to the platform. Returns the number
    /// of bytes written and emits `bytes_written` on success.
    pub fn send(&self, data: &[u8]) -> Result<usize> {
        if !self.transport.is_connected() {
            return Err(SocketError::NotConnected);
        }

        let outcome = {
            let mut writer = self.writer.lock();
            if writer.is_none() {
                *writer = Some(self.transport.try_clone_stream()?);
            }
            let stream = writer.as_mut().ok_or(SocketError::NotConnected)?;
            let outcome = stream.write_all(data).and_then(|()| stream.flush());
            if outcome.is_err() {
                *writer = None;
            }
            outcome
        };

        match outcome {
            Ok(()) => {
                tracing::trace!(target: targets::SENDER, bytes = data.len(), "data sent");
                self.events.bytes_written.emit(data.len());
                Ok(data.len())
            }
            Err(e) => {
                tracing::warn!(target: targets::SENDER, error = %e, "write failed");
                self.events.error.emit(ListenerError::Write(e.to_string()));
                Err(SocketError::Transport(e))
            }
        }
    }

    /// Drop the cached stream so the next send clones a fresh one.
    pub(crate) fn reset(&self) {
        self.writer.lock().take();
    }
}

impl<T: Transport> std::fmt::Debug for Sender<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sender")
            .field("connected", &self.is_connected())
            .field("remote_endpoint", &self.transport.remote_endpoint())
            .finish()
    }
}
