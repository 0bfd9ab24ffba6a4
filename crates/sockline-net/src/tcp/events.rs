//! Event signals published by a socket client.

use std::sync::Arc;

use sockline_core::Signal;

use super::sender::Sender;
use super::transport::Transport;
use crate::error::ListenerError;

/// The signals a [`SocketClient`](super::SocketClient) emits.
///
/// Shared between the client, its listener and its sender. Every slot runs
/// synchronously on the thread that emits:
///
/// - [`connected`](Self::connected): the connecting thread, before the
///   connect call returns
/// - [`data_received`](Self::data_received) and
///   [`disconnected`](Self::disconnected): the listener thread
/// - [`bytes_written`](Self::bytes_written): the thread that called `send`
/// - [`error`](Self::error): whichever thread hit the failure
pub struct SocketEvents<T: Transport> {
    /// Emitted once per successful connect call, with the connection's sender.
    pub connected: Signal<Arc<Sender<T>>>,
    /// Emitted with each chunk of bytes read from the connection.
    pub data_received: Signal<Vec<u8>>,
    /// Emitted after data is successfully written.
    pub bytes_written: Signal<usize>,
    /// Emitted when the peer closes the connection or a read fails.
    pub disconnected: Signal<()>,
    /// Emitted when the listener or sender hits an error.
    pub error: Signal<ListenerError>,
}

impl<T: Transport> SocketEvents<T> {
    /// Create a set of signals with no slots connected.
    pub fn new() -> Self {
        Self {
            connected: Signal::new(),
            data_received: Signal::new(),
            bytes_written: Signal::new(),
            disconnected: Signal::new(),
            error: Signal::new(),
        }
    }
}

impl<T: Transport> Default for SocketEvents<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> std::fmt::Debug for SocketEvents<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocketEvents")
            .field("connected", &self.connected)
            .field("data_received", &self.data_received)
            .field("bytes_written", &self.bytes_written)
            .field("disconnected", &self.disconnected)
            .field("error", &self.error)
            .finish()
    }
}
