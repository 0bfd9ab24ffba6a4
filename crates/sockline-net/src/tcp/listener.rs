//! Background receive loop for one client connection.
//!
//! The listener owns a dedicated thread that reads raw bytes from the
//! client's transport and publishes them on the `data_received` signal. It
//! imposes no framing: every successful read is delivered as one chunk.
//!
//! A listener can be started, stopped and restarted any number of times.
//! Each start spawns a fresh thread; each stop signals that thread and joins
//! it. While running without a connection the loop waits for the transport to
//! connect, so `start()` may be called before or after connecting.
//!
//! The listener counts as running only while its thread is alive. If the
//! thread dies (a panicking slot, for instance) the listener reports itself
//! stopped and the next `start()` spawns a replacement.

use std::io::{ErrorKind, Read};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError, bounded};
use parking_lot::Mutex;
use sockline_core::logging::{span_names, targets};

use super::config::ListenerConfig;
use super::events::SocketEvents;
use super::sender::Sender;
use super::transport::{Transport, TransportStream};
use crate::error::ListenerError;

/// Handle to a running receive thread.
struct ReceiveWorker {
    /// Dropping this disconnects the channel, which tells the loop to exit.
    stop_tx: crossbeam_channel::Sender<()>,
    handle: JoinHandle<()>,
}

impl ReceiveWorker {
    fn is_alive(&self) -> bool {
        !self.handle.is_finished()
    }
}

/// Background receive/dispatch component for one connection.
///
/// Owns the connection's [`Sender`].
pub struct Listener<T: Transport> {
    transport: Arc<T>,
    config: Mutex<ListenerConfig>,
    events: Arc<SocketEvents<T>>,
    sender: Arc<Sender<T>>,
    worker: Mutex<Option<ReceiveWorker>>,
    start_count: AtomicUsize,
}

impl<T: Transport> Listener<T> {
    /// Create a stopped listener bound to `transport`.
    pub fn new(transport: Arc<T>, config: ListenerConfig, events: Arc<SocketEvents<T>>) -> Self {
        let sender = Arc::new(Sender::new(transport.clone(), events.clone()));
        Self {
            transport,
            config: Mutex::new(config),
            events,
            sender,
            worker: Mutex::new(None),
            start_count: AtomicUsize::new(0),
        }
    }

    /// Whether the receive thread is alive.
    pub fn is_running(&self) -> bool {
        self.worker.lock().as_ref().is_some_and(ReceiveWorker::is_alive)
    }

    /// The configuration used for the next start.
    pub fn config(&self) -> ListenerConfig {
        self.config.lock().clone()
    }

    /// Replace the configuration. Takes effect on the next start.
    pub fn set_config(&self, config: ListenerConfig) {
        *self.config.lock() = config;
    }

    /// The sender for this connection.
    pub fn sender(&self) -> Arc<Sender<T>> {
        self.sender.clone()
    }

    /// How many times a receive thread has been spawned.
    pub fn start_count(&self) -> usize {
        self.start_count.load(Ordering::Acquire)
    }

    /// Start the receive loop. A no-op while already running.
    pub fn start(&self) -> Result<(), ListenerError> {
        let mut worker = self.worker.lock();
        if worker.as_ref().is_some_and(ReceiveWorker::is_alive) {
            return Ok(());
        }
        if let Some(dead) = worker.take()
            && dead.handle.join().is_err()
        {
            tracing::warn!(target: targets::LISTENER, "previous receive thread panicked");
        }

        let config = self.config();
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let context = ReceiveContext {
            transport: self.transport.clone(),
            events: self.events.clone(),
            sender: self.sender.clone(),
            config: config.clone(),
        };

        let mut builder = thread::Builder::new().name(config.thread_name);
        if let Some(stack_size) = config.stack_size {
            builder = builder.stack_size(stack_size);
        }
        let handle = builder
            .spawn(move || receive_loop(context, stop_rx))
            .map_err(|e| ListenerError::Spawn(e.to_string()))?;

        *worker = Some(ReceiveWorker { stop_tx, handle });
        let generation = self.start_count.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::debug!(target: targets::LISTENER, generation, "listener started");
        Ok(())
    }

    /// Stop the receive loop and wait for its thread to exit.
    ///
    /// A no-op while not running. When called from a slot running on the
    /// receive thread itself, the thread is signalled but not joined.
    pub fn stop(&self) {
        let Some(ReceiveWorker { stop_tx, handle }) = self.worker.lock().take() else {
            return;
        };

        drop(stop_tx);
        if handle.thread().id() != thread::current().id() && handle.join().is_err() {
            tracing::warn!(target: targets::LISTENER, "receive thread panicked");
        }
        tracing::debug!(target: targets::LISTENER, "listener stopped");
    }
}

impl<T: Transport> Drop for Listener<T> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<T: Transport> std::fmt::Debug for Listener<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listener")
            .field("thread_name", &self.config.lock().thread_name)
            .field("running", &self.is_running())
            .field("start_count", &self.start_count())
            .finish()
    }
}

/// Everything the receive thread needs, cloned out of the listener.
struct ReceiveContext<T: Transport> {
    transport: Arc<T>,
    events: Arc<SocketEvents<T>>,
    sender: Arc<Sender<T>>,
    config: ListenerConfig,
}

impl<T: Transport> ReceiveContext<T> {
    /// Obtain a read handle once the transport is connected.
    fn open_reader(&self) -> Option<T::Stream> {
        if !self.transport.is_connected() {
            return None;
        }
        let opened = self.transport.try_clone_stream().and_then(|stream| {
            stream.set_read_timeout(Some(self.config.poll_interval))?;
            Ok(stream)
        });
        match opened {
            Ok(stream) => Some(stream),
            Err(e) => {
                tracing::warn!(target: targets::LISTENER, error = %e, "could not open read stream");
                self.events.error.emit(ListenerError::Stream(e.to_string()));
                None
            }
        }
    }

    /// Tear the connection down after EOF or a read error.
    fn connection_lost(&self) {
        self.transport.shutdown();
        self.sender.reset();
        self.events.disconnected.emit(());
    }
}

fn should_stop(stop_rx: &Receiver<()>) -> bool {
    !matches!(stop_rx.try_recv(), Err(TryRecvError::Empty))
}

fn receive_loop<T: Transport>(context: ReceiveContext<T>, stop_rx: Receiver<()>) {
    let _span = tracing::debug_span!(
        target: "sockline_net::listener",
        "receive_loop",
        operation = span_names::RECEIVE_LOOP
    )
    .entered();
    let mut buffer = vec![0u8; context.config.read_buffer_size.max(1)];
    let mut reader: Option<T::Stream> = None;

    loop {
        if reader.is_none() {
            reader = context.open_reader();
            if reader.is_none() {
                match stop_rx.recv_timeout(context.config.poll_interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    _ => break,
                }
            }
        }
        let Some(stream) = reader.as_mut() else {
            continue;
        };

        match stream.read(&mut buffer) {
            Ok(0) => {
                tracing::debug!(target: targets::LISTENER, "peer closed connection");
                reader = None;
                context.connection_lost();
            }
            Ok(n) => {
                tracing::trace!(target: targets::LISTENER, bytes = n, "data received");
                context.events.data_received.emit(buffer[..n].to_vec());
            }
            Err(e)
                if matches!(
                    e.kind(),
                    ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted
                ) => {}
            Err(e) => {
                tracing::warn!(target: targets::LISTENER, error = %e, "read failed");
                reader = None;
                context.events.error.emit(ListenerError::Read(e.to_string()));
                context.connection_lost();
            }
        }

        if should_stop(&stop_rx) {
            break;
        }
    }

    tracing::trace!(target: targets::LISTENER, "receive loop exited");
}
