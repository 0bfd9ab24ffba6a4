//! Socket client: connection lifecycle and connected dispatch.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use sockline_core::PerfSpan;
use sockline_core::logging::{span_names, targets};

use super::config::{ClientConfig, ListenerConfig};
use super::events::SocketEvents;
use super::listener::Listener;
use super::sender::Sender;
use super::state::ClientState;
use super::target::ConnectionTarget;
use super::transport::{TcpTransport, Transport};
use crate::error::{Result, SocketError};

/// How the transport should reach a resolved target.
enum Destination {
    /// Resolve the target's host string.
    Host,
    /// Connect to an already resolved endpoint.
    Endpoint(SocketAddr),
}

/// A blocking socket client with a background listener.
///
/// The client owns one transport handle for its whole life and at most one
/// [`Listener`], created lazily by the first successful connect or the first
/// [`start`](Self::start) and reused afterwards.
///
/// Every connect operation is idempotent: once the transport reports a live
/// connection, further connect calls return `Ok(())` without touching the
/// transport or the recorded target. Connect attempts are serialized; a
/// caller that waited on another attempt either finds the client connected
/// or makes its own attempt. A successful connect starts the listener and
/// then emits [`SocketEvents::connected`] with the connection's [`Sender`],
/// on the calling thread, before returning.
///
/// If the listener fails to start after the transport connected, connect
/// returns [`SocketError::ListenerStart`] and the `connected` emission is
/// deferred to the next successful [`start`](Self::start).
///
/// # Example
///
/// ```no_run
/// use sockline_net::tcp::{ClientConfig, SocketClient};
///
/// let client = SocketClient::new(ClientConfig::new("example.com", 80));
///
/// client.events().connected.connect(|sender| {
///     let _ = sender.send(b"GET / HTTP/1.0\r\n\r\n");
/// });
/// client.events().data_received.connect(|data| {
///     println!("Received {} bytes", data.len());
/// });
///
/// client.connect()?;
/// # Ok::<(), sockline_net::SocketError>(())
/// ```
pub struct SocketClient<T: Transport = TcpTransport> {
    transport: Arc<T>,
    target: Mutex<ConnectionTarget>,
    listener_config: Mutex<ListenerConfig>,
    connect_lock: Mutex<()>,
    dispatch_pending: AtomicBool,
    listener: Mutex<Option<Arc<Listener<T>>>>,
    events: Arc<SocketEvents<T>>,
}

static_assertions::assert_impl_all!(SocketClient: Send, Sync);

impl SocketClient<TcpTransport> {
    /// Create a client over a TCP transport.
    pub fn new(config: ClientConfig) -> Self {
        let transport = TcpTransport::new(config.socket.clone());
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> SocketClient<T> {
    /// Create a client over a caller-supplied transport.
    ///
    /// The transport's own socket options take precedence over
    /// `config.socket`.
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            target: Mutex::new(config.target()),
            listener_config: Mutex::new(config.listener),
            transport: Arc::new(transport),
            connect_lock: Mutex::new(()),
            dispatch_pending: AtomicBool::new(false),
            listener: Mutex::new(None),
            events: Arc::new(SocketEvents::new()),
        }
    }

    /// The signals this client emits.
    pub fn events(&self) -> &SocketEvents<T> {
        &self.events
    }

    /// The transport handle.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Whether the transport reports a live connection.
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Whether the listener exists and is running.
    pub fn is_running(&self) -> bool {
        self.listener
            .lock()
            .as_ref()
            .is_some_and(|listener| listener.is_running())
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ClientState {
        if !self.is_connected() {
            return ClientState::Idle;
        }
        match self.listener.lock().as_ref() {
            Some(listener) if !listener.is_running() => ClientState::Stopped,
            _ => ClientState::Connected,
        }
    }

    /// The recorded target.
    pub fn target(&self) -> ConnectionTarget {
        self.target.lock().clone()
    }

    /// The recorded host.
    pub fn host(&self) -> String {
        self.target.lock().host.clone()
    }

    /// The recorded port.
    pub fn port(&self) -> u16 {
        self.target.lock().port
    }

    /// The recorded target as `host:port`.
    pub fn address(&self) -> String {
        self.target.lock().address()
    }

    /// Address of the connected peer.
    pub fn remote_endpoint(&self) -> Option<SocketAddr> {
        self.transport.remote_endpoint()
    }

    /// The listener, if one has been created.
    pub fn listener(&self) -> Option<Arc<Listener<T>>> {
        self.listener.lock().clone()
    }

    /// The connection's sender, if the listener has been created.
    pub fn sender(&self) -> Option<Arc<Sender<T>>> {
        self.listener.lock().as_ref().map(|listener| listener.sender())
    }

    /// The listener configuration.
    pub fn listener_config(&self) -> ListenerConfig {
        self.listener_config.lock().clone()
    }

    /// Replace the listener configuration. Takes effect on the next start.
    pub fn set_listener_config(&self, config: ListenerConfig) {
        let listener = self.listener.lock();
        if let Some(listener) = listener.as_ref() {
            listener.set_config(config.clone());
        }
        *self.listener_config.lock() = config;
    }

    /// Connect to the configured host and port.
    pub fn connect(&self) -> Result<()> {
        self.run_connect(|| {
            let target = self.target();
            target.validate()?;
            Ok((target, Destination::Host))
        })
    }

    /// Connect to a resolved endpoint.
    ///
    /// Fails with [`SocketError::InvalidArgument`] when `endpoint` is `None`.
    pub fn connect_endpoint(&self, endpoint: impl Into<Option<SocketAddr>>) -> Result<()> {
        let endpoint = endpoint.into();
        self.run_connect(|| {
            let endpoint = endpoint.ok_or(SocketError::InvalidArgument("endpoint"))?;
            let target = ConnectionTarget::from_endpoint(endpoint);
            target.validate()?;
            Ok((target, Destination::Endpoint(endpoint)))
        })
    }

    /// Connect to `host` on `port`.
    pub fn connect_host(&self, host: &str, port: u16) -> Result<()> {
        self.run_connect(|| Ok((ConnectionTarget::new(host, port)?, Destination::Host)))
    }

    /// Connect to an IP address on `port`.
    ///
    /// Fails with [`SocketError::InvalidArgument`] when `address` is `None`.
    pub fn connect_address(&self, address: impl Into<Option<IpAddr>>, port: u16) -> Result<()> {
        let address = address.into();
        self.run_connect(|| {
            let address = address.ok_or(SocketError::InvalidArgument("address"))?;
            let target = ConnectionTarget::from_address(address, port);
            target.validate()?;
            Ok((target, Destination::Endpoint(SocketAddr::new(address, port))))
        })
    }

    /// The algorithm shared by every connect operation.
    fn run_connect<R>(&self, resolve: R) -> Result<()>
    where
        R: FnOnce() -> Result<(ConnectionTarget, Destination)>,
    {
        if self.is_connected() {
            tracing::trace!(target: targets::CLIENT, "already connected, connect is a no-op");
            return Ok(());
        }

        {
            let _connecting = self.connect_lock.lock();
            if self.is_connected() {
                tracing::debug!(target: targets::CLIENT, "connected by a concurrent call");
                return Ok(());
            }

            let (target, destination) = resolve()?;
            *self.target.lock() = target.clone();

            {
                let _span = PerfSpan::new(span_names::CONNECT);
                tracing::debug!(target: targets::CLIENT, endpoint = %target, "connecting");
                match destination {
                    Destination::Host => self.transport.connect_host(&target.host, target.port)?,
                    Destination::Endpoint(endpoint) => {
                        self.transport.connect_endpoint(endpoint)?
                    }
                }
            }

            if !self.is_connected() {
                return Ok(());
            }
            tracing::info!(
                target: targets::CLIENT,
                endpoint = %target,
                remote = ?self.remote_endpoint(),
                "connected"
            );
            self.dispatch_pending.store(true, Ordering::Release);
            self.start_listener()?;
        }

        self.dispatch_connected();
        Ok(())
    }

    /// Emit `connected` once per successful connect, if still connected.
    fn dispatch_connected(&self) {
        if !self.dispatch_pending.swap(false, Ordering::AcqRel) || !self.is_connected() {
            return;
        }
        if let Some(sender) = self.sender() {
            self.events.connected.emit(sender);
        }
    }

    /// Start the listener, creating it on first use.
    ///
    /// A no-op while the listener is running. A failure is logged, published
    /// on the `error` signal, and returned as
    /// [`SocketError::ListenerStart`]; the listener is kept so a later call
    /// can retry. A `connected` emission deferred by a failed start during
    /// connect is delivered once the listener starts.
    pub fn start(&self) -> Result<()> {
        if self.start_listener()? {
            self.dispatch_connected();
        }
        Ok(())
    }

    /// Start the listener, returning whether this call started it.
    fn start_listener(&self) -> Result<bool> {
        let listener = {
            let mut slot = self.listener.lock();
            if let Some(listener) = slot.as_ref()
                && listener.is_running()
            {
                return Ok(false);
            }
            slot.get_or_insert_with(|| {
                tracing::debug!(target: targets::CLIENT, "creating listener");
                Arc::new(Listener::new(
                    self.transport.clone(),
                    self.listener_config(),
                    self.events.clone(),
                ))
            })
            .clone()
        };

        listener.start().map(|()| true).map_err(|err| {
            tracing::error!(target: targets::CLIENT, error = %err, "listener failed to start");
            self.events.error.emit(err.clone());
            SocketError::listener_start(err)
        })
    }

    /// Stop the listener. A no-op when there is none or it is not running.
    ///
    /// The transport connection and the listener instance are kept, so a
    /// later [`start`](Self::start) resumes on the same listener.
    pub fn stop(&self) {
        let listener = self.listener.lock().clone();
        if let Some(listener) = listener
            && listener.is_running()
        {
            listener.stop();
        }
    }
}

impl<T: Transport> Drop for SocketClient<T> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<T: Transport> std::fmt::Debug for SocketClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocketClient")
            .field("target", &*self.target.lock())
            .field("state", &self.state())
            .finish()
    }
}
