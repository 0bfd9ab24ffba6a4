//! The transport handle: a blocking stream socket owned by one client.

use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use parking_lot::Mutex;
use sockline_core::logging::targets;

use super::config::SocketOptions;

/// A stream handle cloned from a transport for reading or writing.
pub trait TransportStream: Read + Write + Send + 'static {
    /// Bound how long a read may block. `None` blocks indefinitely.
    fn set_read_timeout(&self, timeout: Option<Duration>) -> io::Result<()>;
}

impl TransportStream for TcpStream {
    fn set_read_timeout(&self, timeout: Option<Duration>) -> io::Result<()> {
        TcpStream::set_read_timeout(self, timeout)
    }
}

/// The platform connection primitive a client drives.
///
/// A transport is created once per client and reused by every connect
/// attempt. Connect calls block the caller until the platform reports
/// success or failure.
pub trait Transport: Send + Sync + 'static {
    /// Stream type handed to the listener and sender.
    type Stream: TransportStream;

    /// Resolve `host` and connect to it.
    fn connect_host(&self, host: &str, port: u16) -> io::Result<()>;

    /// Connect to a resolved endpoint.
    fn connect_endpoint(&self, endpoint: SocketAddr) -> io::Result<()>;

    /// Whether the handle currently holds a live connection.
    fn is_connected(&self) -> bool;

    /// Address of the connected peer.
    fn remote_endpoint(&self) -> Option<SocketAddr>;

    /// Clone the connected stream. Fails with `NotConnected` when idle.
    fn try_clone_stream(&self) -> io::Result<Self::Stream>;

    /// Shut the connection down in both directions and release it.
    fn shutdown(&self);
}

/// [`Transport`] over `std::net::TcpStream`.
#[derive(Debug, Default)]
pub struct TcpTransport {
    options: SocketOptions,
    stream: Mutex<Option<TcpStream>>,
}

impl TcpTransport {
    /// Create an unconnected transport.
    pub fn new(options: SocketOptions) -> Self {
        Self {
            options,
            stream: Mutex::new(None),
        }
    }

    /// The socket options applied on connect.
    pub fn options(&self) -> &SocketOptions {
        &self.options
    }

    fn open(&self, addrs: impl ToSocketAddrs) -> io::Result<TcpStream> {
        let Some(timeout) = self.options.connect_timeout else {
            return TcpStream::connect(addrs);
        };

        let mut last_err = None;
        for addr in addrs.to_socket_addrs()? {
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "could not resolve to any addresses",
            )
        }))
    }

    fn install(&self, stream: TcpStream) -> io::Result<()> {
        stream.set_nodelay(self.options.no_delay)?;
        stream.set_write_timeout(self.options.write_timeout)?;

        let mut slot = self.stream.lock();
        if slot.is_some() {
            let _ = stream.shutdown(Shutdown::Both);
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "transport is already connected",
            ));
        }
        tracing::debug!(
            target: targets::TRANSPORT,
            peer = ?stream.peer_addr().ok(),
            "transport connected"
        );
        *slot = Some(stream);
        Ok(())
    }
}

impl Transport for TcpTransport {
    type Stream = TcpStream;

    fn connect_host(&self, host: &str, port: u16) -> io::Result<()> {
        let stream = self.open((host, port))?;
        self.install(stream)
    }

    fn connect_endpoint(&self, endpoint: SocketAddr) -> io::Result<()> {
        let stream = self.open(endpoint)?;
        self.install(stream)
    }

    fn is_connected(&self) -> bool {
        self.stream
            .lock()
            .as_ref()
            .is_some_and(|stream| stream.peer_addr().is_ok())
    }

    fn remote_endpoint(&self) -> Option<SocketAddr> {
        self.stream.lock().as_ref()?.peer_addr().ok()
    }

    fn try_clone_stream(&self) -> io::Result<TcpStream> {
        match self.stream.lock().as_ref() {
            Some(stream) => stream.try_clone(),
            None => Err(io::Error::from(io::ErrorKind::NotConnected)),
        }
    }

    fn shutdown(&self) {
        if let Some(stream) = self.stream.lock().take() {
            let _ = stream.shutdown(Shutdown::Both);
            tracing::debug!(target: targets::TRANSPORT, "transport shut down");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    #[test]
    fn test_new_transport_is_idle() {
        let transport = TcpTransport::default();
        assert!(!transport.is_connected());
        assert!(transport.remote_endpoint().is_none());
        assert_eq!(
            transport.try_clone_stream().unwrap_err().kind(),
            io::ErrorKind::NotConnected
        );
    }

    #[test]
    fn test_connect_and_shutdown() {
        let server = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = server.local_addr().unwrap();

        let transport = TcpTransport::new(SocketOptions::new().no_delay(true));
        transport.connect_endpoint(addr).unwrap();
        assert!(transport.is_connected());
        assert_eq!(transport.remote_endpoint(), Some(addr));
        assert!(transport.try_clone_stream().is_ok());

        transport.shutdown();
        assert!(!transport.is_connected());
    }

    #[test]
    fn test_second_connect_fails_at_transport() {
        let server = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = server.local_addr().unwrap();

        let transport = TcpTransport::default();
        transport.connect_host("127.0.0.1", addr.port()).unwrap();
        let err = transport.connect_endpoint(addr).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(transport.remote_endpoint(), Some(addr));
    }

    #[test]
    fn test_connect_timeout_path() {
        let server = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = server.local_addr().unwrap();

        let transport =
            TcpTransport::new(SocketOptions::new().connect_timeout(Duration::from_secs(2)));
        transport.connect_host("127.0.0.1", addr.port()).unwrap();
        assert!(transport.is_connected());
    }
}
