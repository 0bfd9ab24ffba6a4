//! Configuration types for the socket client and its listener.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::target::ConnectionTarget;

/// Socket-level options applied by the transport.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocketOptions {
    /// Enable TCP_NODELAY (disable Nagle's algorithm).
    pub no_delay: bool,
    /// Connection timeout. `None` blocks until the platform gives up.
    pub connect_timeout: Option<Duration>,
    /// Write timeout. `None` means no timeout.
    pub write_timeout: Option<Duration>,
}

impl SocketOptions {
    /// Create socket options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable TCP_NODELAY.
    pub fn no_delay(mut self, enabled: bool) -> Self {
        self.no_delay = enabled;
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Disable the connection timeout.
    pub fn no_connect_timeout(mut self) -> Self {
        self.connect_timeout = None;
        self
    }

    /// Set the write timeout.
    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = Some(timeout);
        self
    }
}

/// Options for the background receive loop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Name of the receive thread.
    pub thread_name: String,
    /// Read buffer size in bytes.
    pub read_buffer_size: usize,
    /// How often the loop re-checks for a stop request or a new connection.
    pub poll_interval: Duration,
    /// Stack size of the receive thread. `None` uses the platform default.
    pub stack_size: Option<usize>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            thread_name: "sockline-listener".to_string(),
            read_buffer_size: 8192,
            poll_interval: Duration::from_millis(50),
            stack_size: None,
        }
    }
}

impl ListenerConfig {
    /// Create a listener configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the receive thread name.
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Set the read buffer size.
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size.max(1);
        self
    }

    /// Set the poll interval.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the receive thread's stack size in bytes.
    pub fn stack_size(mut self, size: usize) -> Self {
        self.stack_size = Some(size);
        self
    }
}

/// Configuration for a socket client.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// The host to connect to.
    pub host: String,
    /// The port to connect to.
    pub port: u16,
    /// Socket-level options.
    pub socket: SocketOptions,
    /// Receive loop options.
    pub listener: ListenerConfig,
}

impl ClientConfig {
    /// Create a new client configuration.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Set socket options.
    pub fn socket_options(mut self, options: SocketOptions) -> Self {
        self.socket = options;
        self
    }

    /// Set listener options.
    pub fn listener_config(mut self, config: ListenerConfig) -> Self {
        self.listener = config;
        self
    }

    /// Enable TCP_NODELAY.
    pub fn no_delay(mut self, enabled: bool) -> Self {
        self.socket.no_delay = enabled;
        self
    }

    /// Set connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.socket.connect_timeout = Some(timeout);
        self
    }

    /// The configured target.
    pub fn target(&self) -> ConnectionTarget {
        ConnectionTarget {
            host: self.host.clone(),
            port: self.port,
        }
    }

    /// Get the address string (host:port).
    pub fn address(&self) -> String {
        self.target().address()
    }
}
