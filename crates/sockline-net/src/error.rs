//! Error types for the networking module.

use std::io;

use thiserror::Error;

/// Errors returned by [`SocketClient`](crate::tcp::SocketClient) operations.
#[derive(Debug, Error)]
pub enum SocketError {
    /// A required argument was absent or out of range.
    ///
    /// Raised before any transport operation is attempted.
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The platform connect primitive failed.
    ///
    /// The underlying error is passed through untouched, so its kind and
    /// message are exactly what the platform reported.
    #[error(transparent)]
    Transport(#[from] io::Error),

    /// The listener could not be constructed or started.
    #[error("{message}")]
    ListenerStart {
        /// Message of the original failure.
        message: String,
        /// The original failure.
        #[source]
        source: ListenerError,
    },

    /// A write was attempted before the transport connected.
    #[error("Not connected")]
    NotConnected,
}

impl SocketError {
    /// Wrap a listener failure, keeping its message and cause.
    pub(crate) fn listener_start(source: ListenerError) -> Self {
        Self::ListenerStart {
            message: source.to_string(),
            source,
        }
    }
}

/// Errors raised by the listener and its sender.
///
/// These carry the platform message as a string so they can be cloned into
/// the client's `error` signal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListenerError {
    /// The receive thread could not be spawned.
    #[error("Failed to spawn listener thread: {0}")]
    Spawn(String),
    /// A stream handle could not be obtained from the transport.
    #[error("Transport stream unavailable: {0}")]
    Stream(String),
    /// Reading from the connection failed.
    #[error("Read failed: {0}")]
    Read(String),
    /// Writing to the connection failed.
    #[error("Write failed: {0}")]
    Write(String),
}

/// A specialized Result type for socket operations.
pub type Result<T> = std::result::Result<T, SocketError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_transport_error_is_transparent() {
        let err = SocketError::from(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
        assert_eq!(err.to_string(), "refused");
        match err {
            SocketError::Transport(inner) => {
                assert_eq!(inner.kind(), io::ErrorKind::ConnectionRefused)
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_listener_start_keeps_message_and_cause() {
        let cause = ListenerError::Spawn("out of threads".into());
        let err = SocketError::listener_start(cause.clone());

        assert_eq!(err.to_string(), cause.to_string());
        let source = err.source().expect("cause is preserved");
        assert_eq!(source.to_string(), cause.to_string());
    }
}
