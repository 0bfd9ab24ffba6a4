//! Networking module for Sockline.
//!
//! This crate provides a connection-oriented socket client built around a
//! small, strict lifecycle:
//!
//! - Connecting is blocking and idempotent; one transport handle per client
//! - A background [`Listener`](tcp::Listener) owns the receive loop and the
//!   [`Sender`](tcp::Sender)
//! - Lifecycle events are delivered through [`sockline_core::Signal`]s
//!
//! No framing is imposed on the byte stream; every read is delivered as a
//! raw chunk.
//!
//! ```no_run
//! use sockline_net::{ClientConfig, SocketClient};
//!
//! let client = SocketClient::new(ClientConfig::new("example.com", 80));
//! client.events().connected.connect(|sender| {
//!     let _ = sender.send(b"ping");
//! });
//! client.connect()?;
//! # Ok::<(), sockline_net::SocketError>(())
//! ```

mod error;
pub mod tcp;

pub use error::{ListenerError, Result, SocketError};

// Re-export commonly used types at the crate root
pub use tcp::{ClientConfig, ClientState, ConnectionTarget, SocketClient};
