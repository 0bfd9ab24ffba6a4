//! Blocking TCP socket client with a background listener.
//!
//! - **SocketClient**: Connects once, then hands the connection to a listener
//! - **Listener**: Background receive loop publishing raw byte chunks
//! - **Sender**: Outbound write path for the connection
//! - **Transport**: The platform stream socket the client drives
//!
//! # Example
//!
//! ```no_run
//! use sockline_net::tcp::{ClientConfig, SocketClient};
//!
//! let config = ClientConfig::new("127.0.0.1", 8080).no_delay(true);
//! let client = SocketClient::new(config);
//!
//! client.events().connected.connect(|sender| {
//!     let _ = sender.send(b"Hello, Server!");
//! });
//! client.events().data_received.connect(|data| {
//!     println!("Received {} bytes", data.len());
//! });
//!
//! client.connect()?;
//!
//! // Pause and resume delivery without dropping the connection.
//! client.stop();
//! client.start()?;
//! # Ok::<(), sockline_net::SocketError>(())
//! ```

mod client;
mod config;
mod events;
mod listener;
mod sender;
mod state;
mod target;
mod transport;

pub use client::SocketClient;
pub use config::{ClientConfig, ListenerConfig, SocketOptions};
pub use events::SocketEvents;
pub use listener::Listener;
pub use sender::Sender;
pub use state::ClientState;
pub use target::ConnectionTarget;
pub use transport::{TcpTransport, Transport, TransportStream};
