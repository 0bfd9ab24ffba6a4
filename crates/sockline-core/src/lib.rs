//! Core systems for Sockline.
//!
//! This crate provides the building blocks shared by the Sockline crates:
//!
//! - **Signal/Slot System**: Type-safe, synchronous event publication
//! - **Logging**: `tracing` targets, span names and helper macros
//!
//! # Signal/Slot Example
//!
//! ```
//! use sockline_core::Signal;
//!
//! let value_changed = Signal::<i32>::new();
//!
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! value_changed.emit(42);
//!
//! value_changed.disconnect(conn_id);
//! ```

mod error;
pub mod logging;
pub mod signal;

pub use error::SignalError;
pub use logging::PerfSpan;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
