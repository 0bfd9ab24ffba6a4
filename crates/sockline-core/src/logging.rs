//! Logging facilities for Sockline.
//!
//! Sockline uses the `tracing` crate for instrumentation. To see logs, install
//! a tracing subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt::init();
//!
//!     // Your application code...
//! }
//! ```
//!
//! The constants in [`targets`] and [`span_names`] can be used in filter
//! directives, e.g. `RUST_LOG=sockline_net::listener=debug`.

/// Span names used throughout Sockline for tracing.
pub mod span_names {
    /// Blocking connect attempt.
    pub const CONNECT: &str = "sockline::connect";
    /// Listener receive loop.
    pub const RECEIVE_LOOP: &str = "sockline::receive_loop";
}

/// Target names for log filtering.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "sockline_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "sockline_core::signal";
    /// Socket client lifecycle target.
    pub const CLIENT: &str = "sockline_net::client";
    /// Listener receive loop target.
    pub const LISTENER: &str = "sockline_net::listener";
    /// Outbound write path target.
    pub const SENDER: &str = "sockline_net::sender";
    /// Transport (platform socket) target.
    pub const TRANSPORT: &str = "sockline_net::transport";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Used to time blocking operations such as connect attempts.
#[derive(Debug)]
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span for the named operation.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "sockline::perf", "perf", operation = name);
        Self {
            _span: span.entered(),
        }
    }
}

/// Trace-level event on the core target.
#[macro_export]
macro_rules! sockline_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: $crate::logging::targets::CORE, $($arg)*)
    };
}

/// Debug-level event on the core target.
#[macro_export]
macro_rules! sockline_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: $crate::logging::targets::CORE, $($arg)*)
    };
}

/// Warn-level event on the core target.
#[macro_export]
macro_rules! sockline_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: $crate::logging::targets::CORE, $($arg)*)
    };
}
