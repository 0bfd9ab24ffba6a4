//! Error types for Sockline core.

use thiserror::Error;

/// Signal-specific errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignalError {
    /// The connection ID is invalid or has already been disconnected.
    #[error("Invalid or disconnected connection ID")]
    InvalidConnection,
}
