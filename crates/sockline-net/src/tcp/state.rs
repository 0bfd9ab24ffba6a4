//! Client lifecycle state.

/// Lifecycle state of a [`SocketClient`](super::SocketClient).
///
/// There is no `Connecting` state: connecting blocks the caller, so other
/// observers see `Idle` until the attempt succeeds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClientState {
    /// The transport is not connected.
    #[default]
    Idle,
    /// The transport is connected and the listener is not stopped.
    Connected,
    /// The transport is connected but the listener has been stopped.
    Stopped,
}

impl std::fmt::Display for ClientState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Connected => write!(f, "Connected"),
            Self::Stopped => write!(f, "Stopped"),
        }
    }
}
