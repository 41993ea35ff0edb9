//! Connection status shown by the indicator.

use std::fmt;

/// Tri-state connection status.
///
/// Starts as [`ConnectionStatus::Connecting`] and is then driven only by
/// the connect / disconnect lifecycle events of the connection task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// The last connection attempt failed or the connection was lost.
    Disconnected,
    /// No lifecycle event has been observed yet.
    #[default]
    Connecting,
    /// The WebSocket handshake completed.
    Connected,
}

impl ConnectionStatus {
    /// Returns `true` only for [`ConnectionStatus::Connected`].
    #[must_use]
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_connecting() {
        assert_eq!(ConnectionStatus::default(), ConnectionStatus::Connecting);
        assert!(!ConnectionStatus::default().is_connected());
    }

    #[test]
    fn labels() {
        assert_eq!(ConnectionStatus::Connected.to_string(), "connected");
        assert_eq!(ConnectionStatus::Disconnected.as_str(), "disconnected");
    }
}
