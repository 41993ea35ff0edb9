//! Error types for the event board.
//!
//! [`BoardError`] covers infrastructure failures (configuration, transport,
//! encoding, the outbound command queue). [`CommandError`] covers the
//! user-facing failures of the add / delete commands; its `Display` text is
//! what the notification feed shows.

use std::fmt;

use crate::domain::DraftField;

/// Infrastructure error enum.
///
/// None of these are fatal once the board is running: transport errors
/// end up as a disconnected status and queue errors as notifications.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// A configuration value could not be used.
    #[error("invalid configuration for {key}: {reason}")]
    InvalidConfig {
        /// Environment key that carried the bad value.
        key: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// WebSocket transport failure.
    #[error("transport error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),

    /// A frame could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// The outbound command queue is full.
    #[error("command queue is full")]
    CommandQueueFull,

    /// The connection task has stopped and no longer accepts commands.
    #[error("connection task is closed")]
    ConnectionClosed,
}

impl BoardError {
    /// Returns a short, stable machine-readable name for the variant.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "invalid_config",
            Self::Transport(_) => "transport",
            Self::Codec(_) => "codec",
            Self::CommandQueueFull => "command_queue_full",
            Self::ConnectionClosed => "connection_closed",
        }
    }
}

/// Why an add or delete command was not transmitted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// One or more required draft fields are blank.
    #[error("Please fill in all fields (missing: {})", FieldList(.0))]
    MissingFields(Vec<DraftField>),

    /// The date field is not a `YYYY-MM-DD` calendar date.
    #[error("Invalid date \"{0}\" (expected YYYY-MM-DD)")]
    InvalidDate(String),

    /// The time field is not an `HH:MM` clock time.
    #[error("Invalid time \"{0}\" (expected HH:MM)")]
    InvalidTime(String),

    /// The connection is not live.
    #[error("Not connected to server")]
    NotConnected,

    /// The command could not be handed to the connection task.
    #[error("Could not send command: {0}")]
    Dispatch(String),
}

/// Comma-separated field labels for error messages.
struct FieldList<'a>(&'a [DraftField]);

impl fmt::Display for FieldList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", field.key())?;
        }
        Ok(())
    }
}

impl From<BoardError> for CommandError {
    fn from(err: BoardError) -> Self {
        Self::Dispatch(err.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_lists_every_field() {
        let err = CommandError::MissingFields(vec![DraftField::Title, DraftField::Location]);
        assert_eq!(
            err.to_string(),
            "Please fill in all fields (missing: title, location)"
        );
    }

    #[test]
    fn not_connected_message() {
        assert_eq!(
            CommandError::NotConnected.to_string(),
            "Not connected to server"
        );
    }

    #[test]
    fn board_error_converts_to_dispatch() {
        let err = CommandError::from(BoardError::CommandQueueFull);
        assert_eq!(
            err,
            CommandError::Dispatch("command queue is full".to_string())
        );
    }

    #[test]
    fn kind_is_stable() {
        let err = BoardError::InvalidConfig {
            key: "EVENT_BOARD_URL",
            reason: "bad scheme".to_string(),
        };
        assert_eq!(err.kind(), "invalid_config");
        assert_eq!(BoardError::ConnectionClosed.kind(), "connection_closed");
    }
}
