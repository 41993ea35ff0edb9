//! Service layer: board orchestration and the notification feed.

pub mod board_service;
pub mod notification_feed;

pub use board_service::BoardService;
pub use notification_feed::{Notification, NotificationFeed, NotificationId};

use crate::error::BoardError;
use crate::ws::messages::ClientCommand;

/// Outbound side of the connection as seen by [`BoardService`].
///
/// Implemented by [`crate::ws::ConnectionHandle`]; tests substitute a
/// recording sink.
pub trait CommandSink {
    /// Returns `true` while the connection is live.
    fn is_connected(&self) -> bool;

    /// Hands a command to the connection without waiting.
    ///
    /// # Errors
    ///
    /// Returns a [`BoardError`] when the command cannot be queued.
    fn dispatch(&self, command: ClientCommand) -> Result<(), BoardError>;
}
