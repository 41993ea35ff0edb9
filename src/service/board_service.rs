//! Board service: owns the local board state and sends commands.

use std::time::Duration;

use super::CommandSink;
use super::notification_feed::NotificationFeed;
use crate::domain::{ConnectionStatus, DraftEvent, EventId, EventList};
use crate::error::CommandError;
use crate::ws::connection::ClientEvent;
use crate::ws::messages::{ClientCommand, ServerPush};

/// Orchestration layer for the event board.
///
/// Holds the event list, the notification feed and the connection status,
/// and forwards commands through its [`CommandSink`]. Inbound events are
/// applied strictly in the order they are handed in.
#[derive(Debug)]
pub struct BoardService<S> {
    events: EventList,
    feed: NotificationFeed,
    status: ConnectionStatus,
    sink: S,
}

impl<S: CommandSink> BoardService<S> {
    /// Creates a new `BoardService` with an empty list.
    #[must_use]
    pub fn new(sink: S, notification_ttl: Duration) -> Self {
        Self {
            events: EventList::new(),
            feed: NotificationFeed::new(notification_ttl),
            status: ConnectionStatus::default(),
            sink,
        }
    }

    /// Applies one event from the connection task.
    pub fn handle_client_event(&mut self, event: ClientEvent) {
        match event {
            ClientEvent::Connected => {
                tracing::info!("board connected");
                self.status = ConnectionStatus::Connected;
            }
            ClientEvent::Disconnected { reason } => {
                if self.status != ConnectionStatus::Disconnected {
                    tracing::info!(%reason, "board disconnected");
                }
                self.status = ConnectionStatus::Disconnected;
            }
            ClientEvent::Push(push) => self.apply_push(push),
        }
    }

    /// Reduces one server push into the list and notifies about it.
    pub fn apply_push(&mut self, push: ServerPush) {
        let kind = push.name();
        let change = self.events.apply(push);
        tracing::debug!(push = kind, ?change, "push applied");
        if let Some(message) = change.notification() {
            self.feed.push(message);
        }
    }

    /// Validates the draft and sends an `add-event` command.
    ///
    /// On success the draft is cleared. The record itself only appears once
    /// the server pushes `event-added`. Every failure enqueues exactly one
    /// notification and transmits nothing.
    ///
    /// # Errors
    ///
    /// - [`CommandError::MissingFields`], [`CommandError::InvalidDate`],
    ///   [`CommandError::InvalidTime`] for an invalid draft.
    /// - [`CommandError::NotConnected`] when the connection is not live.
    /// - [`CommandError::Dispatch`] when the command could not be queued.
    pub fn add_event(&mut self, draft: &mut DraftEvent) -> Result<(), CommandError> {
        let result = self.try_add_event(draft);
        if let Err(e) = &result {
            tracing::info!(error = %e, "add-event not sent");
            self.feed.push(e.to_string());
        }
        result
    }

    fn try_add_event(&self, draft: &mut DraftEvent) -> Result<(), CommandError> {
        let new_event = draft.validate()?;
        if !self.sink.is_connected() {
            return Err(CommandError::NotConnected);
        }
        let title = new_event.title.clone();
        self.sink
            .dispatch(ClientCommand::AddEvent(new_event))
            .map_err(|e| {
                tracing::warn!(
                    %title,
                    kind = e.kind(),
                    error = %e,
                    "add-event could not be queued"
                );
                CommandError::from(e)
            })?;
        tracing::info!(%title, "add-event sent");
        draft.clear();
        Ok(())
    }

    /// Sends a `delete-event` command if the connection is live.
    ///
    /// While disconnected this is a silent no-op. Returns whether the
    /// command was queued.
    pub fn delete_event(&mut self, id: &EventId) -> bool {
        if !self.sink.is_connected() {
            tracing::debug!(%id, "delete-event dropped while disconnected");
            return false;
        }
        let title = self.events.get(id).map(|e| e.title.as_str()).unwrap_or_default();
        match self.sink.dispatch(ClientCommand::DeleteEvent(id.clone())) {
            Ok(()) => {
                tracing::info!(%id, title, "delete-event sent");
                true
            }
            Err(e) => {
                tracing::warn!(
                    %id,
                    title,
                    kind = e.kind(),
                    error = %e,
                    "delete-event could not be queued"
                );
                false
            }
        }
    }

    /// Enqueues a local notification.
    pub fn notify(&mut self, message: impl Into<String>) {
        self.feed.push(message);
    }

    /// Drops expired notifications. Returns how many were removed.
    pub fn tick(&mut self) -> usize {
        self.feed.collect_expired()
    }

    /// Current event list.
    #[must_use]
    pub fn events(&self) -> &EventList {
        &self.events
    }

    /// Current notification feed.
    #[must_use]
    pub fn notifications(&self) -> &NotificationFeed {
        &self.feed
    }

    /// Current connection status.
    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    /// Command sink.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consumes the service, returning the sink (e.g. to close it).
    #[must_use]
    pub fn into_sink(self) -> S {
        self.sink
    }
}
