//! WebSocket message types: client commands and server pushes.
//!
//! Every frame is a JSON text frame with an adjacently tagged envelope:
//!
//! ```json
//! { "event": "event-added", "data": { "id": 1, "title": "Standup", ... } }
//! ```

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{EventId, EventRecord, NewEvent};

/// Commands that the client sends to the server.
///
/// There is no acknowledgment: success is observed through a later
/// [`ServerPush`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientCommand {
    /// Create an event.
    AddEvent(NewEvent),
    /// Delete the event with the given id.
    DeleteEvent(EventId),
}

impl ClientCommand {
    /// Returns the wire name of the command.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AddEvent(_) => "add-event",
            Self::DeleteEvent(_) => "delete-event",
        }
    }
}

/// Messages that the server pushes to every connected client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerPush {
    /// Full list, sent once per successful connection. Records that fail
    /// to decode are skipped rather than discarding the whole list.
    #[serde(deserialize_with = "deserialize_snapshot")]
    InitialEvents(Vec<EventRecord>),
    /// A new record.
    EventAdded(EventRecord),
    /// A replacement for an existing record.
    EventUpdated(EventRecord),
    /// The id of a removed record.
    EventDeleted(EventId),
}

impl ServerPush {
    /// Returns the wire name of the push.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::InitialEvents(_) => "initial-events",
            Self::EventAdded(_) => "event-added",
            Self::EventUpdated(_) => "event-updated",
            Self::EventDeleted(_) => "event-deleted",
        }
    }
}

/// Decodes a snapshot one record at a time, dropping the bad ones.
fn deserialize_snapshot<'de, D>(deserializer: D) -> Result<Vec<EventRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
    let total = raw.len();
    let records: Vec<EventRecord> = raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping malformed record in snapshot");
                None
            }
        })
        .collect();
    if records.len() != total {
        tracing::warn!(
            kept = records.len(),
            total,
            "snapshot contained malformed records"
        );
    }
    Ok(records)
}
