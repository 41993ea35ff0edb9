//! Local, most-recent-first list of event records.
//!
//! [`EventList::apply`] is the only mutation path: it reduces one
//! [`ServerPush`] into the list and reports what changed. It performs no
//! I/O, so every ordering rule can be tested without a connection.

use super::{EventId, EventRecord};
use crate::ws::messages::ServerPush;

/// Outcome of applying one push to the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListChange {
    /// The list was replaced by a snapshot.
    Loaded {
        /// Number of records kept from the snapshot.
        count: usize,
    },
    /// A record was prepended.
    Added {
        /// Title of the new record.
        title: String,
    },
    /// A record was replaced in place.
    Updated {
        /// Title after the update.
        title: String,
        /// Attendee count after the update.
        attendees: u32,
    },
    /// A record was removed.
    Removed {
        /// Title of the removed record.
        title: String,
    },
    /// An update named an id that is not in the list.
    UpdateUnmatched {
        /// The unknown id.
        id: EventId,
    },
    /// A delete named an id that is not in the list.
    DeleteUnmatched {
        /// The unknown id.
        id: EventId,
    },
}

impl ListChange {
    /// Notification text for this change, if the change is user-visible.
    #[must_use]
    pub fn notification(&self) -> Option<String> {
        match self {
            Self::Loaded { .. } => Some("Events loaded successfully".to_string()),
            Self::Added { title } => Some(format!("Event \"{title}\" added")),
            Self::Updated { title, attendees } => Some(format!("{title} - {attendees} attendees")),
            Self::Removed { title } => Some(format!("Event \"{title}\" deleted")),
            Self::UpdateUnmatched { .. } | Self::DeleteUnmatched { .. } => None,
        }
    }
}

/// Ordered cache of the server's event records.
///
/// Holds at most one record per [`EventId`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventList {
    events: Vec<EventRecord>,
}

impl EventList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one server push.
    pub fn apply(&mut self, push: ServerPush) -> ListChange {
        match push {
            ServerPush::InitialEvents(records) => self.replace_all(records),
            ServerPush::EventAdded(record) => self.prepend(record),
            ServerPush::EventUpdated(record) => self.update(record),
            ServerPush::EventDeleted(id) => self.remove(&id),
        }
    }

    fn replace_all(&mut self, records: Vec<EventRecord>) -> ListChange {
        let received = records.len();
        self.events.clear();
        for record in records {
            if self.position(&record.id).is_none() {
                self.events.push(record);
            }
        }
        if self.events.len() != received {
            tracing::warn!(
                received,
                kept = self.events.len(),
                "snapshot contained duplicate ids"
            );
        }
        ListChange::Loaded {
            count: self.events.len(),
        }
    }

    fn prepend(&mut self, record: EventRecord) -> ListChange {
        if let Some(pos) = self.position(&record.id) {
            tracing::warn!(id = %record.id, "added event already present, replacing stale copy");
            self.events.remove(pos);
        }
        let title = record.title.clone();
        self.events.insert(0, record);
        ListChange::Added { title }
    }

    fn update(&mut self, record: EventRecord) -> ListChange {
        match self.events.iter_mut().find(|e| e.id == record.id) {
            Some(slot) => {
                let change = ListChange::Updated {
                    title: record.title.clone(),
                    attendees: record.attendees,
                };
                *slot = record;
                change
            }
            None => {
                tracing::warn!(id = %record.id, "update for unknown event ignored");
                ListChange::UpdateUnmatched { id: record.id }
            }
        }
    }

    fn remove(&mut self, id: &EventId) -> ListChange {
        match self.position(id) {
            Some(pos) => {
                let removed = self.events.remove(pos);
                ListChange::Removed {
                    title: removed.title,
                }
            }
            None => {
                tracing::warn!(%id, "delete for unknown event ignored");
                ListChange::DeleteUnmatched { id: id.clone() }
            }
        }
    }

    fn position(&self, id: &EventId) -> Option<usize> {
        self.events.iter().position(|e| &e.id == id)
    }

    /// Records in display order.
    #[must_use]
    pub fn as_slice(&self) -> &[EventRecord] {
        &self.events
    }

    /// Iterates records in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, EventRecord> {
        self.events.iter()
    }

    /// Returns the record with the given id.
    #[must_use]
    pub fn get(&self, id: &EventId) -> Option<&EventRecord> {
        self.events.iter().find(|e| &e.id == id)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` when there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl<'a> IntoIterator for &'a EventList {
    type Item = &'a EventRecord;
    type IntoIter = std::slice::Iter<'a, EventRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
