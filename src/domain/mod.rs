//! Domain layer: event records, the local event list, form drafts and
//! connection status.
//!
//! Everything here is plain data plus pure state transitions. The
//! connection task and the notification timers live in [`crate::ws`] and
//! [`crate::service`].

pub mod connection_status;
pub mod draft;
pub mod event_id;
pub mod event_list;
pub mod event_record;
pub mod wire_format;

pub use connection_status::ConnectionStatus;
pub use draft::{DraftEvent, DraftField, NewEvent};
pub use event_id::EventId;
pub use event_list::{EventList, ListChange};
pub use event_record::EventRecord;
