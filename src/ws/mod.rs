//! WebSocket layer: connection task, owning handle, wire messages.
//!
//! The client keeps one WebSocket open to the event service, sends
//! `add-event` / `delete-event` commands and receives the four push kinds.

pub mod connection;
pub mod handle;
pub mod messages;

pub use connection::{ClientEvent, ConnectConfig, connect};
pub use handle::ConnectionHandle;
pub use messages::{ClientCommand, ServerPush};
