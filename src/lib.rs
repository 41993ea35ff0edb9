//! # event-board
//!
//! Terminal event board kept in sync with a real-time event service.
//!
//! The client holds one WebSocket connection to the service, renders the
//! current list of events, and sends two commands: add and delete. Every
//! change to the list arrives as a server push, so all connected boards
//! converge on the same list.
//!
//! ## Architecture
//!
//! ```text
//! Terminal UI (tui/)
//!     │  keys, redraws
//!     ├── BoardService (service/)
//!     │     ├── EventList reducer (domain/)
//!     │     └── NotificationFeed (service/)
//!     │
//!     ├── ConnectionHandle ── commands ──▶ connection task (ws/)
//!     └── ClientEvent receiver ◀── pushes ─┘
//!                                          │
//!                                   event service (WebSocket)
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod tui;
pub mod ws;
