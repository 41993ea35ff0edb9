//! Server-assigned event identifier.
//!
//! [`EventId`] is opaque to the client: the server may hand out numeric ids
//! or string ids, and the exact JSON form is kept so that a `delete-event`
//! command echoes back precisely what the server sent.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier of an event record.
///
/// Assigned by the server when it confirms an add command. Used as the
/// identity key of [`super::EventList`] and as the `delete-event` payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventId {
    /// Numeric id (e.g. a millisecond timestamp).
    Number(i64),
    /// Textual id (e.g. a UUID).
    Text(String),
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EventId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for EventId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for EventId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn numeric_id_keeps_json_number_form() {
        let Ok(id) = serde_json::from_str::<EventId>("1704067200000") else {
            panic!("numeric id must decode");
        };
        assert_eq!(id, EventId::Number(1_704_067_200_000));
        assert_eq!(serde_json::to_string(&id).ok().as_deref(), Some("1704067200000"));
    }

    #[test]
    fn text_id_keeps_json_string_form() {
        let Ok(id) = serde_json::from_str::<EventId>("\"a1b2\"") else {
            panic!("text id must decode");
        };
        assert_eq!(id, EventId::from("a1b2"));
        assert_eq!(serde_json::to_string(&id).ok().as_deref(), Some("\"a1b2\""));
    }

    #[test]
    fn number_and_text_with_same_digits_differ() {
        assert_ne!(EventId::Number(7), EventId::from("7"));
    }

    #[test]
    fn display_is_bare_value() {
        assert_eq!(EventId::Number(42).to_string(), "42");
        assert_eq!(EventId::from("evt-9").to_string(), "evt-9");
    }
}
