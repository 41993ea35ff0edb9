//! Event records as owned by the server and cached by the client.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::EventId;
use super::wire_format::{attendee_count, calendar_date, clock_time, timestamp};

/// One scheduled event.
///
/// Created by the server when it confirms an `add-event` command, replaced
/// in place by `event-updated` pushes and dropped by `event-deleted`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Server-assigned identifier.
    pub id: EventId,
    /// Event title.
    pub title: String,
    /// Calendar date.
    #[serde(with = "calendar_date")]
    pub date: NaiveDate,
    /// Local clock time.
    #[serde(with = "clock_time")]
    pub time: NaiveTime,
    /// Free-form location.
    pub location: String,
    /// Number of attendees.
    #[serde(with = "attendee_count")]
    pub attendees: u32,
    /// Time of the last server-side update.
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl EventRecord {
    /// Date rendered as `Monday, 1 Jan 2024`.
    #[must_use]
    pub fn display_date(&self) -> String {
        self.date.format("%A, %-d %b %Y").to_string()
    }

    /// Clock time rendered as `HH:MM`.
    #[must_use]
    pub fn display_time(&self) -> String {
        self.time.format(super::wire_format::TIME_FORMAT).to_string()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn decodes_server_record() {
        let json = r#"{
            "id": 1704067200000,
            "title": "Standup",
            "date": "2024-01-01",
            "time": "09:00",
            "location": "Room 1",
            "attendees": 5,
            "timestamp": "2024-01-01T08:00:00.000Z"
        }"#;
        let Ok(record) = serde_json::from_str::<EventRecord>(json) else {
            panic!("record must decode");
        };
        assert_eq!(record.id, EventId::Number(1_704_067_200_000));
        assert_eq!(record.attendees, 5);
        assert_eq!(record.display_date(), "Monday, 1 Jan 2024");
        assert_eq!(record.display_time(), "09:00");
    }

    #[test]
    fn accepts_epoch_millis_timestamp() {
        let json = r#"{"id":"x","title":"t","date":"2024-03-05","time":"18:30:00",
            "location":"l","attendees":0,"timestamp":1704067200000}"#;
        let Ok(record) = serde_json::from_str::<EventRecord>(json) else {
            panic!("record must decode");
        };
        assert_eq!(record.timestamp.timestamp_millis(), 1_704_067_200_000);
        assert_eq!(record.display_time(), "18:30");
    }

    #[test]
    fn negative_attendees_are_clamped() {
        let json = r#"{"id":1,"title":"t","date":"2024-03-05","time":"18:30",
            "location":"l","attendees":-3,"timestamp":0}"#;
        let Ok(record) = serde_json::from_str::<EventRecord>(json) else {
            panic!("record must decode");
        };
        assert_eq!(record.attendees, 0);
    }
}
