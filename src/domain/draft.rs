//! Form state for a not-yet-created event and its validation.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::wire_format::{DATE_FORMAT, calendar_date, clock_time, parse_clock_time};
use crate::error::CommandError;

/// One input field of the add-event form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    /// Event title.
    Title,
    /// Calendar date, `YYYY-MM-DD`.
    Date,
    /// Clock time, `HH:MM`.
    Time,
    /// Location.
    Location,
    /// Attendee count.
    Attendees,
}

impl DraftField {
    /// All fields in form order.
    pub const ALL: [Self; 5] = [
        Self::Title,
        Self::Date,
        Self::Time,
        Self::Location,
        Self::Attendees,
    ];

    /// Fields that must not be blank.
    pub const REQUIRED: [Self; 4] = [Self::Title, Self::Date, Self::Time, Self::Location];

    /// Lowercase wire name of the field.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Date => "date",
            Self::Time => "time",
            Self::Location => "location",
            Self::Attendees => "attendees",
        }
    }

    /// Human label shown next to the input.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Date => "Date (YYYY-MM-DD)",
            Self::Time => "Time (HH:MM)",
            Self::Location => "Location",
            Self::Attendees => "Attendees",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Raw text of the add-event form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftEvent {
    /// Title input.
    pub title: String,
    /// Date input.
    pub date: String,
    /// Time input.
    pub time: String,
    /// Location input.
    pub location: String,
    /// Attendees input; parsed leniently.
    pub attendees: String,
}

impl DraftEvent {
    /// Returns the text of one field.
    #[must_use]
    pub fn field(&self, field: DraftField) -> &str {
        match field {
            DraftField::Title => &self.title,
            DraftField::Date => &self.date,
            DraftField::Time => &self.time,
            DraftField::Location => &self.location,
            DraftField::Attendees => &self.attendees,
        }
    }

    /// Returns the text of one field for editing.
    pub fn field_mut(&mut self, field: DraftField) -> &mut String {
        match field {
            DraftField::Title => &mut self.title,
            DraftField::Date => &mut self.date,
            DraftField::Time => &mut self.time,
            DraftField::Location => &mut self.location,
            DraftField::Attendees => &mut self.attendees,
        }
    }

    /// Required fields that are blank, in form order.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<DraftField> {
        DraftField::REQUIRED
            .into_iter()
            .filter(|f| self.field(*f).trim().is_empty())
            .collect()
    }

    /// Validates the draft into a [`NewEvent`].
    ///
    /// # Errors
    ///
    /// - [`CommandError::MissingFields`] if any required field is blank.
    /// - [`CommandError::InvalidDate`] / [`CommandError::InvalidTime`] if the
    ///   date or time cannot be parsed.
    pub fn validate(&self) -> Result<NewEvent, CommandError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(CommandError::MissingFields(missing));
        }
        // Form dates are plain calendar dates; no offsets, no time part.
        let date = NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT)
            .map_err(|_| CommandError::InvalidDate(self.date.trim().to_string()))?;
        let time = parse_clock_time(&self.time)
            .ok_or_else(|| CommandError::InvalidTime(self.time.trim().to_string()))?;

        Ok(NewEvent {
            title: self.title.clone(),
            date,
            time,
            location: self.location.clone(),
            attendees: parse_attendees(&self.attendees),
        })
    }

    /// Resets every field to empty.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Payload of the `add-event` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    /// Event title.
    pub title: String,
    /// Calendar date.
    #[serde(with = "calendar_date")]
    pub date: NaiveDate,
    /// Local clock time.
    #[serde(with = "clock_time")]
    pub time: NaiveTime,
    /// Location.
    pub location: String,
    /// Attendee count.
    pub attendees: u32,
}

/// Parses the attendee count the way an integer prefix parse does:
/// leading whitespace, an optional sign, then digits; anything after the
/// digits is ignored. No digits or a negative value gives 0, overflow
/// saturates.
#[must_use]
pub fn parse_attendees(raw: &str) -> u32 {
    let s = raw.trim_start();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let mut value: u32 = 0;
    let mut seen_digit = false;
    for c in digits.chars() {
        let Some(d) = c.to_digit(10) else {
            break;
        };
        seen_digit = true;
        value = value.saturating_mul(10).saturating_add(d);
    }
    if negative || !seen_digit { 0 } else { value }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use tokio_test::assert_ok;

    use super::*;

    fn standup() -> DraftEvent {
        DraftEvent {
            title: "Standup".to_string(),
            date: "2024-01-01".to_string(),
            time: "09:00".to_string(),
            location: "Room 1".to_string(),
            attendees: "5".to_string(),
        }
    }

    #[test]
    fn valid_draft_becomes_new_event() {
        let event = assert_ok!(standup().validate());
        assert_eq!(event.title, "Standup");
        assert_eq!(event.attendees, 5);
        assert_eq!(NaiveDate::from_ymd_opt(2024, 1, 1), Some(event.date));
    }

    #[test]
    fn new_event_wire_shape() {
        let event = assert_ok!(standup().validate());
        let json = assert_ok!(serde_json::to_value(&event));
        assert_eq!(
            json,
            serde_json::json!({
                "title": "Standup",
                "date": "2024-01-01",
                "time": "09:00",
                "location": "Room 1",
                "attendees": 5
            })
        );
    }

    #[test]
    fn blank_fields_are_reported_in_order() {
        let draft = DraftEvent {
            title: "  ".to_string(),
            location: String::new(),
            ..standup()
        };
        assert_eq!(
            draft.validate(),
            Err(CommandError::MissingFields(vec![
                DraftField::Title,
                DraftField::Location
            ]))
        );
    }

    #[test]
    fn attendees_is_never_required() {
        let draft = DraftEvent {
            attendees: String::new(),
            ..standup()
        };
        let event = assert_ok!(draft.validate());
        assert_eq!(event.attendees, 0);
    }

    #[test]
    fn malformed_date_and_time_are_rejected() {
        let bad_date = DraftEvent {
            date: "tomorrow".to_string(),
            ..standup()
        };
        assert_eq!(
            bad_date.validate(),
            Err(CommandError::InvalidDate("tomorrow".to_string()))
        );

        let bad_time = DraftEvent {
            time: "9am".to_string(),
            ..standup()
        };
        assert_eq!(
            bad_time.validate(),
            Err(CommandError::InvalidTime("9am".to_string()))
        );
    }

    #[test]
    fn date_with_time_or_offset_is_rejected() {
        for raw in ["2024-01-01T23:30:00-05:00", "2024-01-01T08:30:00", "2024-1-1x"] {
            let draft = DraftEvent {
                date: raw.to_string(),
                ..standup()
            };
            assert_eq!(
                draft.validate(),
                Err(CommandError::InvalidDate(raw.to_string()))
            );
        }
    }

    #[test]
    fn attendees_prefix_parsing() {
        assert_eq!(parse_attendees("5"), 5);
        assert_eq!(parse_attendees("  12 people"), 12);
        assert_eq!(parse_attendees("+3"), 3);
        assert_eq!(parse_attendees("-4"), 0);
        assert_eq!(parse_attendees("many"), 0);
        assert_eq!(parse_attendees(""), 0);
        assert_eq!(parse_attendees("99999999999"), u32::MAX);
    }

    #[test]
    fn clear_resets_everything() {
        let mut draft = standup();
        draft.clear();
        assert_eq!(draft, DraftEvent::default());
    }

    #[test]
    fn field_mut_edits_the_right_input() {
        let mut draft = DraftEvent::default();
        draft.field_mut(DraftField::Location).push_str("Hall");
        assert_eq!(draft.field(DraftField::Location), "Hall");
        assert_eq!(draft.field(DraftField::Title), "");
    }
}
