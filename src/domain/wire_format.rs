//! Wire formats for dates, clock times and timestamps.
//!
//! Encoding is fixed (`YYYY-MM-DD`, `HH:MM`, RFC 3339). Decoding accepts
//! the other shapes an event service commonly produces.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Calendar date format used on the wire and in the form.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Clock time format used on the wire and in the form.
pub const TIME_FORMAT: &str = "%H:%M";

/// Parses a calendar date: `YYYY-MM-DD`, an RFC 3339 date-time, or a
/// naive `YYYY-MM-DDTHH:MM:SS` date-time.
#[must_use]
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Utc).date_naive())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Parses a clock time: `HH:MM` or `HH:MM:SS`.
#[must_use]
pub fn parse_clock_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, TIME_FORMAT)
        .ok()
        .or_else(|| NaiveTime::parse_from_str(raw, "%H:%M:%S").ok())
}

/// `serde(with)` module for calendar dates.
pub mod calendar_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de};

    /// Serializes as `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(super::DATE_FORMAT))
    }

    /// Deserializes any shape accepted by [`super::parse_calendar_date`].
    ///
    /// # Errors
    ///
    /// Fails when the value is not a string or not a recognizable date.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_calendar_date(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid calendar date: {raw:?}")))
    }
}

/// `serde(with)` module for clock times.
pub mod clock_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    /// Serializes as `HH:MM`.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(super::TIME_FORMAT))
    }

    /// Deserializes `HH:MM` or `HH:MM:SS`.
    ///
    /// # Errors
    ///
    /// Fails when the value is not a string or not a recognizable time.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_clock_time(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid clock time: {raw:?}")))
    }
}

/// `serde(with)` module for attendee counts.
///
/// Servers shared with other clients may relay counts that are negative,
/// fractional or quoted. Those are clamped into `u32` instead of failing
/// the whole record.
pub mod attendee_count {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCount {
        Int(i64),
        Float(f64),
        Text(String),
    }

    /// Serializes as a plain integer.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(count: &u32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(*count)
    }

    /// Deserializes any JSON number or numeric string. Negative values give
    /// 0, fractions are truncated and large values saturate.
    ///
    /// # Errors
    ///
    /// Fails when the value is neither a number nor a string.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        Ok(match RawCount::deserialize(deserializer)? {
            RawCount::Int(n) => u32::try_from(n.max(0)).unwrap_or(u32::MAX),
            // Float to int casts saturate, NaN gives 0
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            RawCount::Float(f) => f as u32,
            RawCount::Text(raw) => crate::domain::draft::parse_attendees(&raw),
        })
    }
}

/// `serde(with)` module for update timestamps.
pub mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Millis(i64),
        Text(String),
    }

    /// Serializes as RFC 3339 with millisecond precision.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
    }

    /// Deserializes RFC 3339 text or Unix epoch milliseconds.
    ///
    /// # Errors
    ///
    /// Fails when the value is neither, or is out of range.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        match RawTimestamp::deserialize(deserializer)? {
            RawTimestamp::Millis(ms) => DateTime::from_timestamp_millis(ms)
                .ok_or_else(|| de::Error::custom(format!("timestamp out of range: {ms}"))),
            RawTimestamp::Text(raw) => DateTime::parse_from_rfc3339(&raw)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| de::Error::custom(format!("invalid timestamp {raw:?}: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_accepts_plain_and_datetime_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1);
        assert_eq!(parse_calendar_date("2024-01-01"), expected);
        assert_eq!(parse_calendar_date("2024-01-01T08:30:00.000Z"), expected);
        assert_eq!(parse_calendar_date("2024-01-01T08:30:00"), expected);
        assert_eq!(parse_calendar_date("01/01/2024"), None);
        assert_eq!(parse_calendar_date("2024-02-30"), None);
    }

    #[derive(Debug, serde::Deserialize)]
    struct Count {
        #[serde(with = "attendee_count")]
        n: u32,
    }

    fn count(json: &str) -> Option<u32> {
        serde_json::from_str::<Count>(json).ok().map(|c| c.n)
    }

    #[test]
    fn attendee_count_clamps_instead_of_failing() {
        assert_eq!(count(r#"{"n":5}"#), Some(5));
        assert_eq!(count(r#"{"n":-3}"#), Some(0));
        assert_eq!(count(r#"{"n":2.9}"#), Some(2));
        assert_eq!(count(r#"{"n":-0.5}"#), Some(0));
        assert_eq!(count(r#"{"n":1e12}"#), Some(u32::MAX));
        assert_eq!(count(r#"{"n":"7"}"#), Some(7));
        assert_eq!(count(r#"{"n":null}"#), None);
    }

    #[test]
    fn time_accepts_minutes_and_seconds() {
        assert_eq!(parse_clock_time("09:00"), NaiveTime::from_hms_opt(9, 0, 0));
        assert_eq!(parse_clock_time("23:59:30"), NaiveTime::from_hms_opt(23, 59, 30));
        assert_eq!(parse_clock_time("25:00"), None);
        assert_eq!(parse_clock_time("nine"), None);
    }
}
