//! Calendar-day helpers for the pacing math and the stored date format.

use chrono::{DateTime, Utc};

/// Milliseconds in one calendar day.
pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Floors a timestamp to the start of its UTC calendar day.
pub fn start_of_day(ts: DateTime<Utc>) -> DateTime<Utc> {
    let floored = ts.timestamp_millis().div_euclid(DAY_MS) * DAY_MS;
    DateTime::from_timestamp_millis(floored).unwrap_or(ts)
}

/// Serde codec for optional timestamps stored as ISO-8601 strings.
///
/// The empty string means "unset"; set values render with millisecond
/// precision and a `Z` suffix, matching what the stored documents carry.
pub mod opt_iso_date {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => {
                serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() {
            return Ok(None);
        }
        DateTime::parse_from_rfc3339(&raw)
            .map(|date| Some(date.with_timezone(&Utc)))
            .map_err(serde::de::Error::custom)
    }
}
