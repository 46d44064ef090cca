//! Serde helpers for local time-of-day values.

use chrono::NaiveTime;

use crate::error::{SeriesError, SeriesResult};

/// Parse `HH:MM` or `HH:MM:SS`.
pub fn parse_time_of_day(s: &str) -> SeriesResult<NaiveTime> {
    let trimmed = s.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| SeriesError::InvalidTime(format!("'{s}' (expected HH:MM)")))
}

/// (De)serialize a `NaiveTime` as `HH:MM`.
pub mod time_of_day {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_time_of_day(&s).map_err(de::Error::custom)
    }
}
