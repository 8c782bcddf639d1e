// src/domain/timestamp.rs

//! Fixed-width UTC timestamps.
//!
//! Stored documents are compared as strings when sorted, so every timestamp is
//! truncated to microseconds and written as `YYYY-MM-DDTHH:MM:SS.ffffffZ`.

use chrono::{DateTime, DurationRound, SecondsFormat, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Current time at the precision the store keeps.
pub fn now() -> DateTime<Utc> {
    truncate(Utc::now())
}

pub fn truncate(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.duration_trunc(TimeDelta::microseconds(1)).unwrap_or(ts)
}

pub fn format(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(ts))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(serde::de::Error::custom)
}
