use chrono::{DateTime, NaiveDateTime};
use serde::de::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serializer for serde `with` fields holding a local wall-clock time
///
/// Writes the naive ISO 8601 form, e.g. `2023-05-03T06:12:00`.
pub fn serialize<S>(date_time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    date_time.serialize(serializer)
}

/// Accepts RFC 3339 timestamps with an offset or `Z` (the local wall-clock
/// part is kept, the offset dropped) as well as naive ISO 8601 date-times
pub fn deserialize<'de, D>(d: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(d)?;
    parse_local_time(&raw).ok_or_else(|| D::Error::custom(format!("invalid date-time: {raw}")))
}

fn parse_local_time(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(date_time) = DateTime::parse_from_rfc3339(raw) {
        return Some(date_time.naive_local());
    }
    raw.parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .ok()
}
