// Post timestamps.
//
// The timeline API reports `created_at` as "Wed Oct 10 20:19:24 +0000 2018".
// Stored dumps may already hold RFC 3339. Both are accepted; output is
// always RFC 3339.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// chrono format string for the platform's legacy `created_at`.
const LEGACY_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Parse a timestamp in either RFC 3339 or the legacy platform format.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, LEGACY_FORMAT))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_rfc3339())
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognized timestamp {raw:?}")))
}
