//! Box timestamp handling.
//!
//! Box sends ISO 8601 timestamps with an explicit offset, usually
//! `2013-12-12T10:53:43-08:00`. Some older endpoints emit `+0000` without the
//! colon, so both forms are accepted. Outgoing timestamps are always RFC 3339
//! in UTC with seconds precision.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::Result;

const COMPACT_OFFSET_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Parse a Box timestamp into UTC.
pub fn parse(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    match DateTime::parse_from_rfc3339(s) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(_) => Ok(DateTime::parse_from_str(s, COMPACT_OFFSET_FORMAT)?.with_timezone(&Utc)),
    }
}

/// Render a timestamp the way Box expects it in request bodies and queries.
pub fn format(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// `#[serde(with = "crate::date::option")]` for `Option<DateTime<Utc>>` fields.
pub mod option {
    use chrono::{DateTime, Utc};
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&super::format(dt)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) if !s.is_empty() => super::parse(&s).map(Some).map_err(D::Error::custom),
            _ => Ok(None),
        }
    }
}
