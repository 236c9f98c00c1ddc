//! Normalization of the timestamp shapes the document store hands back.
//!
//! Stored documents carry dates as a database timestamp object, an in-process
//! `DateTime`, or a loosely formatted string. Accessors call
//! [`RawTimestamp::normalize`] exactly once so the rest of the pipeline only
//! ever sees `Option<DateTime<Utc>>`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serializer};
use std::cmp::Ordering;

const NAIVE_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

/// A date value as it arrived from storage, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawTimestamp {
    /// Seconds/nanoseconds pair as serialized by the document database.
    Database { seconds: i64, nanoseconds: u32 },
    /// Already a native date, e.g. constructed in process.
    Native(DateTime<Utc>),
    /// ISO-8601 or looser textual date.
    Text(String),
    /// Any other JSON shape. Always normalizes to `None`.
    Malformed,
}

impl RawTimestamp {
    pub fn normalize(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Database {
                seconds,
                nanoseconds,
            } => Utc.timestamp_opt(*seconds, *nanoseconds).single(),
            Self::Native(value) => Some(*value),
            Self::Text(raw) => parse_text(raw),
            Self::Malformed => None,
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

impl From<DateTime<Utc>> for RawTimestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Native(value)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireTimestamp {
    Database {
        #[serde(alias = "_seconds")]
        seconds: i64,
        #[serde(default, alias = "_nanoseconds")]
        nanoseconds: u32,
    },
    EpochMillis(i64),
    Text(String),
    Other(IgnoredAny),
}

impl<'de> Deserialize<'de> for RawTimestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = WireTimestamp::deserialize(deserializer)?;
        Ok(match wire {
            WireTimestamp::Database {
                seconds,
                nanoseconds,
            } => Self::Database {
                seconds,
                nanoseconds,
            },
            WireTimestamp::EpochMillis(millis) => {
                let nanoseconds = u32::try_from(millis.rem_euclid(1_000) * 1_000_000).unwrap_or(0);
                Self::Database {
                    seconds: millis.div_euclid(1_000),
                    nanoseconds,
                }
            }
            WireTimestamp::Text(raw) => Self::Text(raw),
            WireTimestamp::Other(_) => Self::Malformed,
        })
    }
}

/// Best-effort parse of a textual date. Returns `None` instead of failing.
pub fn parse_text(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed.and_utc());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, format) {
            return parsed.and_hms_opt(0, 0, 0).map(|value| value.and_utc());
        }
    }

    None
}

/// Canonical ISO rendering used everywhere in the public view-model.
pub fn to_iso_string(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn serialize_optional_iso<S>(
    value: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(value) => serializer.serialize_str(&to_iso_string(value)),
        None => serializer.serialize_none(),
    }
}

/// Newest first, undated entries last.
pub(crate) fn newest_first(left: Option<DateTime<Utc>>, right: Option<DateTime<Utc>>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => right.cmp(&left),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn database_timestamps_normalize_with_either_field_spelling() {
        let plain: RawTimestamp =
            serde_json::from_value(json!({ "seconds": 1_735_689_600, "nanoseconds": 0 }))
                .expect("plain shape");
        let admin: RawTimestamp =
            serde_json::from_value(json!({ "_seconds": 1_735_689_600, "_nanoseconds": 0 }))
                .expect("admin shape");

        assert_eq!(plain.normalize(), Some(utc(2025, 1, 1, 0, 0, 0)));
        assert_eq!(admin.normalize(), plain.normalize());
    }

    #[test]
    fn text_timestamps_accept_iso_and_plain_dates() {
        let iso: RawTimestamp = serde_json::from_value(json!("2025-03-01T09:30:00.000Z")).unwrap();
        assert_eq!(iso.normalize(), Some(utc(2025, 3, 1, 9, 30, 0)));

        let offset = RawTimestamp::text("2025-03-01T09:30:00+09:00");
        assert_eq!(offset.normalize(), Some(utc(2025, 3, 1, 0, 30, 0)));

        assert_eq!(
            RawTimestamp::text("2025/03/01").normalize(),
            Some(utc(2025, 3, 1, 0, 0, 0))
        );
        assert_eq!(
            RawTimestamp::text("2025-03-01 12:00:00").normalize(),
            Some(utc(2025, 3, 1, 12, 0, 0))
        );
    }

    #[test]
    fn malformed_values_degrade_to_none() {
        assert_eq!(RawTimestamp::text("next tuesday").normalize(), None);
        assert_eq!(RawTimestamp::text("   ").normalize(), None);

        let shape: RawTimestamp = serde_json::from_value(json!(true)).expect("never fails");
        assert_eq!(shape, RawTimestamp::Malformed);
        assert_eq!(shape.normalize(), None);
    }

    #[test]
    fn epoch_millis_are_treated_as_database_time() {
        let raw: RawTimestamp = serde_json::from_value(json!(1_735_689_600_250_i64)).unwrap();
        let normalized = raw.normalize().expect("valid millis");
        assert_eq!(to_iso_string(&normalized), "2025-01-01T00:00:00.250Z");
    }

    #[test]
    fn iso_rendering_uses_millisecond_zulu_format() {
        assert_eq!(
            to_iso_string(&utc(2024, 11, 5, 3, 4, 5)),
            "2024-11-05T03:04:05.000Z"
        );
    }

    #[test]
    fn newest_first_puts_undated_last() {
        let mut dates = vec![
            None,
            Some(utc(2024, 1, 1, 0, 0, 0)),
            Some(utc(2025, 1, 1, 0, 0, 0)),
        ];
        dates.sort_by(|a, b| newest_first(*a, *b));
        assert_eq!(
            dates,
            vec![
                Some(utc(2025, 1, 1, 0, 0, 0)),
                Some(utc(2024, 1, 1, 0, 0, 0)),
                None
            ]
        );
    }
}
