//! Stored timestamp normalization
//!
//! Articles reach us with dates in whatever shape the writer used: structured
//! `{seconds, nanoseconds}` objects, RFC 3339 strings, looser date strings, or
//! nothing at all. Everything is reduced to one canonical ISO-8601 string, or
//! the empty string when no usable date exists.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Value shown when a date is missing or unparseable.
pub const NO_DATE: &str = "";

/// A timestamp as it was stored, before normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    /// Structured store timestamp
    Structured {
        #[serde(alias = "_seconds")]
        seconds: i64,
        #[serde(default, alias = "_nanoseconds")]
        nanoseconds: Option<i64>,
    },
    Text(String),
    /// Anything else (numbers, booleans, arrays...)
    Other(serde_json::Value),
}

/// What to produce when no timestamp was stored at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingTimestamp {
    #[default]
    Empty,
    /// Stamp with the processing time instead
    Now,
}

/// Normalize a stored timestamp to ISO-8601 or [`NO_DATE`].
pub fn normalize_timestamp(raw: Option<&RawTimestamp>, missing: MissingTimestamp) -> String {
    match raw {
        Some(RawTimestamp::Structured {
            seconds,
            nanoseconds,
        }) => from_epoch(*seconds, nanoseconds.unwrap_or(0)),
        Some(RawTimestamp::Text(text)) if text.is_empty() => missing_value(missing),
        Some(RawTimestamp::Text(text)) => normalize_text(text),
        Some(RawTimestamp::Other(serde_json::Value::Null)) | None => missing_value(missing),
        Some(RawTimestamp::Other(_)) => NO_DATE.to_string(),
    }
}

fn missing_value(missing: MissingTimestamp) -> String {
    match missing {
        MissingTimestamp::Empty => NO_DATE.to_string(),
        MissingTimestamp::Now => to_iso(Utc::now()),
    }
}

fn from_epoch(seconds: i64, nanoseconds: i64) -> String {
    let millis = seconds
        .checked_mul(1000)
        .and_then(|ms| ms.checked_add(nanoseconds / 1_000_000));

    match millis.and_then(DateTime::<Utc>::from_timestamp_millis) {
        Some(dt) => to_iso(dt),
        None => NO_DATE.to_string(),
    }
}

/// RFC 3339 input is kept verbatim; looser formats are rewritten.
fn normalize_text(text: &str) -> String {
    let text = text.trim();

    if DateTime::parse_from_rfc3339(text).is_ok() {
        return text.to_string();
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return to_iso(dt.with_timezone(&Utc));
    }

    // `%.f` also accepts a missing fraction
    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return to_iso(naive.and_utc());
        }
    }

    if let Some(midnight) = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return to_iso(midnight.and_utc());
    }

    NO_DATE.to_string()
}

fn to_iso(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawTimestamp {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn structured_timestamp_becomes_iso() {
        let ts = raw(json!({"seconds": 1_700_000_000, "nanoseconds": 0}));
        assert_eq!(
            normalize_timestamp(Some(&ts), MissingTimestamp::Empty),
            "2023-11-14T22:13:20.000Z"
        );
    }

    #[test]
    fn structured_timestamp_keeps_milliseconds() {
        let ts = raw(json!({"seconds": 1_700_000_000, "nanoseconds": 123_456_789}));
        assert_eq!(
            normalize_timestamp(Some(&ts), MissingTimestamp::Empty),
            "2023-11-14T22:13:20.123Z"
        );
    }

    #[test]
    fn admin_export_spelling_is_accepted() {
        let ts = raw(json!({"_seconds": 1_700_000_000, "_nanoseconds": 0}));
        assert!(matches!(ts, RawTimestamp::Structured { .. }));
        assert_eq!(
            normalize_timestamp(Some(&ts), MissingTimestamp::Empty),
            "2023-11-14T22:13:20.000Z"
        );
    }

    #[test]
    fn missing_nanoseconds_default_to_zero() {
        let ts = raw(json!({"seconds": 0}));
        assert_eq!(
            normalize_timestamp(Some(&ts), MissingTimestamp::Empty),
            "1970-01-01T00:00:00.000Z"
        );
    }

    #[test]
    fn out_of_range_seconds_are_no_date() {
        let ts = RawTimestamp::Structured {
            seconds: i64::MAX,
            nanoseconds: None,
        };
        assert_eq!(normalize_timestamp(Some(&ts), MissingTimestamp::Empty), NO_DATE);
    }

    #[test]
    fn rfc3339_string_is_returned_unmodified() {
        let ts = RawTimestamp::Text("2024-03-01T08:30:00+01:00".to_string());
        assert_eq!(
            normalize_timestamp(Some(&ts), MissingTimestamp::Empty),
            "2024-03-01T08:30:00+01:00"
        );
    }

    #[test]
    fn loose_strings_are_normalized() {
        let cases = [
            ("2024-03-01 08:30:00", "2024-03-01T08:30:00.000Z"),
            ("2024-03-01T08:30:00", "2024-03-01T08:30:00.000Z"),
            ("2024-03-01T08:30", "2024-03-01T08:30:00.000Z"),
            ("2024-03-01 08:30", "2024-03-01T08:30:00.000Z"),
            ("2024-03-01T08:30:00.123", "2024-03-01T08:30:00.123Z"),
            ("2024-03-01T08:30:00.123456", "2024-03-01T08:30:00.123Z"),
            ("2024-03-01 08:30:00.5", "2024-03-01T08:30:00.500Z"),
            ("2024-03-01", "2024-03-01T00:00:00.000Z"),
            ("Fri, 01 Mar 2024 08:30:00 +0000", "2024-03-01T08:30:00.000Z"),
        ];
        for (input, expected) in cases {
            let ts = RawTimestamp::Text(input.to_string());
            assert_eq!(
                normalize_timestamp(Some(&ts), MissingTimestamp::Empty),
                expected,
                "input: {input}"
            );
        }
    }

    #[test]
    fn unparseable_string_is_no_date() {
        for input in ["brak danych", "yesterday", "2024-13-45"] {
            let ts = RawTimestamp::Text(input.to_string());
            assert_eq!(normalize_timestamp(Some(&ts), MissingTimestamp::Empty), NO_DATE);
        }
    }

    #[test]
    fn absent_value_follows_missing_policy() {
        assert_eq!(normalize_timestamp(None, MissingTimestamp::Empty), NO_DATE);

        let null = RawTimestamp::Other(serde_json::Value::Null);
        assert_eq!(normalize_timestamp(Some(&null), MissingTimestamp::Empty), NO_DATE);

        let stamped = normalize_timestamp(None, MissingTimestamp::Now);
        assert!(DateTime::parse_from_rfc3339(&stamped).is_ok());
    }

    #[test]
    fn blank_string_is_no_date_even_when_stamping() {
        let blank = RawTimestamp::Text("   ".to_string());
        assert_eq!(normalize_timestamp(Some(&blank), MissingTimestamp::Now), NO_DATE);

        let empty = RawTimestamp::Text(String::new());
        let stamped = normalize_timestamp(Some(&empty), MissingTimestamp::Now);
        assert!(DateTime::parse_from_rfc3339(&stamped).is_ok());
    }

    #[test]
    fn unexpected_types_are_no_date() {
        let ts = raw(json!(true));
        assert_eq!(normalize_timestamp(Some(&ts), MissingTimestamp::Now), NO_DATE);
    }
}
