//! Utility functions for lurkview

use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Error, Result};

const MINUTE: f64 = 60.0;
const HOUR: f64 = 3_600.0;
const DAY: f64 = 86_400.0;
const MONTH: f64 = 30.0 * DAY;
const YEAR: f64 = 365.0 * DAY;

/// Ellipsis appended to truncated briefs.
pub const ELLIPSIS: char = '…';

/// Formats Unix timestamp as compact relative time.
///
/// Produces "just now", "5m ago", "3h ago", "2d ago", "4mo ago" or "1y ago"
/// measured against the current system time. Absent or zero timestamps
/// yield an empty string.
///
/// # Arguments
///
/// * `timestamp`: Unix timestamp in seconds, fractional part allowed
///
/// # Returns
///
/// Relative time string, empty when timestamp is absent
pub fn format_relative_time(timestamp: Option<f64>) -> String {
    format_relative_time_at(timestamp, now_secs())
}

/// Formats timestamp relative to an explicit `now`.
///
/// Future timestamps are treated as "just now", which happens when the
/// local clock lags upstream.
pub fn format_relative_time_at(timestamp: Option<f64>, now: f64) -> String {
    let Some(ts) = timestamp.filter(|ts| *ts != 0.0) else {
        return String::new();
    };

    let diff = now - ts;

    if diff < MINUTE {
        "just now".to_string()
    } else if diff < HOUR {
        format!("{}m ago", (diff / MINUTE).floor() as u64)
    } else if diff < DAY {
        format!("{}h ago", (diff / HOUR).floor() as u64)
    } else if diff < MONTH {
        format!("{}d ago", (diff / DAY).floor() as u64)
    } else if diff < YEAR {
        format!("{}mo ago", (diff / MONTH).floor() as u64)
    } else {
        format!("{}y ago", (diff / YEAR).floor() as u64)
    }
}

/// Current Unix time in seconds.
pub fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Cuts text to at most `max_chars` characters.
///
/// Appends [`ELLIPSIS`] only when characters were dropped, so the result
/// without its marker is always a prefix of the input.
pub fn truncate_brief(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            let mut brief = text[..cut].to_string();
            brief.push(ELLIPSIS);
            brief
        }
        None => text.to_string(),
    }
}

/// Returns string field, treating null and non-strings as absent.
pub(crate) fn opt_str(obj: &Value, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Returns string field or a malformed-input error naming the field.
pub(crate) fn req_str(obj: &Value, key: &str) -> Result<String> {
    opt_str(obj, key).ok_or_else(|| Error::missing(key))
}

pub(crate) fn opt_bool(obj: &Value, key: &str) -> bool {
    obj.get(key).and_then(Value::as_bool).unwrap_or(false)
}

pub(crate) fn opt_i64(obj: &Value, key: &str) -> Option<i64> {
    obj.get(key).and_then(Value::as_i64)
}

pub(crate) fn opt_u64(obj: &Value, key: &str) -> Option<u64> {
    obj.get(key).and_then(Value::as_u64)
}

pub(crate) fn opt_f64(obj: &Value, key: &str) -> Option<f64> {
    obj.get(key).and_then(Value::as_f64)
}

/// Returns nested value when it is a JSON object.
pub(crate) fn opt_object<'a>(obj: &'a Value, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| v.is_object())
}

/// Returns a field kept as an opaque blob, dropping explicit nulls.
pub(crate) fn opt_blob(obj: &Value, key: &str) -> Option<Value> {
    obj.get(key).filter(|v| !v.is_null()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NOW: f64 = 1_700_000_000.0;

    #[test]
    fn test_relative_time_buckets() {
        assert_eq!(format_relative_time_at(Some(NOW - 30.0), NOW), "just now");
        assert_eq!(format_relative_time_at(Some(NOW - 120.0), NOW), "2m ago");
        assert_eq!(format_relative_time_at(Some(NOW - 7_200.0), NOW), "2h ago");
        assert_eq!(format_relative_time_at(Some(NOW - 172_800.0), NOW), "2d ago");
        assert_eq!(
            format_relative_time_at(Some(NOW - 90.0 * DAY), NOW),
            "3mo ago"
        );
        assert_eq!(
            format_relative_time_at(Some(NOW - 2.0 * YEAR), NOW),
            "2y ago"
        );
    }

    #[test]
    fn test_relative_time_boundaries() {
        assert_eq!(format_relative_time_at(Some(NOW - 59.9), NOW), "just now");
        assert_eq!(format_relative_time_at(Some(NOW - 60.0), NOW), "1m ago");
        assert_eq!(format_relative_time_at(Some(NOW - 3_599.0), NOW), "59m ago");
        assert_eq!(format_relative_time_at(Some(NOW - 86_399.0), NOW), "23h ago");
        assert_eq!(format_relative_time_at(Some(NOW - 29.0 * DAY), NOW), "29d ago");
        assert_eq!(format_relative_time_at(Some(NOW - 30.0 * DAY), NOW), "1mo ago");
    }

    #[test]
    fn test_relative_time_absent_or_zero() {
        assert_eq!(format_relative_time_at(None, NOW), "");
        assert_eq!(format_relative_time_at(Some(0.0), NOW), "");
        assert_eq!(format_relative_time(None), "");
    }

    #[test]
    fn test_relative_time_future_is_just_now() {
        assert_eq!(format_relative_time_at(Some(NOW + 500.0), NOW), "just now");
    }

    #[test]
    fn test_truncate_brief_short_text_untouched() {
        // Arrange & Act
        let brief = truncate_brief("short body", 150);

        // Assert
        assert_eq!(brief, "short body");
    }

    #[test]
    fn test_truncate_brief_counts_characters() {
        // Arrange
        let text = "héllo wörld";

        // Act
        let brief = truncate_brief(text, 4);

        // Assert
        assert_eq!(brief, "héll…");
        assert!(text.starts_with(brief.trim_end_matches(ELLIPSIS)));
    }

    #[test]
    fn test_truncate_brief_exact_length() {
        assert_eq!(truncate_brief("abcd", 4), "abcd");
        assert_eq!(truncate_brief("", 4), "");
    }

    #[test]
    fn test_json_accessors_default_on_wrong_types() {
        // Arrange
        let obj = json!({
            "title": "hello",
            "score": "12",
            "over_18": null,
            "ratio": 0.97,
            "media": null,
            "preview": {"enabled": true}
        });

        // Act & Assert
        assert_eq!(opt_str(&obj, "title").as_deref(), Some("hello"));
        assert_eq!(opt_i64(&obj, "score"), None);
        assert!(!opt_bool(&obj, "over_18"));
        assert_eq!(opt_f64(&obj, "ratio"), Some(0.97));
        assert!(opt_blob(&obj, "media").is_none());
        assert!(opt_object(&obj, "preview").is_some());
        assert!(req_str(&obj, "missing").is_err());
    }
}
