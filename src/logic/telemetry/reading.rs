//! Sensor Reading & Feed Normalization
//!
//! Wire format of the telemetry channel and the canonical `Reading` it is
//! normalized into. Field mapping is fixed for wire compatibility:
//!
//! | feed field | reading field     |
//! |------------|-------------------|
//! | `field1`   | `amplitude`       |
//! | `field2`   | `flame_detected`  |
//! | `field3`   | `motion_detected` |
//! | `field4`   | `pattern_id`      |

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::client::FetchError;

// ============================================================================
// CANONICAL READING
// ============================================================================

/// One normalized sensor sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Source timestamp, kept verbatim (ISO-8601 or source-native)
    pub timestamp: String,
    /// Sound amplitude, always >= 0
    pub amplitude: f64,
    /// Discrete acoustic pattern identifier
    pub pattern_id: u32,
    pub flame_detected: bool,
    pub motion_detected: bool,
}

impl Reading {
    /// Build a reading, clamping a negative or non-finite amplitude to 0
    pub fn new(
        timestamp: impl Into<String>,
        amplitude: f64,
        pattern_id: u32,
        flame_detected: bool,
        motion_detected: bool,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            amplitude: sanitize_amplitude(amplitude),
            pattern_id,
            flame_detected,
            motion_detected,
        }
    }

    /// Normalize one feed entry. Lossy: an unparsable field degrades to its default.
    pub fn from_feed(entry: &FeedEntry) -> Self {
        Self::new(
            entry.created_at.clone().unwrap_or_default(),
            numeric_field(entry.field1.as_ref()),
            pattern_field(entry.field4.as_ref()),
            flag_field(entry.field2.as_ref()),
            flag_field(entry.field3.as_ref()),
        )
    }
}

// ============================================================================
// WIRE FORMAT
// ============================================================================

/// Channel feed response (`feeds.json`)
#[derive(Debug, Deserialize)]
pub struct FeedResponse {
    #[serde(default)]
    pub feeds: Vec<FeedEntry>,
}

/// One feed entry. Field values arrive as strings, numbers or null.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedEntry {
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub field1: Option<Value>,
    #[serde(default)]
    pub field2: Option<Value>,
    #[serde(default)]
    pub field3: Option<Value>,
    #[serde(default)]
    pub field4: Option<Value>,
}

/// Parse a raw feed body into the first entry's reading
pub fn parse_feed_body(body: &[u8]) -> Result<Reading, FetchError> {
    let response: FeedResponse = serde_json::from_slice(body).map_err(|e| {
        log::debug!("Malformed feed body: {}", e);
        FetchError::NoFeed
    })?;

    response
        .feeds
        .first()
        .map(Reading::from_feed)
        .ok_or(FetchError::NoFeed)
}

// ============================================================================
// FIELD HELPERS
// ============================================================================

fn sanitize_amplitude(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Read a JSON value as a float; strings are trimmed and parsed
fn as_float(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

pub(crate) fn numeric_field(value: Option<&Value>) -> f64 {
    as_float(value).unwrap_or(0.0)
}

/// Pattern ids are integral; fractional values truncate toward zero
pub(crate) fn pattern_field(value: Option<&Value>) -> u32 {
    match as_float(value) {
        Some(v) if v >= 0.0 && v <= u32::MAX as f64 => v.trunc() as u32,
        _ => 0,
    }
}

/// Boolean-coded fields: JSON booleans as is, otherwise integral value 1 means true
pub(crate) fn flag_field(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        _ => as_float(value).map(|v| v.trunc() == 1.0).unwrap_or(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_first_feed_with_string_fields() {
        let body = json!({
            "channel": {"id": 1},
            "feeds": [{
                "created_at": "2024-03-01T10:00:00Z",
                "entry_id": 42,
                "field1": "850.5",
                "field2": "0",
                "field3": "1",
                "field4": "8"
            }]
        });

        let reading = parse_feed_body(body.to_string().as_bytes()).unwrap();
        assert_eq!(reading.timestamp, "2024-03-01T10:00:00Z");
        assert_eq!(reading.amplitude, 850.5);
        assert_eq!(reading.pattern_id, 8);
        assert!(!reading.flame_detected);
        assert!(reading.motion_detected);
    }

    #[test]
    fn empty_feeds_is_no_feed() {
        let body = br#"{"feeds": []}"#;
        assert_eq!(parse_feed_body(body), Err(FetchError::NoFeed));
    }

    #[test]
    fn malformed_body_is_no_feed() {
        assert_eq!(parse_feed_body(b"<html>oops</html>"), Err(FetchError::NoFeed));
        assert_eq!(parse_feed_body(br#"{"feeds": [7]}"#), Err(FetchError::NoFeed));
    }

    #[test]
    fn missing_and_garbage_fields_degrade_to_defaults() {
        let body = json!({
            "feeds": [{
                "field1": "loud",
                "field2": null,
                "field4": "-3"
            }]
        });

        let reading = parse_feed_body(body.to_string().as_bytes()).unwrap();
        assert_eq!(reading.timestamp, "");
        assert_eq!(reading.amplitude, 0.0);
        assert_eq!(reading.pattern_id, 0);
        assert!(!reading.flame_detected);
        assert!(!reading.motion_detected);
    }

    #[test]
    fn numeric_json_values_are_accepted() {
        let body = json!({
            "feeds": [{"field1": 612, "field2": 1, "field3": "1.0", "field4": 9.7}]
        });

        let reading = parse_feed_body(body.to_string().as_bytes()).unwrap();
        assert_eq!(reading.amplitude, 612.0);
        assert_eq!(reading.pattern_id, 9);
        assert!(reading.flame_detected);
        assert!(reading.motion_detected);
    }

    #[test]
    fn flag_only_true_for_one() {
        assert!(!flag_field(Some(&json!("2"))));
        assert!(!flag_field(Some(&json!("yes"))));
        assert!(flag_field(Some(&json!(" 1 "))));
    }

    #[test]
    fn negative_amplitude_is_clamped() {
        let reading = Reading::new("t", -12.0, 1, false, false);
        assert_eq!(reading.amplitude, 0.0);
    }

    #[test]
    fn flag_field_accepts_booleans_and_codes() {
        assert!(flag_field(Some(&json!(true))));
        assert!(!flag_field(Some(&json!(false))));
        assert!(flag_field(Some(&json!(1))));
        assert!(flag_field(Some(&json!("1"))));
        assert!(!flag_field(Some(&json!("0"))));
        assert!(!flag_field(None));
    }
}
