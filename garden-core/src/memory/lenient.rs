//! Forgiving deserializers for loosely-typed and legacy records.
//!
//! Historical records carry numbers as strings, blank actions, and
//! timestamps in several formats. These helpers never fail on a bad value;
//! they fall back to the documented default instead.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::action::{normalize, Action};

/// Read a float from a number or a numeric string. NaN and infinities are rejected.
pub fn as_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Clamp into `[0, 1]`, or `default` when absent or invalid.
pub fn unit_or(value: Option<&Value>, default: f64) -> f64 {
    value
        .and_then(as_f64)
        .map(|v| v.clamp(0.0, 1.0))
        .unwrap_or(default)
}

/// Clamp into `[-1, 1]`, or `default` when absent or invalid.
pub fn signed_unit_or(value: Option<&Value>, default: f64) -> f64 {
    value
        .and_then(as_f64)
        .map(|v| v.clamp(-1.0, 1.0))
        .unwrap_or(default)
}

/// Parse RFC 3339 or a bare `YYYY-MM-DD` date.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub(crate) fn relevance<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(unit_or(Some(&value), crate::constants::DEFAULT_SCORE))
}

pub(crate) fn confidence<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(unit_or(Some(&value), crate::constants::DEFAULT_CONFIDENCE))
}

pub(crate) fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

pub(crate) fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        _ => false,
    })
}

/// Invalid timestamps become the Unix epoch, which reads as "very stale".
pub(crate) fn timestamp<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(value
        .as_str()
        .and_then(parse_timestamp)
        .unwrap_or_default())
}

/// Absent, null, or blank means "not set"; anything else is normalized.
pub(crate) fn optional_action<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<Action>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(match value {
        Value::Null => None,
        Value::String(ref s) if s.trim().is_empty() => None,
        Value::String(ref s) => Some(normalize(Some(s))),
        _ => Some(Action::Keep),
    })
}

pub(crate) fn size<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(as_f64(&value)
        .filter(|v| *v >= 0.0)
        .map(|v| v as u64)
        .unwrap_or(0))
}

pub(crate) fn optional_u64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(as_f64(&value).filter(|v| *v >= 0.0).map(|v| v as u64))
}

pub(crate) fn optional_text<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

pub(crate) fn string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_and_numeric_strings_parse() {
        assert_eq!(as_f64(&json!(0.25)), Some(0.25));
        assert_eq!(as_f64(&json!("0.75")), Some(0.75));
        assert_eq!(as_f64(&json!("high")), None);
        assert_eq!(as_f64(&json!(null)), None);
    }

    #[test]
    fn unit_clamps_and_defaults() {
        assert_eq!(unit_or(Some(&json!(1.7)), 0.5), 1.0);
        assert_eq!(unit_or(Some(&json!(-3)), 0.5), 0.0);
        assert_eq!(unit_or(Some(&json!("n/a")), 0.5), 0.5);
        assert_eq!(unit_or(None, 0.6), 0.6);
    }

    #[test]
    fn timestamps_accept_dates() {
        let ts = parse_timestamp("2021-06-01").unwrap();
        assert_eq!(ts.to_rfc3339(), "2021-06-01T00:00:00+00:00");
        assert!(parse_timestamp("2021-06-01T10:00:00.000Z").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
