//! Small utility helpers for encoding, JSON extraction, and time formatting.
//!
//! The functions in this module are intentionally lightweight and
//! dependency-free to keep hot paths fast. They are used by networking,
//! normalization, and persistence code.

pub mod config;

use serde_json::Value;
use std::fmt::Write;

/// What: Percent-encode a string for use in URLs according to RFC 3986.
///
/// Inputs:
/// - `input`: String to encode.
///
/// Output:
/// - Returns a percent-encoded string where reserved characters are escaped.
///
/// Details:
/// - Unreserved characters as per RFC 3986 (`A-Z`, `a-z`, `0-9`, `-`, `.`, `_`, `~`) are left as-is.
/// - Space is encoded as `%20` (not `+`).
/// - All other bytes are encoded as two uppercase hexadecimal digits prefixed by `%`.
#[must_use]
pub fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for &b in input.as_bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(b as char);
            }
            b' ' => out.push_str("%20"),
            _ => {
                out.push('%');
                let _ = write!(out, "{b:02X}");
            }
        }
    }
    out
}

/// What: Extract a string value from a JSON object by key, defaulting to empty string.
///
/// Inputs:
/// - `v`: JSON value to extract from.
/// - `key`: Key to look up in the JSON object.
///
/// Output:
/// - Returns the string value if found, or an empty string if the key is missing or not a string.
#[must_use]
pub fn s(v: &Value, key: &str) -> String {
    v.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

/// What: Extract the first available string from a list of candidate keys.
///
/// Inputs:
/// - `v`: JSON value to extract from.
/// - `keys`: Array of candidate keys to try in order.
///
/// Output:
/// - Returns `Some(String)` for the first key that maps to a JSON string, or `None` if none match.
#[must_use]
pub fn ss(v: &Value, keys: &[&str]) -> Option<String> {
    for k in keys {
        if let Some(s) = v.get(*k).and_then(|x| x.as_str()) {
            return Some(s.to_owned());
        }
    }
    None
}

/// What: Extract a float by key, accepting both JSON numbers and numeric strings.
///
/// Inputs:
/// - `v`: JSON value to extract from.
/// - `key`: Key to look up.
///
/// Output:
/// - `Some(f64)` when the value is a number or a parseable numeric string; `None` otherwise.
///
/// Details:
/// - Backends serialize decimals inconsistently (numbers vs. strings); both
///   shapes must normalize identically.
#[must_use]
pub fn f64_of(v: &Value, key: &str) -> Option<f64> {
    match v.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// What: Extract a signed integer by key, accepting numbers and numeric strings.
#[must_use]
pub fn i64_of(v: &Value, key: &str) -> Option<i64> {
    match v.get(key) {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// What: Extract an optional boolean by key.
///
/// Output:
/// - `Some(bool)` when the value is a JSON boolean; `None` for null, missing,
///   or any other type. Absence is deliberately distinct from `false`.
#[must_use]
pub fn bool_of(v: &Value, key: &str) -> Option<bool> {
    v.get(key).and_then(Value::as_bool)
}

/// What: Extract an array of strings by key, filtering out non-string elements.
#[must_use]
pub fn str_arr(v: &Value, key: &str) -> Option<Vec<String>> {
    v.get(key).and_then(Value::as_array).map(|arr| {
        arr.iter()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect()
    })
}

/// What: Format a UNIX timestamp (seconds) as `YYYY-MM-DD HH:MM:SS`.
///
/// Inputs:
/// - `secs`: Optional seconds since the epoch.
///
/// Output:
/// - Formatted local-naive string, or empty string when `secs` is `None` or
///   out of chrono's representable range.
#[must_use]
pub fn ts_to_date(secs: Option<i64>) -> String {
    secs.and_then(|t| chrono::DateTime::from_timestamp(t, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}
