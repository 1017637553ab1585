//! Normalization of loosely formatted upstream values.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;

// YYYY[-MM[-DD[(T| )HH[:MM[:SS]]]]], separators optional, matched at the start.
static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{4})-?([0-9]{0,2})-?([0-9]{0,2})[T| ]?([0-9]{0,2}):?([0-9]{0,2}):?([0-9]{0,2})")
        .expect("date pattern should be valid")
});

/// Turn a loosely formatted date into `YYYY-MM-DDTHH:MM:SSZ`.
///
/// Missing month and day default to 1, missing time parts to 0. Anything
/// that does not match, is out of range, or lands on year 1 (geoCore's
/// placeholder for "no date") yields `None`. The `Z` is a fixed suffix;
/// no timezone conversion happens.
pub fn as_iso_date(value: &str) -> Option<String> {
    let caps = DATE_PATTERN.captures(value)?;
    let part = |idx: usize, default: u32| -> Option<u32> {
        match caps.get(idx).map(|m| m.as_str()) {
            Some(s) if !s.is_empty() => s.parse().ok(),
            _ => Some(default),
        }
    };

    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    if year <= 1 {
        return None;
    }

    let datetime = NaiveDate::from_ymd_opt(year, part(2, 1)?, part(3, 1)?)?.and_hms_opt(
        part(4, 0)?,
        part(5, 0)?,
        part(6, 0)?,
    )?;

    Some(datetime.format("%Y-%m-%dT%H:%M:%SZ").to_string())
}

/// [`as_iso_date`] for an optional JSON value; non-strings yield `None`.
pub fn value_as_iso_date(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).and_then(as_iso_date)
}

/// Split a `delim`-separated string into trimmed, non-empty parts.
pub fn as_list(value: &str, delim: char) -> Vec<String> {
    value
        .split(delim)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect()
}

/// Keywords arrive as a comma separated string; arrays are accepted as-is.
pub fn value_as_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) => as_list(s, ','),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

/// Parse a `{key=value, key=value}` string into a map.
///
/// Items without `pair_delim` are ignored; only the first two parts of an
/// item are used.
pub fn as_dict(value: &str, item_delim: char, pair_delim: char) -> BTreeMap<String, String> {
    if !value.contains(pair_delim) {
        return BTreeMap::new();
    }

    value
        .trim_matches(|c: char| c == '{' || c == '}')
        .split(item_delim)
        .filter_map(|item| {
            let mut parts = item.split(pair_delim);
            let key = parts.next()?.trim();
            let val = parts.next()?.trim();
            Some((key.to_string(), val.to_string()))
        })
        .collect()
}
