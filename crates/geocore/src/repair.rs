//! Repair of geoCore response bodies.
//!
//! geoCore serializes some array and object fields (`options`, sometimes
//! `coordinates`) as JSON text embedded in a string, with the inner quotes
//! doubled. Depending on the upstream deployment the doubled quotes are
//! either backslash-escaped:
//!
//! ```text
//! "options":"\"\"[{\"\"url\"\":\"\"https://...\"\"}]\"\""
//! ```
//!
//! or left bare, which is not even a valid string literal:
//!
//! ```text
//! "options":"""[{""url"":""https://...""}]"""
//! ```
//!
//! Repair replaces such spans with the embedded JSON so the whole body can
//! be handed to `serde_json`. Text outside the spans is never touched, and a
//! span is only replaced when its decoded content parses as a JSON array or
//! object, so repairing an already clean body returns it unchanged.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use tracing::trace;

/// How embedded JSON spans are located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepairStrategy {
    /// Walk the string literals of the body and decode quirky ones in place.
    #[default]
    Scan,
    /// Pattern match backslash-escaped doubled quotes.
    Posix,
    /// Pattern match bare doubled quotes.
    Windows,
}

impl RepairStrategy {
    /// Repair `body`, borrowing it when nothing needed fixing.
    pub fn repair<'a>(&self, body: &'a str) -> Cow<'a, str> {
        match self {
            RepairStrategy::Scan => repair_scan(body),
            RepairStrategy::Posix => POSIX_PATTERN.replace_all(body, |caps: &Captures| {
                unescape_pattern_span(&caps[0], true)
            }),
            RepairStrategy::Windows => WINDOWS_PATTERN.replace_all(body, |caps: &Captures| {
                unescape_pattern_span(&caps[0], false)
            }),
        }
    }
}

// Non-greedy like the upstream client the patterns were captured from; a
// span ends at the first closing marker.
static POSIX_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""\\"\\".+?\\"\\"""#).expect("posix repair pattern should be valid")
});

static WINDOWS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"""".+?""""#).expect("windows repair pattern should be valid"));

/// Unescape a span matched by one of the patterns.
fn unescape_pattern_span(span: &str, strip_backslashes: bool) -> String {
    let mut unescaped = decode_backslash_escapes(span);
    if strip_backslashes {
        unescaped.retain(|c| c != '\\');
    }
    unescaped.replace("\"\"", "\"").trim_matches('"').to_string()
}

/// Decode the common backslash escapes, leaving unknown ones as they are.
fn decode_backslash_escapes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

const ESCAPED_OPEN: &str = r#""\"\""#;
const BARE_MARKER: &str = r#"""""#;

/// Repair by scanning string literals.
///
/// Only positions where a string literal opens are inspected, so quotes
/// inside regular strings can never start a span.
pub fn repair_scan(body: &str) -> Cow<'_, str> {
    let bytes = body.as_bytes();
    let mut repaired: Option<String> = None;
    let mut copied_to = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'"' {
            i += 1;
            continue;
        }

        let literal_end = skip_string(bytes, i);
        let span = if body[i..].starts_with(BARE_MARKER) {
            decode_bare_span(body, i)
        } else if body[i..literal_end].starts_with(ESCAPED_OPEN) {
            decode_escaped_literal(&body[i..literal_end]).map(|json| (literal_end, json))
        } else {
            None
        };

        match span {
            Some((end, json)) => {
                trace!(offset = i, length = end - i, "repaired embedded JSON");
                let out = repaired.get_or_insert_with(|| String::with_capacity(body.len()));
                out.push_str(&body[copied_to..i]);
                out.push_str(&json);
                copied_to = end;
                i = end;
            }
            None => i = literal_end,
        }
    }

    match repaired {
        Some(mut out) => {
            out.push_str(&body[copied_to..]);
            Cow::Owned(out)
        }
        None => Cow::Borrowed(body),
    }
}

/// Index just past the string literal opening at `start`.
fn skip_string(bytes: &[u8], start: usize) -> usize {
    let mut j = start + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'"' => return j + 1,
            _ => j += 1,
        }
    }
    bytes.len()
}

/// Decode a well-formed literal whose value is `""<json with doubled quotes>""`.
fn decode_escaped_literal(literal: &str) -> Option<String> {
    let value: String = serde_json::from_str(literal).ok()?;
    if value.len() < 4 || !value.starts_with("\"\"") || !value.ends_with("\"\"") {
        return None;
    }

    let undoubled = value.replace("\"\"", "\"");
    let candidate = undoubled.trim_matches('"');
    if is_structured_json(candidate) {
        return Some(candidate.to_string());
    }

    // Some revisions leave stray backslashes in the embedded text.
    let stripped: String = candidate.chars().filter(|c| *c != '\\').collect();
    is_structured_json(&stripped).then_some(stripped)
}

/// Decode a `"""<json with doubled quotes>"""` span starting at `start`.
///
/// An empty inner string (`""""`) also contains the closing marker, so every
/// marker up to the end of the line is tried until one closes a span that
/// decodes to an array or object.
fn decode_bare_span(body: &str, start: usize) -> Option<(usize, String)> {
    let open = start + BARE_MARKER.len();
    let line_end = body[open..].find('\n').map_or(body.len(), |n| open + n);

    let mut from = open;
    while let Some(offset) = body[from..line_end].find(BARE_MARKER) {
        let close = from + offset;
        let inner = &body[open..close];
        if !inner.is_empty() {
            let candidate = inner.replace("\"\"", "\"");
            if is_structured_json(&candidate) {
                return Some((close + BARE_MARKER.len(), candidate));
            }
        }
        from = close + 1;
    }
    None
}

fn is_structured_json(candidate: &str) -> bool {
    let trimmed = candidate.trim_start();
    if !(trimmed.starts_with('[') || trimmed.starts_with('{')) {
        return false;
    }
    matches!(
        serde_json::from_str::<Value>(candidate),
        Ok(Value::Array(_)) | Ok(Value::Object(_))
    )
}
