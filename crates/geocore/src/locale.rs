//! Locales and translation of per-language upstream values.
//!
//! geoCore returns some text fields either as plain strings or as objects
//! keyed by language (`{"en": "...", "fr": "..."}`). A [`Translator`] picks
//! the best match for the caller's locale.

use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// A language with an optional territory (e.g., `en`, `fr-CA`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    language: String,
    territory: Option<String>,
}

impl Locale {
    pub fn new(language: impl Into<String>, territory: Option<String>) -> Self {
        Self {
            language: language.into().to_ascii_lowercase(),
            territory: territory.map(|t| t.to_ascii_uppercase()),
        }
    }

    /// Parse a tag such as `en`, `en-CA` or `fr_ca`.
    ///
    /// Returns `None` for empty or non-alphabetic language parts.
    pub fn parse(tag: &str) -> Option<Self> {
        let mut parts = tag.trim().split(|c: char| c == '-' || c == '_');
        let language = parts.next().filter(|l| is_alpha(l, 2..=3))?;
        let territory = match parts.next() {
            Some(t) if is_alpha(t, 2..=3) => Some(t.to_string()),
            Some(_) => return None,
            None => None,
        };
        Some(Self::new(language, territory))
    }

    /// ISO 639-1 language code, as geoCore expects for its `lang` parameter.
    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn territory(&self) -> Option<&str> {
        self.territory.as_deref()
    }
}

fn is_alpha(part: &str, len: std::ops::RangeInclusive<usize>) -> bool {
    len.contains(&part.len()) && part.chars().all(|c| c.is_ascii_alphabetic())
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.territory {
            Some(territory) => write!(f, "{}-{}", self.language, territory),
            None => write!(f, "{}", self.language),
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::parse(s).ok_or_else(|| format!("invalid locale tag: {}", s))
    }
}

/// Resolves localized upstream values.
pub trait Translator: Send + Sync {
    /// Pick the best string for `locale` out of a plain or per-language value.
    fn translate(&self, value: &Value, locale: Option<&Locale>) -> Option<String>;

    /// Canonical tag for a locale.
    fn locale_tag(&self, locale: &Locale) -> String {
        locale.to_string()
    }
}

/// Default translator: exact tag, then language, then the first entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTranslator;

impl Translator for DefaultTranslator {
    fn translate(&self, value: &Value, locale: Option<&Locale>) -> Option<String> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            Value::Object(map) => {
                let candidates: Vec<(Option<Locale>, &Value)> = map
                    .iter()
                    .map(|(key, v)| (Locale::parse(key), v))
                    .collect();

                let chosen = locale
                    .and_then(|wanted| {
                        candidates
                            .iter()
                            .find(|(l, _)| l.as_ref() == Some(wanted))
                            .or_else(|| {
                                candidates.iter().find(|(l, _)| {
                                    l.as_ref().map(Locale::language) == Some(wanted.language())
                                })
                            })
                    })
                    .or_else(|| candidates.first())?;

                self.translate(chosen.1, None)
            }
            other => Some(other.to_string()),
        }
    }
}
