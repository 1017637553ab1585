//! Queryable field registry.
//!
//! Queryables describe the extra search fields a provider accepts. The
//! registry is hand-authored in configuration; nothing here is derived
//! from the upstream catalogue.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single searchable field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Queryable {
    /// Value type (e.g., "string", "integer").
    #[serde(rename = "type", default = "default_type")]
    pub type_: String,

    /// Separator for multi-valued fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,

    /// Allowed values, if the field is an enumeration.
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_: Option<Vec<String>>,
}

fn default_type() -> String {
    "string".to_string()
}

impl Default for Queryable {
    fn default() -> Self {
        Self::new(default_type())
    }
}

impl Queryable {
    /// Create a queryable of the given type.
    pub fn new(type_: impl Into<String>) -> Self {
        Self {
            type_: type_.into(),
            separator: None,
            enum_: None,
        }
    }

    /// Set the multi-value separator.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    /// Restrict the field to a set of values.
    pub fn with_enum<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_ = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Split a raw value on the separator (or return it whole).
    pub fn split_value<'a>(&self, value: &'a str) -> Vec<&'a str> {
        match self.separator.as_deref() {
            Some(sep) if !sep.is_empty() => value
                .split(sep)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .collect(),
            _ => vec![value.trim()],
        }
    }

    /// Check every part of `value` against the enumeration, if any.
    pub fn accepts(&self, value: &str) -> bool {
        match &self.enum_ {
            Some(allowed) => self
                .split_value(value)
                .iter()
                .all(|v| allowed.iter().any(|a| a == v)),
            None => true,
        }
    }
}

/// Registry of queryables keyed by field name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct Queryables(BTreeMap<String, Queryable>);

impl Queryables {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a queryable (builder pattern).
    pub fn with(mut self, name: impl Into<String>, queryable: Queryable) -> Self {
        self.0.insert(name.into(), queryable);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Queryable> {
        self.0.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Field names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}
