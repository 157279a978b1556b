//! # Component Details Records
//!
//! A record is an opaque JSON object describing one component. The only
//! structure this crate reads from it is the display label.

use serde_json::{Map, Value};

/// A component details record: string keys to heterogeneous values.
pub type Record = Map<String, Value>;

/// Human-readable name of the component a record describes.
///
/// Taken from `name`, falling back to `id`, falling back to `unknown`.
/// Used in diagnostic text only; it never influences a verdict.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentLabel(String);

impl ComponentLabel {
    /// Label used when a record carries neither `name` nor `id`.
    pub const UNKNOWN: &'static str = "unknown";

    /// Derive the label for `record`.
    ///
    /// String values are used bare; any other value is rendered as compact
    /// JSON so that `{"id": 42}` is labelled `42`.
    pub fn of(record: &Record) -> Self {
        match record.get("name").or_else(|| record.get("id")) {
            Some(Value::String(s)) => Self(s.clone()),
            Some(other) => Self(other.to_string()),
            None => Self(Self::UNKNOWN.to_string()),
        }
    }

    /// Access the label text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ComponentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
