//! # Type Tags and Value Kinds
//!
//! `TypeTag` is what a schema declares for a field. `ValueKind` is what a
//! record value actually is at runtime. A value conforms to a field when
//! `ValueKind::of(value) == tag.kind()`.
//!
//! Schema files that use the `str`/`int`/`bool`/`list`/`dict` spellings are
//! accepted: those are aliases normalised to the canonical tag on parse. The
//! canonical spelling is always what gets serialized and displayed.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::UnknownTypeTag;

/// The expected type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// UTF-8 string.
    String,
    /// Integral number that fits `i64` or `u64`.
    ///
    /// Wider integer literals are parsed as `f64` and classify as
    /// [`ValueKind::Float`], so they never satisfy this tag.
    Integer,
    /// `true` or `false`.
    Boolean,
    /// Sequence of arbitrary values.
    Array,
    /// Mapping with string keys.
    Object,
}

impl TypeTag {
    /// Returns all tags in canonical order.
    pub fn all_tags() -> &'static [TypeTag] {
        &[
            Self::String,
            Self::Integer,
            Self::Boolean,
            Self::Array,
            Self::Object,
        ]
    }

    /// Returns the canonical spelling of this tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }

    /// Returns the runtime kind a value must have to satisfy this tag.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::String => ValueKind::String,
            Self::Integer => ValueKind::Integer,
            Self::Boolean => ValueKind::Boolean,
            Self::Array => ValueKind::Array,
            Self::Object => ValueKind::Object,
        }
    }

    /// Returns the value substituted for an absent field of this type.
    ///
    /// Depends on the tag alone: `""`, `0`, `false`, `[]`, `{}`.
    pub fn default_value(&self) -> Value {
        match self {
            Self::String => Value::String(String::new()),
            Self::Integer => Value::from(0),
            Self::Boolean => Value::Bool(false),
            Self::Array => Value::Array(Vec::new()),
            Self::Object => Value::Object(Map::new()),
        }
    }

    /// Returns true if `value` has exactly the kind this tag declares.
    pub fn matches(&self, value: &Value) -> bool {
        ValueKind::of(value) == self.kind()
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeTag {
    type Err = UnknownTypeTag;

    /// Parse a tag from its canonical spelling or an alias.
    ///
    /// Matching is case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" | "str" => Ok(Self::String),
            "integer" | "int" => Ok(Self::Integer),
            "boolean" | "bool" => Ok(Self::Boolean),
            "array" | "list" => Ok(Self::Array),
            "object" | "dict" => Ok(Self::Object),
            other => Err(UnknownTypeTag(other.to_string())),
        }
    }
}

impl Serialize for TypeTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The runtime kind of a JSON value.
///
/// `Null` and `Float` have no corresponding `TypeTag`; a value of either kind
/// never satisfies a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// JSON `null`.
    Null,
    /// JSON `true` / `false`.
    Boolean,
    /// A number representable as `i64` or `u64`.
    ///
    /// `serde_json` stores an integer literal beyond `u64::MAX` as `f64`, so
    /// `100000000000000000000` is a `Float`.
    Integer,
    /// Any other number.
    Float,
    /// JSON string.
    String,
    /// JSON array.
    Array,
    /// JSON object.
    Object,
}

impl ValueKind {
    /// Classify a value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(n) if n.is_i64() || n.is_u64() => Self::Integer,
            Value::Number(_) => Self::Float,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    /// Returns the lowercase name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
