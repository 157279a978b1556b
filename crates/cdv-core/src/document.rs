//! # Document Loading
//!
//! Reads schema and record documents from disk. The format is chosen from
//! the file extension: `.yaml`/`.yml` are parsed as YAML, everything else as
//! JSON. YAML documents are converted to the equivalent `serde_json::Value`
//! tree so the rest of the workspace handles one value model.

use std::path::Path;

use serde_json::{Map, Number, Value};

use crate::error::CdvError;
use crate::record::Record;
use crate::types::ValueKind;

/// On-disk encoding of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// JSON text.
    Json,
    /// YAML text (JSON-compatible subset).
    Yaml,
}

impl DocumentFormat {
    /// Pick the format for `path` from its extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// Read and parse the document at `path`.
///
/// # Errors
///
/// Returns `CdvError::DocumentLoad` if the file cannot be read or is not
/// well-formed in its format.
pub fn load_document(path: &Path) -> Result<Value, CdvError> {
    let content = std::fs::read_to_string(path).map_err(|e| CdvError::DocumentLoad {
        path: path.display().to_string(),
        reason: format!("cannot read file: {e}"),
    })?;

    parse_document(&content, DocumentFormat::from_path(path)).map_err(|reason| {
        CdvError::DocumentLoad {
            path: path.display().to_string(),
            reason,
        }
    })
}

/// Read the document at `path` and require its top level to be an object.
///
/// # Errors
///
/// Returns `CdvError::DocumentLoad` as [`load_document`] does, and
/// `CdvError::NotARecord` when the document is not an object.
pub fn load_record(path: &Path) -> Result<Record, CdvError> {
    match load_document(path)? {
        Value::Object(map) => Ok(map),
        other => Err(CdvError::NotARecord {
            path: path.display().to_string(),
            actual: ValueKind::of(&other),
        }),
    }
}

/// Parse document text in the given format.
pub fn parse_document(content: &str, format: DocumentFormat) -> Result<Value, String> {
    match format {
        DocumentFormat::Json => {
            serde_json::from_str(content).map_err(|e| format!("invalid JSON: {e}"))
        }
        DocumentFormat::Yaml => {
            let yaml: serde_yaml::Value =
                serde_yaml::from_str(content).map_err(|e| format!("invalid YAML: {e}"))?;
            yaml_into_json(yaml, &mut Vec::new())
        }
    }
}

/// Move a parsed YAML tree into the JSON value model.
///
/// Tags are dropped. Scalar mapping keys take their string form. `path`
/// holds the keys walked so far, so an error names the offending entry.
fn yaml_into_json(yaml: serde_yaml::Value, path: &mut Vec<String>) -> Result<Value, String> {
    use serde_yaml::Value as Yaml;

    let value = match yaml {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => yaml_number(&n)
            .ok_or_else(|| format!("{}: number {n} has no JSON form", pointer(path)))?,
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => {
            let mut out = Vec::with_capacity(items.len());
            for (index, item) in items.into_iter().enumerate() {
                path.push(index.to_string());
                out.push(yaml_into_json(item, path)?);
                path.pop();
            }
            Value::Array(out)
        }
        Yaml::Mapping(entries) => {
            let mut out = Map::with_capacity(entries.len());
            for (key, item) in entries {
                let key = yaml_key(key)
                    .ok_or_else(|| format!("{}: mapping keys must be scalars", pointer(path)))?;
                path.push(key.clone());
                let item = yaml_into_json(item, path)?;
                path.pop();
                out.insert(key, item);
            }
            Value::Object(out)
        }
        Yaml::Tagged(tagged) => yaml_into_json(tagged.value, path)?,
    };
    Ok(value)
}

fn yaml_number(n: &serde_yaml::Number) -> Option<Value> {
    n.as_i64()
        .map(Value::from)
        .or_else(|| n.as_u64().map(Value::from))
        .or_else(|| n.as_f64().and_then(Number::from_f64).map(Value::Number))
}

fn yaml_key(key: serde_yaml::Value) -> Option<String> {
    match key {
        serde_yaml::Value::String(s) => Some(s),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn pointer(path: &[String]) -> String {
    if path.is_empty() {
        "(root)".to_string()
    } else {
        format!("/{}", path.join("/"))
    }
}
