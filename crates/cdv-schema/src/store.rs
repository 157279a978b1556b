//! # Schema Store
//!
//! Loads the named schemas component details are checked against and holds
//! them immutably for the life of the process.
//!
//! ## Schema Shapes
//!
//! - **Flat schemas** (every name except `features`, and always `base`):
//!   an object mapping field name to type tag.
//! - **Feature schemas** (`features`): an object mapping component type to a
//!   flat schema of feature name to type tag.
//!
//! Every document is checked against an embedded meta-schema for its shape
//! before its tags are parsed. Declared field order is preserved.
//!
//! ## Failure Policy
//!
//! Any problem with any source aborts the whole load. The validator never
//! runs against a partial store.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

use cdv_core::{load_document, TypeTag, ValueKind};
use jsonschema::Validator;
use serde_json::{json, Value};
use thiserror::Error;

/// Name of the schema every record is validated against.
pub const BASE_SCHEMA: &str = "base";

/// Name of the per-component-type feature schema set.
pub const FEATURES_SCHEMA: &str = "features";

/// File extensions tried, in order, when loading a schema from a directory.
const SCHEMA_EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

/// Error while loading schemas. Fatal at startup.
#[derive(Error, Debug)]
pub enum SchemaLoadError {
    /// A schema source file does not exist.
    #[error("schema '{name}' not found at {}", .path.display())]
    NotFound {
        /// Schema name.
        name: String,
        /// Path that was looked up.
        path: PathBuf,
    },

    /// A schema source could not be read or is not well-formed JSON/YAML.
    #[error("schema load error for '{name}': {reason}")]
    Malformed {
        /// Schema name.
        name: String,
        /// Reason the source could not be parsed.
        reason: String,
    },

    /// A schema document parsed but has the wrong shape.
    #[error("schema '{name}' has an invalid shape:\n{violations}")]
    MetaSchemaViolation {
        /// Schema name.
        name: String,
        /// Structured list of shape violations.
        violations: MetaSchemaViolations,
    },

    /// A field declares a type tag outside the supported set.
    #[error("schema '{schema}' field '{field}': {source}")]
    UnknownTypeTag {
        /// Schema name (`features.<type>` for feature schemas).
        schema: String,
        /// Field declaring the tag.
        field: String,
        /// The rejected tag.
        #[source]
        source: cdv_core::UnknownTypeTag,
    },

    /// Two sources were given the same name.
    #[error("schema '{name}' supplied more than once")]
    DuplicateSource {
        /// Repeated schema name.
        name: String,
    },

    /// No source named `base` was supplied.
    #[error("no 'base' schema supplied")]
    MissingBase,

    /// An embedded meta-schema failed to compile.
    #[error("meta-schema build error: {reason}")]
    MetaSchemaBuild {
        /// Compiler error message.
        reason: String,
    },
}

/// What a schema document's shape requires at some position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    /// A mapping: the document itself, or one component type's feature set.
    Object,
    /// A type tag string.
    TypeTag,
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object => f.write_str("an object"),
            Self::TypeTag => f.write_str("a type tag string"),
        }
    }
}

/// One entry of a schema document that breaks the document's shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Keys leading to the entry. Empty for the document itself, `[field]`
    /// in a flat schema, `[type]` or `[type, feature]` in the feature set.
    pub path: Vec<String>,
    /// What the shape requires at `path`.
    pub expected: Expectation,
    /// Kind of the value found there.
    pub found: ValueKind,
}

impl Violation {
    /// The offending field or component type, if the entry is not the root.
    pub fn field(&self) -> Option<&str> {
        self.path.last().map(String::as_str)
    }

    /// Tag to write instead, when a sample value was given where a tag
    /// belongs (`"enabled": false` suggests `"boolean"`).
    pub fn suggested_tag(&self) -> Option<TypeTag> {
        if self.expected != Expectation::TypeTag {
            return None;
        }
        TypeTag::all_tags()
            .iter()
            .copied()
            .find(|tag| tag.kind() == self.found)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str("  (root)")?;
        } else {
            write!(f, "  /{}", self.path.join("/"))?;
        }
        write!(f, ": expected {}, found {}", self.expected, self.found)?;
        if let Some(tag) = self.suggested_tag() {
            write!(f, " (did you mean \"{tag}\"?)")?;
        }
        Ok(())
    }
}

/// Every shape violation found in one schema document.
#[derive(Debug, Clone)]
pub struct MetaSchemaViolations {
    violations: Vec<Violation>,
}

impl MetaSchemaViolations {
    /// Number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// The violations in document order.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Offending fields, skipping a root violation.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.violations.iter().filter_map(Violation::field)
    }
}

impl fmt::Display for MetaSchemaViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self.violations.iter().map(ToString::to_string).collect();
        f.write_str(&lines.join("\n"))
    }
}

/// One declared field of a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name.
    pub name: String,
    /// Type the field's value must have.
    pub expected: TypeTag,
}

/// A flat schema: ordered field name to type tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    name: String,
    fields: Vec<FieldSpec>,
}

impl Schema {
    /// Build a schema from `(field, tag)` pairs in declaration order.
    ///
    /// A repeated field name keeps its first position and takes the last tag.
    pub fn new<I, S>(name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = (S, TypeTag)>,
        S: Into<String>,
    {
        let mut specs: Vec<FieldSpec> = Vec::new();
        for (field, expected) in fields {
            let field = field.into();
            match specs.iter_mut().find(|s| s.name == field) {
                Some(existing) => existing.expected = expected,
                None => specs.push(FieldSpec {
                    name: field,
                    expected,
                }),
            }
        }
        Self {
            name: name.into(),
            fields: specs,
        }
    }

    /// Parse a shape-checked flat schema document.
    fn from_document(name: &str, document: &Value) -> Result<Self, SchemaLoadError> {
        let object = document.as_object().ok_or_else(|| SchemaLoadError::Malformed {
            name: name.to_string(),
            reason: "schema document is not an object".into(),
        })?;

        let mut fields = Vec::with_capacity(object.len());
        for (field, tag) in object {
            let tag = tag.as_str().ok_or_else(|| SchemaLoadError::Malformed {
                name: name.to_string(),
                reason: format!("type tag for field '{field}' is not a string"),
            })?;
            let expected = tag
                .parse::<TypeTag>()
                .map_err(|source| SchemaLoadError::UnknownTypeTag {
                    schema: name.to_string(),
                    field: field.clone(),
                    source,
                })?;
            fields.push((field.clone(), expected));
        }

        Ok(Self::new(name, fields))
    }

    /// Schema name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared fields in order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Declared type of `field`, if the schema has it.
    pub fn get(&self, field: &str) -> Option<TypeTag> {
        self.fields
            .iter()
            .find(|s| s.name == field)
            .map(|s| s.expected)
    }

    /// Returns true if the schema declares `field`.
    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Declared field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|s| s.name.as_str())
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no fields are declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Feature schemas keyed by component type, in declared order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSchemas {
    by_type: Vec<Schema>,
}

impl FeatureSchemas {
    fn from_document(document: &Value) -> Result<Self, SchemaLoadError> {
        let object = document.as_object().ok_or_else(|| SchemaLoadError::Malformed {
            name: FEATURES_SCHEMA.to_string(),
            reason: "feature schema document is not an object".into(),
        })?;

        let by_type = object
            .iter()
            .map(|(component_type, features)| {
                Schema::from_document(&format!("{FEATURES_SCHEMA}.{component_type}"), features)
                    .map(|schema| Schema {
                        name: component_type.clone(),
                        fields: schema.fields,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { by_type })
    }

    /// Feature schema for `component_type`.
    pub fn get(&self, component_type: &str) -> Option<&Schema> {
        self.by_type.iter().find(|s| s.name == component_type)
    }

    /// Component types with a feature schema, in declared order.
    pub fn component_types(&self) -> impl Iterator<Item = &str> {
        self.by_type.iter().map(|s| s.name.as_str())
    }

    /// Number of component types.
    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    /// Returns true if no component type has a feature schema.
    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

/// Where a schema comes from.
#[derive(Debug, Clone)]
pub enum SchemaOrigin {
    /// A JSON or YAML file on disk.
    File(PathBuf),
    /// An already-parsed document.
    Document(Value),
}

/// A named schema source.
#[derive(Debug, Clone)]
pub struct SchemaSource {
    /// Schema name (`base`, `features`, or any other flat schema name).
    pub name: String,
    /// Document location or content.
    pub origin: SchemaOrigin,
}

impl SchemaSource {
    /// Source read from a file.
    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            origin: SchemaOrigin::File(path.into()),
        }
    }

    /// Source supplied as a parsed document.
    pub fn document(name: impl Into<String>, document: Value) -> Self {
        Self {
            name: name.into(),
            origin: SchemaOrigin::Document(document),
        }
    }

    fn read(self) -> Result<Value, SchemaLoadError> {
        match self.origin {
            SchemaOrigin::Document(document) => Ok(document),
            SchemaOrigin::File(path) => {
                if !path.is_file() {
                    return Err(SchemaLoadError::NotFound {
                        name: self.name,
                        path,
                    });
                }
                load_document(&path).map_err(|e| SchemaLoadError::Malformed {
                    name: self.name,
                    reason: e.to_string(),
                })
            }
        }
    }
}

/// Compiled meta-schemas for the two document shapes.
struct MetaSchemas {
    flat: Validator,
    features: Validator,
}

impl MetaSchemas {
    fn build() -> Result<Self, SchemaLoadError> {
        let flat = json!({
            "type": "object",
            "additionalProperties": { "type": "string" }
        });
        let features = json!({
            "type": "object",
            "additionalProperties": {
                "type": "object",
                "additionalProperties": { "type": "string" }
            }
        });
        Ok(Self {
            flat: compile(&flat)?,
            features: compile(&features)?,
        })
    }

    fn check(&self, name: &str, document: &Value) -> Result<(), SchemaLoadError> {
        let validator = if name == FEATURES_SCHEMA {
            &self.features
        } else {
            &self.flat
        };

        // Depth at which a tag string is required; anything shallower is a mapping.
        let tag_depth = if name == FEATURES_SCHEMA { 2 } else { 1 };
        let violations: Vec<Violation> = validator
            .iter_errors(document)
            .map(|e| {
                let pointer = e.instance_path.to_string();
                let path = pointer_segments(&pointer);
                let expected = if path.len() >= tag_depth {
                    Expectation::TypeTag
                } else {
                    Expectation::Object
                };
                let found = document
                    .pointer(&pointer)
                    .map_or(ValueKind::Null, ValueKind::of);
                Violation {
                    path,
                    expected,
                    found,
                }
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(SchemaLoadError::MetaSchemaViolation {
                name: name.to_string(),
                violations: MetaSchemaViolations { violations },
            })
        }
    }
}

/// Split a JSON Pointer into unescaped reference tokens.
fn pointer_segments(pointer: &str) -> Vec<String> {
    pointer
        .split('/')
        .skip(1)
        .map(|token| token.replace("~1", "/").replace("~0", "~"))
        .collect()
}

fn compile(schema: &Value) -> Result<Validator, SchemaLoadError> {
    let mut opts = jsonschema::options();
    opts.with_draft(jsonschema::Draft::Draft202012);
    opts.build(schema)
        .map_err(|e| SchemaLoadError::MetaSchemaBuild {
            reason: e.to_string(),
        })
}

/// Immutable set of loaded schemas.
///
/// `SchemaStore` is `Send + Sync` and is never mutated after [`load`]
/// returns.
///
/// [`load`]: SchemaStore::load
#[derive(Debug, Clone)]
pub struct SchemaStore {
    base: Schema,
    others: BTreeMap<String, Schema>,
    features: FeatureSchemas,
}

impl SchemaStore {
    /// Load every source. A `base` source is required; `features` is
    /// optional here and defaults to empty.
    ///
    /// # Errors
    ///
    /// Returns the first `SchemaLoadError` hit by any source.
    pub fn load<I>(sources: I) -> Result<Self, SchemaLoadError>
    where
        I: IntoIterator<Item = SchemaSource>,
    {
        let meta = MetaSchemas::build()?;
        let mut seen = HashSet::new();
        let mut flat = BTreeMap::new();
        let mut features = FeatureSchemas::default();

        for source in sources {
            let name = source.name.clone();
            if !seen.insert(name.clone()) {
                return Err(SchemaLoadError::DuplicateSource { name });
            }

            let document = source.read()?;
            meta.check(&name, &document)?;

            if name == FEATURES_SCHEMA {
                features = FeatureSchemas::from_document(&document)?;
                tracing::debug!(
                    schema = %name,
                    component_types = features.len(),
                    "loaded feature schemas"
                );
            } else {
                let schema = Schema::from_document(&name, &document)?;
                tracing::debug!(schema = %name, fields = schema.len(), "loaded schema");
                flat.insert(name, schema);
            }
        }

        let base = flat.remove(BASE_SCHEMA).ok_or(SchemaLoadError::MissingBase)?;

        Ok(Self {
            base,
            others: flat,
            features,
        })
    }

    /// Load `base` and `features` from `dir`.
    ///
    /// Each is looked up as `<name>.json`, `<name>.yaml`, then `<name>.yml`.
    /// Both must exist.
    ///
    /// # Errors
    ///
    /// Returns `SchemaLoadError::NotFound` if either document is absent, and
    /// any error [`load`](SchemaStore::load) reports.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, SchemaLoadError> {
        let dir = dir.as_ref();
        let sources = [BASE_SCHEMA, FEATURES_SCHEMA]
            .into_iter()
            .map(|name| locate(dir, name).map(|path| SchemaSource::file(name, path)))
            .collect::<Result<Vec<_>, _>>()?;
        Self::load(sources)
    }

    /// The base schema.
    pub fn base(&self) -> &Schema {
        &self.base
    }

    /// Look up a flat schema by name.
    pub fn schema(&self, name: &str) -> Option<&Schema> {
        if name == BASE_SCHEMA {
            Some(&self.base)
        } else {
            self.others.get(name)
        }
    }

    /// Names of all flat schemas, sorted alphabetically.
    pub fn schema_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.others.keys().map(String::as_str).collect();
        names.push(BASE_SCHEMA);
        names.sort_unstable();
        names
    }

    /// Number of flat schemas, including `base`.
    pub fn schema_count(&self) -> usize {
        self.others.len() + 1
    }

    /// All feature schemas.
    pub fn features(&self) -> &FeatureSchemas {
        &self.features
    }

    /// Feature schema for one component type.
    pub fn feature_schema(&self, component_type: &str) -> Option<&Schema> {
        self.features.get(component_type)
    }
}

fn locate(dir: &Path, name: &str) -> Result<PathBuf, SchemaLoadError> {
    SCHEMA_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{name}.{ext}")))
        .find(|path| path.is_file())
        .ok_or_else(|| SchemaLoadError::NotFound {
            name: name.to_string(),
            path: dir.join(format!("{name}.json")),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, file: &str, content: &str) -> PathBuf {
        let path = dir.join(file);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_preserves_declared_order() {
        let store = SchemaStore::load([SchemaSource::document(
            BASE_SCHEMA,
            json!({"zeta": "string", "alpha": "integer", "mid": "boolean"}),
        )])
        .unwrap();
        let names: Vec<&str> = store.base().field_names().collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_aliases_load_as_canonical_tags() {
        let store = SchemaStore::load([SchemaSource::document(
            BASE_SCHEMA,
            json!({"a": "str", "b": "int", "c": "bool", "d": "list", "e": "dict"}),
        )])
        .unwrap();
        let base = store.base();
        assert_eq!(base.get("a"), Some(TypeTag::String));
        assert_eq!(base.get("b"), Some(TypeTag::Integer));
        assert_eq!(base.get("c"), Some(TypeTag::Boolean));
        assert_eq!(base.get("d"), Some(TypeTag::Array));
        assert_eq!(base.get("e"), Some(TypeTag::Object));
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let err = SchemaStore::load([SchemaSource::document(
            BASE_SCHEMA,
            json!({"name": "string", "ratio": "float"}),
        )])
        .unwrap_err();
        match &err {
            SchemaLoadError::UnknownTypeTag { schema, field, .. } => {
                assert_eq!(schema, BASE_SCHEMA);
                assert_eq!(field, "ratio");
            }
            other => panic!("Expected UnknownTypeTag, got: {other}"),
        }
    }

    #[test]
    fn test_non_string_tag_is_meta_schema_violation() {
        let err = SchemaStore::load([SchemaSource::document(
            BASE_SCHEMA,
            json!({"name": "string", "age": 3}),
        )])
        .unwrap_err();
        match &err {
            SchemaLoadError::MetaSchemaViolation { name, violations } => {
                assert_eq!(name, BASE_SCHEMA);
                let v = violations
                    .violations()
                    .iter()
                    .find(|v| v.field() == Some("age"))
                    .unwrap_or_else(|| panic!("Expected a violation at /age, got: {violations}"));
                assert_eq!(v.path, vec!["age".to_string()]);
                assert_eq!(violations.fields().collect::<Vec<_>>(), vec!["age"]);
                assert_eq!(v.expected, Expectation::TypeTag);
                assert_eq!(v.found, ValueKind::Integer);
                assert_eq!(v.suggested_tag(), Some(TypeTag::Integer));
                assert_eq!(
                    v.to_string(),
                    r#"  /age: expected a type tag string, found integer (did you mean "integer"?)"#
                );
            }
            other => panic!("Expected MetaSchemaViolation, got: {other}"),
        }
    }

    #[test]
    fn test_non_object_document_rejected() {
        let err =
            SchemaStore::load([SchemaSource::document(BASE_SCHEMA, json!(["name"]))]).unwrap_err();
        match &err {
            SchemaLoadError::MetaSchemaViolation { violations, .. } => {
                let v = &violations.violations()[0];
                assert!(v.path.is_empty());
                assert_eq!(v.expected, Expectation::Object);
                assert_eq!(v.found, ValueKind::Array);
                assert_eq!(v.suggested_tag(), None);
                assert_eq!(violations.fields().count(), 0);
            }
            other => panic!("Expected MetaSchemaViolation, got: {other}"),
        }
    }

    #[test]
    fn test_missing_base_rejected() {
        let err = SchemaStore::load([SchemaSource::document(
            FEATURES_SCHEMA,
            json!({"t2t": {"streaming": "boolean"}}),
        )])
        .unwrap_err();
        assert!(matches!(err, SchemaLoadError::MissingBase), "got: {err}");
    }

    #[test]
    fn test_duplicate_source_rejected() {
        let err = SchemaStore::load([
            SchemaSource::document(BASE_SCHEMA, json!({})),
            SchemaSource::document(BASE_SCHEMA, json!({"name": "string"})),
        ])
        .unwrap_err();
        assert!(matches!(err, SchemaLoadError::DuplicateSource { .. }), "got: {err}");
    }

    #[test]
    fn test_feature_schemas_loaded() {
        let store = SchemaStore::load([
            SchemaSource::document(BASE_SCHEMA, json!({"name": "string"})),
            SchemaSource::document(
                FEATURES_SCHEMA,
                json!({
                    "t2t": {"streaming": "bool", "max_tokens": "int"},
                    "stt": {"languages": "list"}
                }),
            ),
        ])
        .unwrap();
        let types: Vec<&str> = store.features().component_types().collect();
        assert_eq!(types, vec!["t2t", "stt"]);
        let t2t = store.feature_schema("t2t").unwrap();
        assert_eq!(t2t.name(), "t2t");
        assert_eq!(t2t.get("max_tokens"), Some(TypeTag::Integer));
        assert!(store.feature_schema("ttsg").is_none());
    }

    #[test]
    fn test_feature_schema_unknown_tag_names_component_type() {
        let err = SchemaStore::load([
            SchemaSource::document(BASE_SCHEMA, json!({"name": "string"})),
            SchemaSource::document(FEATURES_SCHEMA, json!({"stt": {"rate": "double"}})),
        ])
        .unwrap_err();
        match &err {
            SchemaLoadError::UnknownTypeTag { schema, .. } => assert_eq!(schema, "features.stt"),
            other => panic!("Expected UnknownTypeTag, got: {other}"),
        }
    }

    #[test]
    fn test_feature_schema_shape_checked() {
        let err = SchemaStore::load([
            SchemaSource::document(BASE_SCHEMA, json!({"name": "string"})),
            SchemaSource::document(FEATURES_SCHEMA, json!({"stt": "boolean"})),
        ])
        .unwrap_err();
        assert!(
            matches!(err, SchemaLoadError::MetaSchemaViolation { ref name, .. } if name == FEATURES_SCHEMA),
            "got: {err}"
        );
        // A component type mapped straight to a tag is a missing feature set.
        assert!(err.to_string().contains("/stt: expected an object, found string"), "{err}");
    }

    #[test]
    fn test_feature_tag_violation_names_type_and_feature() {
        let err = SchemaStore::load([
            SchemaSource::document(BASE_SCHEMA, json!({"name": "string"})),
            SchemaSource::document(FEATURES_SCHEMA, json!({"stt": {"streaming": true}})),
        ])
        .unwrap_err();
        match &err {
            SchemaLoadError::MetaSchemaViolation { violations, .. } => {
                let v = &violations.violations()[0];
                assert_eq!(v.path, vec!["stt".to_string(), "streaming".to_string()]);
                assert_eq!(v.field(), Some("streaming"));
                assert_eq!(v.suggested_tag(), Some(TypeTag::Boolean));
            }
            other => panic!("Expected MetaSchemaViolation, got: {other}"),
        }
    }

    #[test]
    fn test_pointer_segments_unescape() {
        assert!(pointer_segments("").is_empty());
        assert_eq!(pointer_segments("/a~1b/c~0d"), vec!["a/b", "c~d"]);
    }

    #[test]
    fn test_additional_flat_schemas() {
        let store = SchemaStore::load([
            SchemaSource::document("runtime", json!({"gpu": "boolean"})),
            SchemaSource::document(BASE_SCHEMA, json!({"name": "string"})),
        ])
        .unwrap();
        assert_eq!(store.schema_count(), 2);
        assert_eq!(store.schema_names(), vec!["base", "runtime"]);
        assert_eq!(store.schema("runtime").unwrap().get("gpu"), Some(TypeTag::Boolean));
        assert_eq!(store.schema(BASE_SCHEMA).unwrap().len(), 1);
        assert!(store.schema("absent").is_none());
    }

    #[test]
    fn test_from_dir_json_and_yaml() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "base.json", r#"{"name": "string", "type": "string"}"#);
        write(dir.path(), "features.yaml", "t2t:\n  streaming: boolean\n");
        let store = SchemaStore::from_dir(dir.path()).unwrap();
        assert_eq!(store.base().len(), 2);
        assert_eq!(
            store.feature_schema("t2t").unwrap().get("streaming"),
            Some(TypeTag::Boolean)
        );
    }

    #[test]
    fn test_from_dir_missing_features_file() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "base.json", r#"{"name": "string"}"#);
        let err = SchemaStore::from_dir(dir.path()).unwrap_err();
        match &err {
            SchemaLoadError::NotFound { name, path } => {
                assert_eq!(name, FEATURES_SCHEMA);
                assert!(path.ends_with("features.json"));
            }
            other => panic!("Expected NotFound, got: {other}"),
        }
    }

    #[test]
    fn test_malformed_file_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "base.json", "{\"name\": \"string\"");
        let err = SchemaStore::load([SchemaSource::file(BASE_SCHEMA, path)]).unwrap_err();
        match &err {
            SchemaLoadError::Malformed { name, reason } => {
                assert_eq!(name, BASE_SCHEMA);
                assert!(reason.contains("invalid JSON"), "{reason}");
            }
            other => panic!("Expected Malformed, got: {other}"),
        }
    }

    #[test]
    fn test_missing_file_rejected() {
        let dir = TempDir::new().unwrap();
        let err = SchemaStore::load([SchemaSource::file(
            BASE_SCHEMA,
            dir.path().join("base.json"),
        )])
        .unwrap_err();
        assert!(matches!(err, SchemaLoadError::NotFound { .. }), "got: {err}");
    }

    #[test]
    fn test_schema_new_repeated_field_keeps_position() {
        let schema = Schema::new(
            "base",
            [
                ("name", TypeTag::String),
                ("age", TypeTag::String),
                ("name", TypeTag::Integer),
            ],
        );
        let names: Vec<&str> = schema.field_names().collect();
        assert_eq!(names, vec!["name", "age"]);
        assert_eq!(schema.get("name"), Some(TypeTag::Integer));
    }

    #[test]
    fn test_violation_display_root() {
        let v = Violation {
            path: Vec::new(),
            expected: Expectation::Object,
            found: ValueKind::Null,
        };
        assert_eq!(v.to_string(), "  (root): expected an object, found null");
        assert_eq!(v.field(), None);
    }
}
