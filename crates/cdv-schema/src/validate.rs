//! # Component Details Validation and Repair
//!
//! Checks a record against the base schema and builds best-effort repaired
//! records from invalid ones.
//!
//! ## Validation
//!
//! Every base-schema field is visited in declared order. An absent field or
//! a value of the wrong kind produces one `error` diagnostic; validation
//! never stops at the first violation. The verdict is true iff no error was
//! produced.
//!
//! ## Repair
//!
//! The repaired record is rebuilt from the base schema alone: declared
//! fields present in the input are copied verbatim, absent ones receive
//! [`cdv_core::TypeTag::default_value`] and a `warning` diagnostic. Undeclared input
//! fields are dropped. Values of the wrong kind are not coerced, so a
//! repaired record can still fail validation.
//!
//! ## Feature Schemas
//!
//! The store exposes per-component-type feature schemas, but neither
//! validation nor repair consults them. The verdict depends on the base
//! schema only.

use std::path::Path;

use cdv_core::{ComponentLabel, Record, ValueKind};

use crate::diagnostic::{Diagnostic, RepairReport, ValidationReport};
use crate::store::{Schema, SchemaLoadError, SchemaStore};

/// Validator and repairer for component details.
///
/// Owns its [`SchemaStore`]. Construct one at startup and share it by
/// reference; all methods take `&self` and hold no per-call state, so the
/// validator is safe to use from many threads at once.
#[derive(Debug, Clone)]
pub struct ComponentDetailsValidator {
    store: SchemaStore,
}

impl ComponentDetailsValidator {
    /// Wrap an already-loaded store.
    pub fn new(store: SchemaStore) -> Self {
        Self { store }
    }

    /// Load `base` and `features` from `dir` and wrap the result.
    ///
    /// # Errors
    ///
    /// Returns any `SchemaLoadError` from [`SchemaStore::from_dir`].
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, SchemaLoadError> {
        SchemaStore::from_dir(dir).map(Self::new)
    }

    /// The schemas this validator checks against.
    pub fn store(&self) -> &SchemaStore {
        &self.store
    }

    /// The base schema.
    pub fn base_schema(&self) -> &Schema {
        self.store.base()
    }

    /// Validate `record` against the base schema.
    pub fn validate(&self, record: &Record) -> ValidationReport {
        let component = ComponentLabel::of(record);
        let mut diagnostics = Vec::new();

        for spec in self.base_schema().fields() {
            let diagnostic = match record.get(&spec.name) {
                None => Diagnostic::missing_field(&spec.name, &component),
                Some(value) => {
                    let actual = ValueKind::of(value);
                    if actual == spec.expected.kind() {
                        continue;
                    }
                    Diagnostic::type_mismatch(&spec.name, &component, spec.expected, actual)
                }
            };
            diagnostic.emit();
            diagnostics.push(diagnostic);
        }

        let report = ValidationReport::new(diagnostics);
        tracing::debug!(
            component = %component,
            valid = report.is_valid(),
            errors = report.error_count(),
            "validated component details"
        );
        report
    }

    /// Returns true iff `record` conforms to the base schema.
    pub fn is_valid(&self, record: &Record) -> bool {
        self.validate(record).is_valid()
    }

    /// Build a repaired copy of `record`.
    ///
    /// Total over every record, including an empty one.
    pub fn repair(&self, record: &Record) -> RepairReport {
        let component = ComponentLabel::of(record);
        let base = self.base_schema();
        let mut repaired = Record::new();
        let mut diagnostics = Vec::new();
        let mut still_invalid = Vec::new();

        for spec in base.fields() {
            match record.get(&spec.name) {
                Some(value) => {
                    if !spec.expected.matches(value) {
                        still_invalid.push(spec.name.clone());
                    }
                    repaired.insert(spec.name.clone(), value.clone());
                }
                None => {
                    let diagnostic =
                        Diagnostic::added_missing_field(&spec.name, &component, spec.expected);
                    diagnostic.emit();
                    diagnostics.push(diagnostic);
                    repaired.insert(spec.name.clone(), spec.expected.default_value());
                }
            }
        }

        let dropped = record.keys().filter(|k| !base.contains(k)).count();
        tracing::debug!(
            component = %component,
            added = diagnostics.len(),
            dropped,
            still_invalid = still_invalid.len(),
            "repaired component details"
        );

        RepairReport::new(repaired, diagnostics, still_invalid)
    }

    /// Repaired copy of `record`, without the report.
    pub fn to_valid(&self, record: &Record) -> Record {
        self.repair(record).into_record()
    }
}
