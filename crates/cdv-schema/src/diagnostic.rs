//! # Diagnostics
//!
//! Every schema deviation found while validating or repairing a record is
//! described by a [`Diagnostic`]. Diagnostics are emitted as `tracing`
//! events the moment they are produced and are also collected into the
//! report returned to the caller. The validator keeps none of them.

use std::fmt;

use serde::Serialize;

use cdv_core::{ComponentLabel, Record, TypeTag, ValueKind};

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The record is invalid.
    Error,
    /// The record was changed, or is acceptable with reservations.
    Warning,
}

impl Severity {
    /// Lowercase name of the severity.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a diagnostic reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A declared field is absent.
    MissingField,
    /// A declared field has a value of the wrong kind.
    TypeMismatch,
    /// Repair inserted a default for an absent field.
    AddedMissingField,
}

/// One reported deviation of a record from its schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Severity of the deviation.
    pub severity: Severity,
    /// Kind of the deviation.
    pub kind: DiagnosticKind,
    /// Offending field.
    pub field: String,
    /// Label of the record's component.
    pub component: String,
    /// Declared type, when the kind involves one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<TypeTag>,
    /// Kind actually found, for type mismatches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<ValueKind>,
}

impl Diagnostic {
    /// `error`: `field` is declared but absent.
    pub fn missing_field(field: &str, component: &ComponentLabel) -> Self {
        Self {
            severity: Severity::Error,
            kind: DiagnosticKind::MissingField,
            field: field.to_string(),
            component: component.to_string(),
            expected: None,
            actual: None,
        }
    }

    /// `error`: `field` holds a value of kind `actual` instead of `expected`.
    pub fn type_mismatch(
        field: &str,
        component: &ComponentLabel,
        expected: TypeTag,
        actual: ValueKind,
    ) -> Self {
        Self {
            severity: Severity::Error,
            kind: DiagnosticKind::TypeMismatch,
            field: field.to_string(),
            component: component.to_string(),
            expected: Some(expected),
            actual: Some(actual),
        }
    }

    /// `warning`: repair filled absent `field` with the default for `expected`.
    pub fn added_missing_field(field: &str, component: &ComponentLabel, expected: TypeTag) -> Self {
        Self {
            severity: Severity::Warning,
            kind: DiagnosticKind::AddedMissingField,
            field: field.to_string(),
            component: component.to_string(),
            expected: Some(expected),
            actual: None,
        }
    }

    /// Render the human-readable message.
    pub fn message(&self) -> String {
        match self.kind {
            DiagnosticKind::MissingField => format!(
                "Missing key \"{}\" in details of component \"{}\"",
                self.field, self.component
            ),
            DiagnosticKind::TypeMismatch => format!(
                "Invalid type for key \"{}\" in details of component \"{}\". Expected type {}, got {}",
                self.field,
                self.component,
                self.expected.map_or("unknown", |t| t.as_str()),
                self.actual.map_or("unknown", |k| k.as_str()),
            ),
            DiagnosticKind::AddedMissingField => format!(
                "Added missing key \"{}\" in details of component \"{}\"",
                self.field, self.component
            ),
        }
    }

    /// Forward this diagnostic to the active `tracing` subscriber.
    pub fn emit(&self) {
        let expected = self.expected.map(|t| t.as_str());
        let actual = self.actual.map(|k| k.as_str());
        match self.severity {
            Severity::Error => tracing::error!(
                field = %self.field,
                component = %self.component,
                expected,
                actual,
                "{}",
                self.message()
            ),
            Severity::Warning => tracing::warn!(
                field = %self.field,
                component = %self.component,
                expected,
                actual,
                "{}",
                self.message()
            ),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message())
    }
}

/// Outcome of validating one record.
///
/// Serializes as `{"valid": .., "diagnostics": [..]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    valid: bool,
    diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    /// The verdict is false iff any diagnostic is an error.
    pub(crate) fn new(diagnostics: Vec<Diagnostic>) -> Self {
        let valid = !diagnostics.iter().any(|d| d.severity == Severity::Error);
        Self { valid, diagnostics }
    }

    /// The verdict.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// All diagnostics in emission order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Error-severity diagnostics.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }

    /// Warning-severity diagnostics.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    /// Number of error-severity diagnostics.
    pub fn error_count(&self) -> usize {
        self.errors().count()
    }
}

/// Outcome of repairing one record.
#[derive(Debug, Clone, PartialEq)]
pub struct RepairReport {
    record: Record,
    diagnostics: Vec<Diagnostic>,
    still_invalid: Vec<String>,
}

impl RepairReport {
    pub(crate) fn new(record: Record, diagnostics: Vec<Diagnostic>, still_invalid: Vec<String>) -> Self {
        Self {
            record,
            diagnostics,
            still_invalid,
        }
    }

    /// The repaired record.
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Consume the report, keeping only the repaired record.
    pub fn into_record(self) -> Record {
        self.record
    }

    /// Diagnostics emitted during repair, in order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Declared fields whose copied value still has the wrong kind.
    ///
    /// Repair never coerces, so a non-empty list means the repaired record
    /// will fail validation.
    pub fn still_invalid_fields(&self) -> &[String] {
        &self.still_invalid
    }
}
