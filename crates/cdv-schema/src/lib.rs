//! # cdv-schema — Schema Store, Validation & Repair
//!
//! Gatekeeping for component details: a record describing a pluggable
//! component is checked against a declarative schema before the component
//! is accepted or persisted.
//!
//! ## Schema Store (`store`)
//!
//! [`SchemaStore`] loads the `base` schema (field name to type tag), the
//! `features` schema set (component type to feature schema), and any further
//! flat schemas. Every document is shape-checked against an embedded
//! meta-schema via the `jsonschema` crate. Loading is all-or-nothing and
//! happens once at startup.
//!
//! ## Validation & Repair (`validate`)
//!
//! - [`ComponentDetailsValidator::validate`] / [`ComponentDetailsValidator::is_valid`]
//!   check presence and type of every base-schema field and report each
//!   violation as an `error` diagnostic.
//! - [`ComponentDetailsValidator::repair`] / [`ComponentDetailsValidator::to_valid`]
//!   rebuild a record from the base schema, filling absent fields with type
//!   defaults.
//!
//! ## Diagnostics (`diagnostic`)
//!
//! Each [`Diagnostic`] is emitted through `tracing` when produced and is
//! returned in the operation's report.
//!
//! ## Crate Policy
//!
//! - Depends only on `cdv-core` internally.
//! - Violations in records never surface as `Err`; only schema loading fails.

pub mod diagnostic;
pub mod store;
pub mod validate;

pub use diagnostic::{Diagnostic, DiagnosticKind, RepairReport, Severity, ValidationReport};
pub use store::{
    Expectation, FeatureSchemas, FieldSpec, MetaSchemaViolations, Schema, SchemaLoadError,
    SchemaOrigin, SchemaSource, SchemaStore, Violation, BASE_SCHEMA, FEATURES_SCHEMA,
};
pub use validate::ComponentDetailsValidator;
