//! # cdv-core — Foundational Types for Component Details Validation
//!
//! This crate is the leaf of the `cdv` workspace. It defines the small,
//! closed vocabulary every other crate speaks: the schema type tags, the
//! runtime kind of a JSON value, the record shape, and the label used to
//! name a component in diagnostics.
//!
//! ## Key Design Principles
//!
//! 1. **Closed type vocabulary.** `TypeTag` has exactly five variants. A
//!    schema that names anything else is rejected when it is loaded, so
//!    every default value is representable.
//!
//! 2. **Discriminant comparison.** A record value is checked by comparing its
//!    `ValueKind` against the declared `TypeTag`. No string comparison of
//!    runtime type names.
//!
//! 3. **Records are plain JSON objects.** `Record` is an alias for
//!    `serde_json::Map<String, Value>`. Key order is preserved.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `cdv-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod document;
pub mod error;
pub mod record;
pub mod types;

pub use document::{load_document, load_record, parse_document, DocumentFormat};
pub use error::{CdvError, UnknownTypeTag};
pub use record::{ComponentLabel, Record};
pub use types::{TypeTag, ValueKind};
