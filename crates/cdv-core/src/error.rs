//! # Error Types
//!
//! Errors raised while loading documents from disk or parsing schema type
//! tags. All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.

use thiserror::Error;

use crate::types::ValueKind;

/// Top-level error type for `cdv-core`.
#[derive(Error, Debug)]
pub enum CdvError {
    /// The document file could not be read or parsed.
    #[error("document load error for '{path}': {reason}")]
    DocumentLoad {
        /// Path to the document that failed to load.
        path: String,
        /// Reason the document could not be loaded.
        reason: String,
    },

    /// The document parsed, but its top level is not an object.
    #[error("document '{path}' is not a component details record: expected object, got {actual}")]
    NotARecord {
        /// Path to the offending document.
        path: String,
        /// Kind of the top-level value that was found instead.
        actual: ValueKind,
    },
}

/// A type tag string that does not name one of the supported types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown type tag {0:?}; expected one of string, integer, boolean, array, object")]
pub struct UnknownTypeTag(pub String);
