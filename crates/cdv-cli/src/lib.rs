//! # cdv-cli — Component Details Command Line
//!
//! Provides the `cdv` command-line interface over the `cdv-schema`
//! validator.
//!
//! ## Subcommands
//!
//! - `cdv validate` — Validate record files against the base schema (`--json` for reports).
//! - `cdv repair` — Fill missing fields with type defaults.
//! - `cdv schema` — Print the base schema or a component type's feature schema.
//!
//! ```bash
//! cdv validate components/whisper/details.json
//! cdv repair components/llm/details.yaml --output repaired.json --strict
//! cdv --schema-dir ./details_schemas schema --component-type stt
//! ```
//!
//! Exit codes: 0 success, 1 invalid input, 2 operational error.

pub mod config;
pub mod repair;
pub mod schema;
pub mod validate;

use anyhow::{Context, Result};
use cdv_schema::ComponentDetailsValidator;

use crate::config::CliConfig;

/// Load the schema store named by `config` and build the validator.
///
/// Called once at startup; the validator is then passed by reference to
/// every subcommand.
pub fn load_validator(config: &CliConfig) -> Result<ComponentDetailsValidator> {
    let validator = ComponentDetailsValidator::from_dir(&config.schema_dir).with_context(|| {
        format!(
            "failed to load component schemas from {}",
            config.schema_dir.display()
        )
    })?;

    tracing::info!(
        schema_dir = %config.schema_dir.display(),
        base_fields = validator.base_schema().len(),
        component_types = validator.store().features().len(),
        "loaded schema store"
    );

    Ok(validator)
}
