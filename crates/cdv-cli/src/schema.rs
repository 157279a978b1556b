//! # Schema Subcommand
//!
//! Prints the fields of the base schema, or of one component type's
//! feature schema, in declared order.

use anyhow::Result;
use clap::Args;

use cdv_schema::{ComponentDetailsValidator, Schema, SchemaStore};

/// Arguments for the `cdv schema` subcommand.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Show the feature schema for this component type instead of the base schema.
    #[arg(long, value_name = "TYPE")]
    pub component_type: Option<String>,
}

/// Execute the schema subcommand.
///
/// Returns exit code 1 if `--component-type` names a type without a
/// feature schema.
pub fn run_schema(args: &SchemaArgs, validator: &ComponentDetailsValidator) -> Result<u8> {
    let store = validator.store();

    let schema = match &args.component_type {
        None => store.base(),
        Some(component_type) => match store.feature_schema(component_type) {
            Some(schema) => schema,
            None => {
                for line in render_unknown_type(store, component_type) {
                    println!("{line}");
                }
                return Ok(1);
            }
        },
    };

    for line in render(schema) {
        println!("{line}");
    }
    Ok(0)
}

fn render(schema: &Schema) -> Vec<String> {
    let width = schema.field_names().map(str::len).max().unwrap_or(0);
    let mut lines = Vec::with_capacity(schema.len() + 1);
    lines.push(format!("{} ({} fields)", schema.name(), schema.len()));
    for spec in schema.fields() {
        lines.push(format!("  {:<width$}  {}", spec.name, spec.expected));
    }
    lines
}

fn render_unknown_type(store: &SchemaStore, component_type: &str) -> Vec<String> {
    let known: Vec<&str> = store.features().component_types().collect();
    vec![
        format!("No feature schema for component type \"{component_type}\""),
        format!("Known component types: {}", known.join(", ")),
    ]
}
