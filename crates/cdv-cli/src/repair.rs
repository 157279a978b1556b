//! # Repair Subcommand
//!
//! Rebuilds a record from the base schema and prints it as pretty JSON, or
//! writes it to `--output`.
//!
//! Repair never coerces a wrongly typed value. With `--strict` the repaired
//! record is validated again and a failure exits 1.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use cdv_core::load_record;
use cdv_schema::ComponentDetailsValidator;

/// Arguments for the `cdv repair` subcommand.
#[derive(Args, Debug)]
pub struct RepairArgs {
    /// Component details file to repair.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Write the repaired record here instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Exit 1 if the repaired record still fails validation.
    #[arg(long)]
    pub strict: bool,
}

/// Execute the repair subcommand.
pub fn run_repair(args: &RepairArgs, validator: &ComponentDetailsValidator) -> Result<u8> {
    let record = load_record(&args.path).with_context(|| {
        format!(
            "failed to load component details from {}",
            args.path.display()
        )
    })?;

    let report = validator.repair(&record);
    let rendered = serde_json::to_string_pretty(report.record())
        .context("failed to serialize repaired record")?;

    match &args.output {
        Some(output) => {
            std::fs::write(output, format!("{rendered}\n"))
                .with_context(|| format!("failed to write {}", output.display()))?;
            tracing::info!(
                output = %output.display(),
                added = report.diagnostics().len(),
                "wrote repaired record"
            );
        }
        None => println!("{rendered}"),
    }

    if !report.still_invalid_fields().is_empty() {
        tracing::warn!(
            fields = ?report.still_invalid_fields(),
            "repaired record still holds wrongly typed values"
        );
    }

    if args.strict && !validator.is_valid(report.record()) {
        return Ok(1);
    }

    Ok(0)
}
