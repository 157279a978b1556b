//! # Validate Subcommand
//!
//! Checks one or more record files against the base schema and prints a
//! pass/fail line for each, followed by a summary. With `--json` each record
//! is printed as one JSON report line instead and the summary is omitted.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use cdv_core::load_record;
use cdv_schema::{ComponentDetailsValidator, ValidationReport};

/// Arguments for the `cdv validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Component details files (`.json`, `.yaml` or `.yml`).
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Print one JSON report per record instead of text.
    #[arg(long)]
    pub json: bool,
}

/// JSON report line for one record file.
#[derive(Serialize)]
struct RecordOutcome<'a> {
    path: String,
    #[serde(flatten)]
    report: &'a ValidationReport,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when every record is valid, 1 when any is not.
/// A file that cannot be loaded is an operational error.
pub fn run_validate(args: &ValidateArgs, validator: &ComponentDetailsValidator) -> Result<u8> {
    let total = args.paths.len();
    let mut passed = 0usize;

    for path in &args.paths {
        let record = load_record(path)
            .with_context(|| format!("failed to load component details from {}", path.display()))?;

        let report = validator.validate(&record);
        if report.is_valid() {
            passed += 1;
        }

        if args.json {
            println!("{}", render_json(path, &report)?);
        } else {
            for line in render_text(path, &report) {
                println!("{line}");
            }
        }
    }

    if !args.json {
        println!("{}", render_summary(passed, total));
    }

    Ok(if passed == total { 0 } else { 1 })
}

fn render_text(path: &Path, report: &ValidationReport) -> Vec<String> {
    if report.is_valid() {
        return vec![format!("PASS: {}", path.display())];
    }
    let mut lines = vec![format!(
        "FAIL: {} ({} violation(s))",
        path.display(),
        report.error_count()
    )];
    lines.extend(report.errors().map(|d| format!("  {}", d.message())));
    lines
}

fn render_json(path: &Path, report: &ValidationReport) -> Result<String> {
    let outcome = RecordOutcome {
        path: path.display().to_string(),
        report,
    };
    serde_json::to_string(&outcome).context("failed to serialize validation report")
}

fn render_summary(passed: usize, total: usize) -> String {
    format!("Records: {passed}/{total} passed")
}
