//! # cdv CLI entry point
//!
//! Parses command-line arguments, installs the tracing subscriber, loads the
//! schema store once, and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use cdv_cli::config::{CliConfig, LogFormat};
use cdv_cli::load_validator;
use cdv_cli::repair::{run_repair, RepairArgs};
use cdv_cli::schema::{run_schema, SchemaArgs};
use cdv_cli::validate::{run_validate, ValidateArgs};

/// Component details validator.
///
/// Checks component metadata records against the base schema, repairs
/// missing fields, and inspects the loaded schemas.
#[derive(Parser, Debug)]
#[command(name = "cdv", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory containing the base and features schema documents.
    #[arg(long, global = true, value_name = "DIR")]
    schema_dir: Option<PathBuf>,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate component details files against the base schema.
    Validate(ValidateArgs),

    /// Fill missing fields of a component details file with type defaults.
    Repair(RepairArgs),

    /// Print the base schema or a component type's feature schema.
    Schema(SchemaArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = CliConfig::resolve(cli.schema_dir, cli.verbose, cli.log_format);
    config.init_tracing();

    tracing::debug!(?config, "resolved configuration");

    let validator = match load_validator(&config) {
        Ok(validator) => validator,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(2);
        }
    };

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args, &validator),
        Commands::Repair(args) => run_repair(&args, &validator),
        Commands::Schema(args) => run_schema(&args, &validator),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
