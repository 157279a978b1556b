//! # CLI Configuration
//!
//! Resolves where schemas live and how logs are rendered.
//!
//! The schema directory comes from `--schema-dir`, then the
//! `CDV_SCHEMA_DIR` environment variable, then `./details_schemas`.

use std::ffi::OsString;
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

/// Environment variable naming the schema directory.
pub const SCHEMA_DIR_ENV: &str = "CDV_SCHEMA_DIR";

/// Schema directory used when neither flag nor environment names one.
pub const DEFAULT_SCHEMA_DIR: &str = "details_schemas";

/// Log line rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Resolved CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Directory holding `base` and `features` schema documents.
    pub schema_dir: PathBuf,
    /// Count of `-v` flags.
    pub verbosity: u8,
    /// Log rendering.
    pub log_format: LogFormat,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            schema_dir: PathBuf::from(DEFAULT_SCHEMA_DIR),
            verbosity: 0,
            log_format: LogFormat::Text,
        }
    }
}

impl CliConfig {
    /// Resolve configuration from flags and the process environment.
    pub fn resolve(schema_dir: Option<PathBuf>, verbosity: u8, log_format: LogFormat) -> Self {
        Self::resolve_with_env(
            schema_dir,
            std::env::var_os(SCHEMA_DIR_ENV),
            verbosity,
            log_format,
        )
    }

    fn resolve_with_env(
        schema_dir: Option<PathBuf>,
        env_schema_dir: Option<OsString>,
        verbosity: u8,
        log_format: LogFormat,
    ) -> Self {
        let schema_dir = schema_dir
            .or_else(|| env_schema_dir.filter(|v| !v.is_empty()).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCHEMA_DIR));
        Self {
            schema_dir,
            verbosity,
            log_format,
        }
    }

    /// Filter directive for the configured verbosity.
    pub fn filter_directive(&self) -> &'static str {
        match self.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Install the global `tracing` subscriber. Logs go to stderr so that
    /// stdout carries only command output.
    pub fn init_tracing(&self) {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(self.filter_directive()))
            .with_target(false)
            .with_writer(std::io::stderr);

        match self.log_format {
            LogFormat::Text => builder.init(),
            LogFormat::Json => builder.json().init(),
        }
    }
}
