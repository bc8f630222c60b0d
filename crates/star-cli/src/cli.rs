//! CLI argument definitions for the admissions star-schema normalizer.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "admissions-star",
    version,
    about = "Admissions star schema - split a flat admissions table into dimension and fact tables",
    long_about = "Normalize a flat hospital admissions CSV into a star schema.\n\n\
                  Produces six dimension tables (blood type, medical condition,\n\
                  admission date, doctor, insurance provider, gender) and one\n\
                  fact table referencing them by surrogate key."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Prefix log lines with a timestamp (pretty and compact formats).
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,

    /// Include the module path of each log event.
    #[arg(long = "log-target", global = true)]
    pub log_target: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Normalize an admissions CSV file into star-schema tables.
    Normalize(NormalizeArgs),

    /// List the required input columns and the generated tables.
    Tables,
}

#[derive(Parser)]
pub struct NormalizeArgs {
    /// Path to the admissions CSV file.
    #[arg(value_name = "INPUT_CSV")]
    pub input: PathBuf,

    /// Output directory for generated tables (default: <INPUT_DIR>/star).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Normalize and check without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Trim surrounding whitespace from categorical values before matching.
    #[arg(long = "trim-categories")]
    pub trim_categories: bool,

    /// Extra chrono format for admission dates (repeatable).
    ///
    /// Tried after the built-in ISO, slash and US formats.
    #[arg(long = "date-format", value_name = "FMT")]
    pub date_formats: Vec<String>,

    /// Skip writing manifest.json next to the tables.
    #[arg(long = "no-manifest")]
    pub no_manifest: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
