//! CLI argument definitions for the survey pivoter.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use survey_model::OutputFormat;

#[derive(Parser)]
#[command(
    name = "survey-pivot",
    version,
    about = "Survey pivoter - Turn wide survey tables into long, labelled rows",
    long_about = "Turn a wide survey table (one row per respondent) into one row per\n\
                  respondent and question, with question text, answer labels, question\n\
                  groups and median-based answer properties.\n\n\
                  Each survey is described by a YAML config file."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Pivot the survey described by a config file.
    Run(RunArgs),

    /// Show how each survey variable would be pivoted, without pivoting.
    Inspect(InspectArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Path to the survey config file.
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Output file (default: from the config file).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Output format (default: from the output file extension).
    #[arg(long = "format", value_enum)]
    pub format: Option<OutputFormatArg>,

    /// Run every stage but do not write the output file.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Do not draw the per-question progress bar.
    #[arg(long = "no-progress")]
    pub no_progress: bool,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Path to the survey config file.
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Print the classification as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Csv,
    Xlsx,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Csv => OutputFormat::Csv,
            OutputFormatArg::Xlsx => OutputFormat::Xlsx,
        }
    }
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
