//! CLI argument definitions for the onboarding tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use onboard_model::FileType;

#[derive(Parser)]
#[command(
    name = "onboard",
    version,
    about = "Insurance book-of-business onboarding",
    long_about = "Onboard tabular insurance files (policy, claim, cancel) by mapping\n\
                  source columns onto the canonical schema, then track the server-side\n\
                  transformation jobs to completion."
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

    /// Base URL of the onboarding service.
    #[arg(
        long = "server",
        value_name = "URL",
        default_value = "http://localhost:8080",
        global = true
    )]
    pub server: String,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the full onboarding flow: upload, map, validate, submit, track.
    Run(RunArgs),

    /// List the canonical fields of the target schema.
    Catalog(CatalogArgs),

    /// Fetch the current job status for an upload.
    Status(StatusArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Policy file to onboard (required).
    #[arg(long = "policy", value_name = "FILE")]
    pub policy: PathBuf,

    /// Claim file to onboard.
    #[arg(long = "claim", value_name = "FILE")]
    pub claim: Option<PathBuf>,

    /// Cancellation file to onboard.
    #[arg(long = "cancel", value_name = "FILE")]
    pub cancel: Option<PathBuf>,

    /// Print the resolved mapping table before submitting.
    #[arg(long = "show-mapping")]
    pub show_mapping: bool,
}

#[derive(Parser)]
pub struct CatalogArgs {
    /// Restrict the listing to one file type (policy, claim, cancel).
    #[arg(value_name = "FILE_TYPE")]
    pub file_type: Option<FileType>,
}

#[derive(Parser)]
pub struct StatusArgs {
    /// Upload session to inspect.
    #[arg(value_name = "UPLOAD_ID")]
    pub upload_id: String,
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
