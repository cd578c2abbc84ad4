use clap::{Args, Parser, Subcommand};
use record_filter_cli::export::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "rfilter",
    about = "Filter JSON records with typed, composable conditions",
    version,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable debug logging (ignored when RUST_LOG is set)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Pick which subcommand to use
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply a filter set to a records file
    Apply(ApplyArgs),
    /// List the fields of a filter set and the operators each one allows
    Fields(FilterSetArgs),
    /// Report which conditions of a filter set are active
    Check(FilterSetArgs),
}

#[derive(Args)]
pub struct FilterSetArgs {
    /// Filter set file with fields and conditions (.yaml, .yml or .json)
    #[arg(long, short)]
    pub filters: PathBuf,
}

#[derive(Args)]
pub struct ApplyArgs {
    /// JSON file holding an array of records
    #[arg(long, short)]
    pub records: PathBuf,

    /// Filter set file with fields and conditions (.yaml, .yml or .json)
    #[arg(long, short)]
    pub filters: PathBuf,

    /// Reference time for the relative date operators, RFC 3339 or YYYY-MM-DD
    #[arg(long)]
    pub now: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Write to this file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
