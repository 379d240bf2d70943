//! Command-line interface definitions.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

pub use commands::Commands;

#[derive(Parser, Debug)]
#[command(
    name = "vtube",
    version,
    about = "Build a Vespa feed from YouTube video CSV and query it",
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (replaces the global and project config files)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress log output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Machine-readable output: JSON on stdout, JSON logs on stderr
    #[arg(long, global = true)]
    pub robot: bool,

    /// Output format
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

impl Cli {
    #[must_use]
    pub const fn output_format(&self) -> OutputFormat {
        if self.robot {
            OutputFormat::Json
        } else {
            self.format
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}
