//! Command-line interface module.
//!
//! This module defines the CLI structure using Clap, including
//! all commands, arguments, and options.
//!
//! # Commands
//!
//! - `check`: Vet the current module's build list
//! - `graph`: Export the requirement graph
//! - `rules`: List the available rules
//! - `init`: Create an example configuration file
//! - `validate`: Validate a configuration file
//!
//! # Example Usage
//!
//! ```bash
//! # Vet the module in the current directory
//! modvet check
//!
//! # Vet another module, offline, as JSON
//! modvet check --dir ./service --skip upgrades --format json --output report.json
//!
//! # Export the requirement graph
//! modvet graph --format mermaid --output deps.mmd
//!
//! # Initialize configuration
//! modvet init
//!
//! # Validate configuration
//! modvet validate modvet.yaml
//! ```

use crate::types::{GraphFormat, ReportFormat, RuleId};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// modvet - Go module build list auditor.
#[derive(Parser, Debug)]
#[command(
    name = "modvet",
    author,
    version,
    about = "Go module build list auditor",
    long_about = "modvet asks the Go toolchain for the current module's build list and \
                  requirement graph, then reports conditions that often signal trouble: \
                  stale go.mod files, split major versions, incompatible requirements, \
                  excluded, prerelease and pseudo-versions, and replace directives. \
                  It never modifies go.mod.",
    after_help = "Run 'modvet rules' to list every rule and its finding code."
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "MODVET_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Vet the build list of the current module
    #[command(visible_alias = "c")]
    Check(CheckArgs),

    /// Export the requirement graph
    #[command(visible_alias = "g")]
    Graph(GraphArgs),

    /// List available rules
    Rules,

    /// Create an example configuration file
    Init,

    /// Validate a configuration file
    Validate(ValidateArgs),
}

/// How to reach the Go toolchain. Shared by `check` and `graph`.
#[derive(Args, Debug, Default)]
pub struct ToolchainArgs {
    /// Directory of the module to vet (default: current directory)
    #[arg(short = 'C', long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// The go binary to run
    #[arg(long, value_name = "BINARY", env = "MODVET_GO")]
    pub go: Option<String>,

    /// Time limit per toolchain call, in seconds (0 disables)
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Answer toolchain queries from a recorded JSON fixture instead of go
    #[arg(long, value_name = "FILE", hide = true)]
    pub fixture: Option<PathBuf>,
}

/// Arguments for the check command.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Rule to skip (repeatable); manifest-stale always runs
    #[arg(short, long, value_name = "RULE", value_enum)]
    pub skip: Vec<RuleId>,

    /// Output format
    #[arg(short, long, default_value = "text", value_enum)]
    pub format: ReportFormat,

    /// Output file path (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Log each module a rule inspects and list the build list
    #[arg(long)]
    pub verbose_rules: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Toolchain options
    #[command(flatten)]
    pub toolchain: ToolchainArgs,
}

/// Arguments for the graph command.
#[derive(Args, Debug)]
pub struct GraphArgs {
    /// Output format for the graph
    #[arg(short, long, default_value = "dot", value_enum)]
    pub format: GraphFormat,

    /// Output file path (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Toolchain options
    #[command(flatten)]
    pub toolchain: ToolchainArgs,
}

/// Arguments for the validate command.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(value_name = "FILE", default_value = "modvet.yaml")]
    pub config: PathBuf,
}
