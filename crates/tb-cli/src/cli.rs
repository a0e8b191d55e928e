//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Testbed - set up database and mock preconditions for API tests
#[derive(Parser, Debug)]
#[command(name = "tb")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override target database path (`:memory:` allowed)
    #[arg(short, long, global = true, env = "TESTBED_TARGET")]
    pub target: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a scenario and lint its DDL
    Validate(ValidateArgs),

    /// Show what applying a scenario would do
    Plan(PlanArgs),

    /// Create tables, seed data and activate mocks
    Apply(ApplyArgs),

    /// Serve a scenario's mocks without touching the database
    Serve(ServeArgs),

    /// List stored scenarios
    Ls(LsArgs),

    /// Import a scenario file into the repository
    Import(ImportArgs),

    /// Export a stored scenario
    Export(ExportArgs),

    /// Delete a stored scenario
    Rm(RmArgs),

    /// List supported dynamic constants
    ///
    /// A token is replaced only when the character after it is not a letter,
    /// digit or underscore. `id-$UUID` and `$SEQ-1` resolve, while
    /// `order_$SEQ_1` and `id-$UUIDx` are left as written.
    Constants,

    /// Resolve dynamic constants in a JSON value
    Resolve(ResolveArgs),
}

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Scenario file or stored scenario id
    pub scenario: String,

    /// Treat DDL lint warnings as errors
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Scenario file or stored scenario id
    pub scenario: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the apply command
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Scenario file or stored scenario id
    pub scenario: String,

    /// Record executor calls instead of running them
    #[arg(long)]
    pub dry_run: bool,

    /// Keep serving the scenario's mocks after applying
    #[arg(long)]
    pub serve: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Scenario file or stored scenario id
    pub scenario: String,

    /// Override mock server host
    #[arg(long)]
    pub host: Option<String>,

    /// Override mock server port
    #[arg(long)]
    pub port: Option<u16>,
}

/// Arguments for the ls command
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Only scenarios carrying this tag
    #[arg(long)]
    pub tag: Option<String>,
}

/// Arguments for the import command
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Scenario or export file
    pub file: String,

    /// Keep the id and timestamps from the file
    #[arg(long)]
    pub restore: bool,
}

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Stored scenario id
    pub id: String,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Arguments for the rm command
#[derive(Args, Debug)]
pub struct RmArgs {
    /// Stored scenario id
    pub id: String,
}

/// Arguments for the resolve command
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// JSON value; plain text is treated as a string
    pub value: String,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON output
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
