//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};

/// Sparkify - load song metadata and listening logs into a star schema
#[derive(Parser, Debug)]
#[command(name = "sparkify")]
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

    /// Override database path (`:memory:` or a DuckDB file)
    #[arg(short, long, global = true, env = "SPARKIFY_DATABASE")]
    pub database: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Drop the database and recreate every table
    ResetSchema(ResetSchemaArgs),

    /// Load song data, then log data, into an existing schema
    Load(LoadArgs),

    /// Check that every table holds data
    Verify(VerifyArgs),

    /// Reset, load and verify in one run
    Regenerate(RegenerateArgs),
}

/// Arguments for the reset-schema command
#[derive(Args, Debug)]
pub struct ResetSchemaArgs {
    /// Confirm dropping all existing data
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the load command
#[derive(Args, Debug)]
pub struct LoadArgs {
    /// Song data directory (default: data.song_data from config)
    pub song_root: Option<String>,

    /// Log data directory (default: data.log_data from config)
    pub log_root: Option<String>,
}

/// Arguments for the verify command
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Artist name the probe query looks for
    #[arg(short, long)]
    pub artist: Option<String>,
}

/// Arguments for the regenerate command
#[derive(Args, Debug)]
pub struct RegenerateArgs {
    /// Confirm dropping all existing data
    #[arg(short, long)]
    pub yes: bool,

    /// Override song data directory
    #[arg(long)]
    pub song_data: Option<String>,

    /// Override log data directory
    #[arg(long)]
    pub log_data: Option<String>,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
