//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::commands;

/// Metasync - Compose plugin-owned metadata and apply it in one transaction
#[derive(Parser, Debug)]
#[command(name = "metasync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Options shared by every subcommand
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Path to the config file (defaults to .metasync.yaml)
    #[arg(short, long, global = true, value_name = "PATH", env = "METASYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Root URL of the metadata service, overriding the config file
    #[arg(long, global = true, value_name = "URL", env = "METASYNC_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Admin secret sent with every request, overriding the config file
    #[arg(
        long,
        global = true,
        value_name = "SECRET",
        env = "METASYNC_ADMIN_SECRET",
        hide_env_values = true
    )]
    pub admin_secret: Option<String>,

    /// Directory holding the metadata fragments, overriding the config file
    #[arg(long, global = true, value_name = "DIR")]
    pub metadata_dir: Option<PathBuf>,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    pub color: String,

    /// Set log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(
        long,
        global = true,
        value_name = "LEVEL",
        default_value = "warn",
        value_parser = ["off", "error", "warn", "info", "debug", "trace"]
    )]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the local metadata and apply it to the service in one transaction
    Apply(commands::apply::ApplyArgs),

    /// Export the service's metadata into the metadata directory
    Export(commands::export::ExportArgs),

    /// Show differences between the service's metadata and the local files
    Diff(commands::diff::DiffArgs),

    /// Clear all metadata on the service
    Reset(commands::reset::ResetArgs),

    /// Reload the service's metadata from its own store
    Reload(commands::reload::ReloadArgs),

    /// Inspect or drop inconsistent metadata objects
    Inconsistency(commands::inconsistency::InconsistencyArgs),

    /// Send a raw bulk query to the service
    Query(commands::query::QueryArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Initialize logging from `--log-level`, letting RUST_LOG override it.
    pub fn init_logging(&self) {
        let _ = env_logger::Builder::new()
            .parse_filters(&self.global.log_level)
            .parse_env("RUST_LOG")
            .format_timestamp(None)
            .try_init();
    }

    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let global = self.global;
        match self.command {
            Commands::Apply(args) => commands::apply::execute(args, &global),
            Commands::Export(args) => commands::export::execute(args, &global),
            Commands::Diff(args) => commands::diff::execute(args, &global),
            Commands::Reset(args) => commands::reset::execute(args, &global),
            Commands::Reload(args) => commands::reload::execute(args, &global),
            Commands::Inconsistency(args) => commands::inconsistency::execute(args, &global),
            Commands::Query(args) => commands::query::execute(args, &global),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
