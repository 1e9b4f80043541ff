//! # Metasync CLI
//!
//! This is the binary entry point for the `metasync` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Initializing logging from `--log-level` and `RUST_LOG`.
//! - Executing the appropriate command and translating its outcome into an
//!   exit code.
//!
//! The core application logic is defined in the `lib.rs` library crate, ensuring
//! that the binary is a thin wrapper around the reusable library functionality.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;

use commands::diff::ChangesDetected;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    cli.init_logging();

    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        // Already reported by `diff --exit-code`
        Err(err) if err.is::<ChangesDetected>() => ExitCode::from(1),
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
