//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the `metasync`
//! command-line tool. Each subcommand is defined in its own file to keep the
//! logic separated and maintainable.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and the global options
//!   and performs the command's logic.
//!
//! Commands that talk to the service load a [`context::Context`] first, which
//! merges the config file with the global flags and builds the client.

pub mod apply;
pub mod completions;
pub mod context;
pub mod diff;
pub mod export;
pub mod inconsistency;
pub mod query;
pub mod reload;
pub mod reset;
