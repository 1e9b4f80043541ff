//! # Inconsistency Command Implementation
//!
//! The service may accept metadata that later turns out to reference objects
//! which no longer exist (dropped tables, unreachable remote schemas). This
//! command reports and clears those objects:
//!
//! - `list`: print every inconsistent object, in the order the service reports them
//! - `status`: one-line consistent/inconsistent summary
//! - `drop`: remove every inconsistent object from the service's metadata

use anyhow::Result;
use clap::{Args, Subcommand};

use metasync::output::{emoji, OutputConfig};
use metasync::protocol::InconsistentMetadata;

use crate::cli::GlobalArgs;
use crate::commands::context::Context;

/// Inspect or drop inconsistent metadata objects
#[derive(Args, Debug)]
pub struct InconsistencyArgs {
    #[command(subcommand)]
    pub command: InconsistencyCommand,
}

#[derive(Subcommand, Debug)]
pub enum InconsistencyCommand {
    /// List all inconsistent objects
    List {
        /// Print the raw objects as JSON
        #[arg(long)]
        json: bool,
    },
    /// Report whether the metadata is consistent
    Status,
    /// Drop all inconsistent objects from the metadata
    Drop,
}

/// Execute the inconsistency command
pub fn execute(args: InconsistencyArgs, global: &GlobalArgs) -> Result<()> {
    let context = Context::load(global)?;
    let client = context.client()?;
    let out = &context.output;

    match args.command {
        InconsistencyCommand::List { json } => {
            let report = client.get_inconsistent_metadata()?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report.inconsistent_objects)?
                );
            } else {
                print_list(&report, out);
            }
        }
        InconsistencyCommand::Status => {
            let report = client.get_inconsistent_metadata()?;
            println!("{}", status_line(&report, out));
        }
        InconsistencyCommand::Drop => {
            client.drop_inconsistent_metadata()?;
            println!(
                "{} {}",
                emoji(out, "✅", "[OK]"),
                out.success("Inconsistent objects dropped")
            );
        }
    }
    Ok(())
}

fn status_line(report: &InconsistentMetadata, out: &OutputConfig) -> String {
    if report.is_consistent {
        format!("{} {}", emoji(out, "✅", "[OK]"), out.success("Metadata is consistent"))
    } else {
        format!(
            "{} {}",
            emoji(out, "⚠️", "[WARN]"),
            out.warning(&format!(
                "Metadata is inconsistent ({} object(s))",
                report.inconsistent_objects.len()
            ))
        )
    }
}

fn print_list(report: &InconsistentMetadata, out: &OutputConfig) {
    if report.inconsistent_objects.is_empty() {
        println!("{}", status_line(report, out));
        return;
    }

    let name_width = report
        .inconsistent_objects
        .iter()
        .map(|o| o.name().len())
        .max()
        .unwrap_or(0)
        .max("NAME".len());
    let type_width = report
        .inconsistent_objects
        .iter()
        .map(|o| o.kind.as_deref().unwrap_or("unknown").len())
        .max()
        .unwrap_or(0)
        .max("TYPE".len());

    println!(
        "{:<name_width$}  {:<type_width$}  REASON",
        "NAME", "TYPE"
    );
    for object in &report.inconsistent_objects {
        println!(
            "{:<name_width$}  {:<type_width$}  {}",
            object.name(),
            object.kind.as_deref().unwrap_or("unknown"),
            object.reason.as_deref().unwrap_or("-")
        );
    }
}
