//! # Diff Command Implementation
//!
//! This module implements the `diff` subcommand, which shows the differences
//! between the service's metadata and the fragments in the metadata directory.
//!
//! ## Functionality
//!
//! - **Change Detection**: Exports the service's metadata in memory and
//!   compares every resulting file with the one on disk
//! - **Change Categories**: Files an export would add or modify
//! - **Exit Codes**: With `--exit-code`, returns 1 when changes exist
//!
//! This command is a safe, read-only operation that does not modify any files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use metasync::filesystem::MemoryFS;

use crate::cli::GlobalArgs;
use crate::commands::context::Context;

/// Show differences between the service's metadata and the local files
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Show only a summary without listing individual files.
    #[arg(long)]
    pub summary: bool,

    /// Exit with status 1 when differences exist.
    #[arg(long)]
    pub exit_code: bool,
}

/// Returned by `diff --exit-code` when changes exist; maps to exit status 1.
#[derive(Debug, thiserror::Error)]
#[error("changes detected")]
pub struct ChangesDetected;

/// Result of comparing a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeType {
    /// File exists on the service but not in the metadata directory
    Added,
    /// File exists in both but content differs
    Modified,
}

/// A single change entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub path: PathBuf,
    pub change_type: ChangeType,
}

/// Execute the `diff` command.
pub fn execute(args: DiffArgs, global: &GlobalArgs) -> Result<()> {
    let context = Context::load(global)?;
    let client = context.client()?;
    let out = &context.output;

    let remote = client.export_metadata()?;
    let changes = compute_changes(&remote, context.metadata_dir())?;

    if changes.is_empty() {
        println!("No changes detected.");
        return Ok(());
    }

    let added: Vec<_> = changes
        .iter()
        .filter(|c| c.change_type == ChangeType::Added)
        .collect();
    let modified: Vec<_> = changes
        .iter()
        .filter(|c| c.change_type == ChangeType::Modified)
        .collect();

    if args.summary {
        println!("Changes detected:");
        if !added.is_empty() {
            println!("  {} file(s) would be added", added.len());
        }
        if !modified.is_empty() {
            println!("  {} file(s) would be modified", modified.len());
        }
        println!();
        println!("Total: {} change(s)", changes.len());
    } else {
        if !added.is_empty() {
            println!("Files to add:");
            for change in &added {
                println!("  {}", out.success(&format!("+ {}", change.path.display())));
            }
            println!();
        }

        if !modified.is_empty() {
            println!("Files to modify:");
            for change in &modified {
                println!("  {}", out.warning(&format!("~ {}", change.path.display())));
            }
            println!();
        }

        println!(
            "Summary: {} added, {} modified",
            added.len(),
            modified.len()
        );
    }

    if args.exit_code {
        return Err(ChangesDetected.into());
    }
    Ok(())
}

/// Compute the differences between the exported file set and the metadata directory.
fn compute_changes(remote: &MemoryFS, metadata_dir: &Path) -> Result<Vec<Change>> {
    let mut changes = Vec::new();

    for (path, file) in remote.files() {
        let full_path = metadata_dir.join(path);

        if full_path.exists() {
            let existing_content = fs::read(&full_path).map_err(|e| {
                anyhow::anyhow!("Failed to read file {}: {}", full_path.display(), e)
            })?;

            if existing_content != file.content {
                changes.push(Change {
                    path: path.clone(),
                    change_type: ChangeType::Modified,
                });
            }
        } else {
            changes.push(Change {
                path: path.clone(),
                change_type: ChangeType::Added,
            });
        }
    }

    // MemoryFS iterates in path order already
    Ok(changes)
}
