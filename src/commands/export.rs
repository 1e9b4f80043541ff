//! Export command implementation
//!
//! Fetches the service's metadata, lets every plugin carve out its fragment,
//! and writes the resulting files into the metadata directory. Nothing is
//! written when any plugin fails.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use metasync::output::emoji;

use crate::cli::GlobalArgs;
use crate::commands::context::{output_dir, Context};

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Write into this directory instead of the configured metadata directory
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// List the files that would be written without writing them
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the export command
pub fn execute(args: ExportArgs, global: &GlobalArgs) -> Result<()> {
    let context = Context::load(global)?;
    let client = context.client()?;
    let out = &context.output;
    let target = output_dir(&context, args.output);

    let files = client.export_metadata()?;

    if args.dry_run {
        println!("Would write {} file(s) to {}:", files.len(), target.display());
        for (path, file) in files.files() {
            println!("  {} ({} bytes)", path.display(), file.size());
        }
        return Ok(());
    }

    files.write_to_dir(&target)?;

    if !args.quiet {
        for path in files.list_files() {
            println!("  {}", path.display());
        }
        println!(
            "{} {}",
            emoji(out, "✅", "[OK]"),
            out.success(&format!(
                "Exported {} file(s) to {}",
                files.len(),
                target.display()
            ))
        );
    }
    Ok(())
}
