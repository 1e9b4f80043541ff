//! Apply command implementation
//!
//! The apply command:
//! 1. Builds the canonical document from every plugin's local fragment
//! 2. Sends it to the service as one `bulk` request (`clear_metadata`, then
//!    `replace_metadata`)
//! 3. On rejection, prints the server's message together with the offending
//!    object located in the request that was sent
//!
//! With `--dry-run` only step 1 runs and the composed document is printed.

use std::time::Instant;

use anyhow::Result;
use clap::Args;

use metasync::output::emoji;

use crate::cli::GlobalArgs;
use crate::commands::context::Context;

/// Arguments for the apply command
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Print the composed metadata as YAML without sending it
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the apply command
pub fn execute(args: ApplyArgs, global: &GlobalArgs) -> Result<()> {
    let context = Context::load(global)?;
    let client = context.client()?;
    let out = &context.output;

    if args.dry_run {
        let metadata = client.build_metadata()?;
        print!("{}", metadata.to_yaml_string()?);
        return Ok(());
    }

    let start_time = Instant::now();
    match client.apply_metadata() {
        Ok(()) => {
            if !args.quiet {
                println!(
                    "{} {} in {:.2}s",
                    emoji(out, "✅", "[OK]"),
                    out.success("Metadata applied"),
                    start_time.elapsed().as_secs_f64()
                );
            }
            Ok(())
        }
        Err(e) => {
            if !args.quiet {
                eprintln!("{} {}", emoji(out, "❌", "[FAILED]"), out.failure("Apply failed"));
            }
            Err(e.into())
        }
    }
}
