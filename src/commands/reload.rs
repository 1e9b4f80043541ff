//! Reload command implementation

use anyhow::Result;
use clap::Args;

use metasync::output::emoji;

use crate::cli::GlobalArgs;
use crate::commands::context::Context;

/// Arguments for the reload command
#[derive(Args, Debug)]
pub struct ReloadArgs {}

/// Execute the reload command
pub fn execute(_args: ReloadArgs, global: &GlobalArgs) -> Result<()> {
    let context = Context::load(global)?;
    let out = &context.output;

    context.client()?.reload_metadata()?;
    println!(
        "{} {}",
        emoji(out, "✅", "[OK]"),
        out.success("Metadata reloaded")
    );
    Ok(())
}
