//! Reset command implementation
//!
//! Clears all metadata on the service. This is destructive, so it asks for
//! confirmation unless `--yes` is passed, and refuses to run without a
//! terminal to ask on.

use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};

use metasync::output::emoji;
use metasync::suggestions;

use crate::cli::GlobalArgs;
use crate::commands::context::Context;

/// Arguments for the reset command
#[derive(Args, Debug)]
pub struct ResetArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Execute the reset command
pub fn execute(args: ResetArgs, global: &GlobalArgs) -> Result<()> {
    let context = Context::load(global)?;
    let client = context.client()?;
    let out = &context.output;

    if !args.yes {
        if !console::Term::stderr().is_term() {
            return Err(suggestions::confirmation_required(
                "clear all metadata on the service",
            ));
        }

        let theme = ColorfulTheme::default();
        let confirmed = Confirm::with_theme(&theme)
            .with_prompt(format!(
                "Clear all metadata on {}?",
                context.config.endpoint
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    client.reset_metadata()?;
    println!(
        "{} {}",
        emoji(out, "✅", "[OK]"),
        out.success("Metadata cleared")
    );
    Ok(())
}
