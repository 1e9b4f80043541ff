//! Query command implementation
//!
//! Reads a list of operations from a YAML or JSON file (or stdin with `-`)
//! and forwards it verbatim as the arguments of one `bulk` request. The
//! service's response is printed as pretty JSON.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde_json::Value as JsonValue;

use crate::cli::GlobalArgs;
use crate::commands::context::Context;

/// Arguments for the query command
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// File holding the bulk arguments (YAML or JSON); `-` reads stdin
    #[arg(short, long, value_name = "PATH")]
    pub file: PathBuf,
}

/// Execute the query command
pub fn execute(args: QueryArgs, global: &GlobalArgs) -> Result<()> {
    let content = read_input(&args.file)?;
    let payload = parse_payload(&content)
        .map_err(|e| anyhow::anyhow!("Invalid query in {}: {}", args.file.display(), e))?;

    let context = Context::load(global)?;
    let response = context.client()?.query(payload)?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn read_input(path: &PathBuf) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut content = String::new();
        io::stdin().read_to_string(&mut content)?;
        return Ok(content);
    }
    fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))
}

/// Parse the payload; JSON is valid YAML, so one parser covers both.
fn parse_payload(content: &str) -> Result<JsonValue> {
    let payload: JsonValue = serde_yaml::from_str(content)?;
    if !payload.is_array() {
        anyhow::bail!("expected a list of operations");
    }
    Ok(payload)
}
