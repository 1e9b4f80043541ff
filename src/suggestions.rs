//! # Error Suggestions
//!
//! This module provides helper functions for generating helpful error
//! messages with hints and suggestions. Following CLI recommendations,
//! errors should tell users what went wrong AND how to fix it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use metasync::suggestions;
//!
//! // Instead of:
//! anyhow::bail!("Configuration file not found: {}", path.display());
//!
//! // Use:
//! return Err(suggestions::config_not_found(path));
//! ```

use std::path::Path;

use crate::plugins::PLUGIN_NAMES;

/// Generate an error for when the configuration file is not found.
///
/// Includes hints about:
/// - Creating a new config file
/// - Using the -c/--config flag
/// - Using the METASYNC_CONFIG environment variable
/// - Passing the endpoint directly
pub fn config_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Configuration file not found: {path}\n\n\
         hint: Create a .metasync.yaml file with at least an 'endpoint' key\n\
         hint: Use -c/--config to specify a different path\n\
         hint: Set METASYNC_CONFIG environment variable\n\
         hint: Or pass --endpoint (METASYNC_ENDPOINT) to run without a config file",
        path = path.display()
    )
}

/// Generate an error for a destructive command run without a terminal to confirm on.
pub fn confirmation_required(action: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Refusing to {action} without confirmation\n\n\
         hint: Pass --yes to skip the prompt in non-interactive environments"
    )
}

/// Generate the hint for an unknown plugin name.
///
/// Suggests the closest built-in plugin when one is within a small edit distance.
pub fn unknown_plugin_hint(name: &str) -> String {
    let did_you_mean = find_similar(name, PLUGIN_NAMES)
        .map(|s| format!("Did you mean '{s}'? "))
        .unwrap_or_default();
    format!("{did_you_mean}Known plugins: {}", PLUGIN_NAMES.join(", "))
}

/// Closest candidate within two edits of `input`, if any.
///
/// Ties go to the earlier candidate, so registry order decides.
fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    let mut best: Option<(&'a str, usize)> = None;
    for &candidate in candidates {
        let distance = edit_distance(input, candidate);
        if distance > 2 || distance >= input.len() {
            continue;
        }
        if best.is_none_or(|(_, closest)| distance < closest) {
            best = Some((candidate, distance));
        }
    }
    best.map(|(candidate, _)| candidate)
}

/// Levenshtein distance over chars, keeping a single row of the table.
fn edit_distance(a: &str, b: &str) -> usize {
    let target: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=target.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, &cb) in target.iter().enumerate() {
            let substitution = diagonal + usize::from(ca != cb);
            diagonal = row[j + 1];
            row[j + 1] = substitution.min(row[j] + 1).min(diagonal + 1);
        }
    }
    row[target.len()]
}
