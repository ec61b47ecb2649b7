//! Info command implementation

use crate::cli::context::CliContext;
use crate::client::ArtifactClient;
use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::Value;

/// Execute the info command
pub fn execute(client: &ArtifactClient, id: String) -> Result<()> {
    let info = client
        .metadata(&id)
        .with_context(|| format!("Failed to fetch metadata for {}", id))?;

    if CliContext::is_json() {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{}: {}", "ID".bold(), info.id.to_string().yellow());
    for (key, value) in &info.extra {
        let shown = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        println!("{}: {}", key.bold(), shown);
    }

    Ok(())
}
