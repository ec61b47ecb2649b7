//! Upload command implementation

use crate::cli::context::CliContext;
use crate::client::ArtifactClient;
use crate::core::types::Metadata;
use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::Value;
use std::path::PathBuf;

/// Execute the upload command
pub fn execute(
    client: &ArtifactClient,
    file: PathBuf,
    meta: Vec<(String, String)>,
    idempotency_key: Option<String>,
) -> Result<()> {
    let metadata = metadata_from_pairs(meta);
    let metadata = (!metadata.is_empty()).then_some(&metadata);

    let response = client
        .upload(&file, metadata, idempotency_key.as_deref())
        .with_context(|| format!("Failed to upload {}", file.display()))?;

    if CliContext::is_json() {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else if CliContext::is_quiet() {
        println!("{}", response.id);
    } else {
        println!("{} Uploaded {}", "✓".green(), file.display().to_string().cyan());
        println!("  {}: {}", "ID".bold(), response.id.to_string().yellow());
        if let Some(url) = response.url() {
            println!("  {}: {}{}", "URL".bold(), client.base_url(), url);
        }
        if CliContext::is_verbose() {
            for (key, value) in response.extra.iter().filter(|(key, _)| *key != "url") {
                println!("  {}: {}", key.bold(), value);
            }
        }
    }

    Ok(())
}

/// Collect `--meta` pairs; values that parse as JSON keep their JSON type
pub fn metadata_from_pairs(pairs: Vec<(String, String)>) -> Metadata {
    pairs
        .into_iter()
        .map(|(key, raw)| {
            let value = serde_json::from_str(&raw).unwrap_or(Value::String(raw));
            (key, value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metadata_from_pairs() {
        let metadata = metadata_from_pairs(vec![
            ("branch".to_string(), "main".to_string()),
            ("build".to_string(), "42".to_string()),
            ("release".to_string(), "true".to_string()),
            ("tags".to_string(), "[\"a\",\"b\"]".to_string()),
        ]);

        assert_eq!(metadata["branch"], json!("main"));
        assert_eq!(metadata["build"], json!(42));
        assert_eq!(metadata["release"], json!(true));
        assert_eq!(metadata["tags"], json!(["a", "b"]));
    }

    #[test]
    fn test_later_pair_wins() {
        let metadata = metadata_from_pairs(vec![
            ("k".to_string(), "one".to_string()),
            ("k".to_string(), "two".to_string()),
        ]);
        assert_eq!(metadata.len(), 1);
        assert_eq!(metadata["k"], json!("two"));
    }
}
