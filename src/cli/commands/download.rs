//! Download command implementation

use crate::cli::context::CliContext;
use crate::client::ArtifactClient;
use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

/// Execute the download command
pub fn execute(client: &ArtifactClient, id: String, dest: PathBuf) -> Result<()> {
    let progress = if CliContext::show_progress() {
        ProgressBar::new_spinner()
    } else {
        ProgressBar::hidden()
    };
    progress.set_style(
        ProgressStyle::with_template("{spinner} {bytes} ({bytes_per_sec}) {msg}")?,
    );
    progress.set_message(id.clone());

    let mut sized = false;
    let result = client.download_with_progress(&id, &dest, |written, total| {
        if let (false, Some(total)) = (sized, total) {
            progress.set_length(total);
            progress.set_style(
                ProgressStyle::with_template(
                    "[{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta}) {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
            );
            sized = true;
        }
        progress.set_position(written);
    });
    progress.finish_and_clear();

    let path = result.with_context(|| format!("Failed to download artifact {}", id))?;

    if CliContext::is_json() {
        println!(
            "{}",
            serde_json::json!({ "id": id, "path": path.display().to_string() })
        );
    } else if CliContext::is_quiet() {
        println!("{}", path.display());
    } else {
        println!(
            "{} Downloaded {} to {}",
            "✓".green(),
            id.yellow(),
            path.display().to_string().cyan()
        );
    }

    Ok(())
}
