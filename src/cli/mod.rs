//! Command-line interface for the dorky client

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;
pub mod context;

/// Dorky - upload and download build artifacts
#[derive(Parser)]
#[command(
    name = "dorky",
    version,
    about = "Upload and download artifacts from a dorky server",
    long_about = "Dorky moves files to and from a dorky artifact server. Uploads return an artifact ID; downloads stream that artifact back to disk."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable progress bars
    #[arg(long, global = true)]
    pub no_progress: bool,

    /// Server base URL (default: from config, then http://localhost:3000)
    #[arg(long, global = true, value_name = "URL")]
    pub server: Option<String>,

    /// Path to config file (default: ~/.dorky/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload a file as a new artifact
    Upload {
        /// File to upload
        file: PathBuf,

        /// Attach metadata (repeatable); values that parse as JSON keep their type
        #[arg(long = "meta", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        meta: Vec<(String, String)>,

        /// Key the server uses to deduplicate retried uploads
        #[arg(long)]
        idempotency_key: Option<String>,
    },

    /// Download an artifact to a local path
    Download {
        /// Artifact ID returned by upload
        id: String,

        /// Destination file (parent directories are created)
        dest: PathBuf,
    },

    /// Show the server's metadata for an artifact
    Info {
        /// Artifact ID
        id: String,
    },
}

/// Parse a `KEY=VALUE` argument
pub fn parse_key_value(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got {:?}", arg)),
    }
}
