//! CLI command implementations

pub mod download;
pub mod info;
pub mod upload;

// Common utilities for commands
use crate::client::ArtifactClient;
use crate::config::CliConfig;
use anyhow::{Context, Result};
use std::path::Path;

/// Build a client from the config file and the `--server` flag
pub fn build_client(server: Option<&str>, config_path: Option<&Path>) -> Result<ArtifactClient> {
    let config = CliConfig::load(config_path).context("Failed to load configuration")?;
    let client_config = config.to_client_config(server)?;
    let client = ArtifactClient::with_config(client_config)?;
    Ok(client)
}
