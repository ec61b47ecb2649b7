//! Command-line configuration file
//!
//! Stored as TOML in ~/.dorky/config.toml:
//!
//! ```toml
//! server = "http://localhost:3000"
//!
//! [client]
//! timeout = "5m"
//! connect_timeout = "10s"
//! chunk_size = 65536
//! ```

use crate::config::client_config::ClientConfig;
use crate::core::error::{DorkyError, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Server used when neither the flag nor the config file names one
pub const DEFAULT_SERVER: &str = "http://localhost:3000";

/// Settings read by the `dorky` binary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Base URL of the artifact service
    pub server: Option<String>,
    /// Transport settings
    pub client: TransportSection,
}

/// `[client]` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportSection {
    /// Overall request timeout, humantime format ("30s", "5m")
    pub timeout: Option<String>,
    /// Connect timeout, humantime format
    pub connect_timeout: Option<String>,
    pub user_agent: Option<String>,
    pub chunk_size: Option<usize>,
    pub accept_invalid_certs: Option<bool>,
}

impl CliConfig {
    /// Load configuration from `path`, or from the default location
    ///
    /// A missing file yields the default configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::get_config_path()?,
        };

        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| DorkyError::file_system(&config_path, e))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            DorkyError::configuration(format!("Failed to parse config: {}", e))
        })
    }

    /// Get the path to the configuration file
    pub fn get_config_path() -> Result<PathBuf> {
        let user_dirs = UserDirs::new().ok_or(DorkyError::HomeDirectoryNotFound)?;
        Ok(user_dirs.home_dir().join(".dorky").join("config.toml"))
    }

    /// Build the client configuration, letting `server_override` win over the file
    pub fn to_client_config(&self, server_override: Option<&str>) -> Result<ClientConfig> {
        let server = server_override
            .map(str::to_string)
            .or_else(|| self.server.clone())
            .unwrap_or_else(|| DEFAULT_SERVER.to_string());

        let mut config = ClientConfig::new(server);
        let section = &self.client;

        if let Some(timeout) = &section.timeout {
            config.timeout = Some(parse_duration("client.timeout", timeout)?);
        }
        if let Some(timeout) = &section.connect_timeout {
            config.connect_timeout = Some(parse_duration("client.connect_timeout", timeout)?);
        }
        if let Some(user_agent) = &section.user_agent {
            config.user_agent = user_agent.clone();
        }
        if let Some(chunk_size) = section.chunk_size {
            config.chunk_size = chunk_size;
        }
        if let Some(accept) = section.accept_invalid_certs {
            config.accept_invalid_certs = accept;
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_duration(key: &str, value: &str) -> Result<std::time::Duration> {
    humantime::parse_duration(value).map_err(|e| {
        DorkyError::configuration(format!("{} has invalid duration {:?}: {}", key, value, e))
    })
}
