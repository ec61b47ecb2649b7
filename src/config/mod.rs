//! Configuration for the dorky client
//!
//! `ClientConfig` carries the explicit transport options of one client.
//! `CliConfig` is the optional TOML file read by the `dorky` binary,
//! stored in ~/.dorky/config.toml

pub mod cli_config;
pub mod client_config;

// Re-export commonly used items
pub use cli_config::{CliConfig, TransportSection, DEFAULT_SERVER};
pub use client_config::{ClientConfig, DEFAULT_CHUNK_SIZE, DEFAULT_USER_AGENT};
