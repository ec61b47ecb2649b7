//! Transport options for [`ArtifactClient`](crate::ArtifactClient)

use crate::core::error::{DorkyError, Result};
use std::time::Duration;

/// Chunk size used when streaming a download to disk (64 KiB)
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// User agent sent when none is configured
pub const DEFAULT_USER_AGENT: &str = concat!("dorky-client/", env!("CARGO_PKG_VERSION"));

/// Explicit HTTP client configuration
///
/// Nothing here falls back to a transport default implicitly: `timeout: None`
/// means no overall deadline, and TLS certificates are verified unless
/// `accept_invalid_certs` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Service root, e.g. `http://localhost:3000`
    pub base_url: String,
    /// Deadline for a whole request including the body
    pub timeout: Option<Duration>,
    /// Deadline for establishing the TCP/TLS connection
    pub connect_timeout: Option<Duration>,
    pub user_agent: String,
    /// Skip TLS certificate verification
    pub accept_invalid_certs: bool,
    /// Bytes read from the response body per write to disk
    pub chunk_size: usize,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
            connect_timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_invalid_certs: false,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Reject option combinations the client cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(DorkyError::configuration("chunk_size must be greater than zero"));
        }
        if self.timeout == Some(Duration::ZERO) {
            return Err(DorkyError::configuration("timeout must be greater than zero"));
        }
        if self.connect_timeout == Some(Duration::ZERO) {
            return Err(DorkyError::configuration(
                "connect_timeout must be greater than zero",
            ));
        }
        Ok(())
    }
}
