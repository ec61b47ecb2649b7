//! Error types for the dorky client

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for dorky client operations
#[derive(Error, Debug)]
pub enum DorkyError {
    /// The server answered with a non-success status
    #[error("Server returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// A local file could not be opened, created or written
    #[error("File system error at {path}: {source}")]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Connection-level failures (DNS, refused, reset mid-stream)
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The connection failed while the response body was being read
    #[error("Transport error while reading response body: {0}")]
    BodyRead(#[source] std::io::Error),

    /// A success response whose body the client cannot use
    #[error("Invalid server response: {reason}")]
    InvalidResponse { reason: String },

    #[error("Invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Invalid artifact ID: {id:?}")]
    InvalidArtifactId { id: String },

    /// Metadata could not be serialized for transport
    #[error("Metadata encoding error: {0}")]
    MetadataEncoding(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("Home directory not found")]
    HomeDirectoryNotFound,
}

impl DorkyError {
    /// Create a new file system error for the given path
    pub fn file_system(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileSystem {
            path: path.into(),
            source,
        }
    }

    /// Create a new invalid response error
    pub fn invalid_response(reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            reason: reason.into(),
        }
    }

    /// Create a new invalid artifact ID error
    pub fn invalid_artifact_id(id: impl Into<String>) -> Self {
        Self::InvalidArtifactId { id: id.into() }
    }

    /// Create a new configuration error
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// HTTP status code, if the server rejected the request
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_http_status(&self) -> bool {
        matches!(self, Self::HttpStatus { .. })
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::BodyRead(_))
    }

    pub fn is_filesystem(&self) -> bool {
        matches!(self, Self::FileSystem { .. })
    }
}

/// Result type alias for dorky client operations
pub type Result<T> = std::result::Result<T, DorkyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_accessors() {
        let err = DorkyError::HttpStatus {
            status: 404,
            body: "{\"error\":\"not found\"}".to_string(),
        };
        assert_eq!(err.status(), Some(404));
        assert!(err.is_http_status());
        assert!(err.is_not_found());
        assert!(!err.is_transport());
        assert!(err.to_string().contains("HTTP 404"));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_file_system_error_keeps_path_and_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = DorkyError::file_system("/tmp/nope.bin", io);
        assert!(err.is_filesystem());
        assert_eq!(err.status(), None);
        assert!(err.to_string().contains("/tmp/nope.bin"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: DorkyError = json_err.into();
        assert!(matches!(err, DorkyError::MetadataEncoding(_)));
    }
}
