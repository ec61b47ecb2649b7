//! Core types and error handling for the dorky client

pub mod error;
pub mod types;

// Re-export commonly used items
pub use error::{DorkyError, Result};
pub use types::{ArtifactId, ArtifactInfo, Metadata, UploadResponse};
