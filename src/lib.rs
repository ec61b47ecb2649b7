//! Dorky Client - uploads and downloads artifacts over HTTP
//!
//! A small blocking client for the dorky artifact storage service. It sends
//! local files to the service as artifacts and streams artifacts back to disk
//! by identifier. Artifact bytes are never inspected or altered.
//!
//! # Core Features
//!
//! - **Streaming Uploads**: Files are streamed into a multipart request body
//! - **Bounded Downloads**: Bodies are written to disk in 64 KiB chunks
//! - **Atomic Replacement**: A download only appears at its destination once complete
//! - **Typed Errors**: HTTP status, file system and transport failures are distinct
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use dorky_client::{ArtifactClient, Metadata};
//!
//! let client = ArtifactClient::new("http://localhost:3000")?;
//!
//! let mut metadata = Metadata::new();
//! metadata.insert("build".into(), serde_json::json!(42));
//!
//! let uploaded = client.upload("target/release/app.tar.gz", Some(&metadata), None)?;
//! client.download(&uploaded.id, "downloads/app.tar.gz")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod core;

// Re-export commonly used types
pub use crate::core::{
    error::{DorkyError, Result},
    types::{ArtifactId, ArtifactInfo, Metadata, UploadResponse},
};

pub use client::{decode_metadata, encode_metadata, ArtifactClient};

pub use config::{ClientConfig, DEFAULT_CHUNK_SIZE};

/// Current version of the dorky client
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
