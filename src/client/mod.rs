//! HTTP client for the dorky artifact service
//!
//! [`ArtifactClient`] talks to two routes on the service:
//!
//! - `POST {base}/artifacts` - multipart upload of one file
//! - `GET {base}/artifacts/{id}` - streamed download of its bytes
//!
//! plus `GET {base}/artifacts/{id}/metadata` for the artifact's server-side
//! description. Every call is a single blocking request with no retries.

pub mod metadata;
pub mod transfer;

use crate::config::ClientConfig;
use crate::core::error::{DorkyError, Result};
use crate::core::types::{ArtifactInfo, Metadata, UploadResponse};
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use url::Url;

pub use metadata::{decode_metadata, encode_metadata};

/// Client for one artifact service endpoint
///
/// Cheap to clone and safe to share between threads; it holds no per-call
/// state.
#[derive(Debug, Clone)]
pub struct ArtifactClient {
    base_url: String,
    endpoint: Url,
    http: Client,
    chunk_size: usize,
}

impl ArtifactClient {
    /// Create a client with default transport options
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::new(base_url))
    }

    /// Create a client with explicit transport options
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let base_url = normalize_base_url(&config.base_url)?;
        let endpoint = parse_base_url(&base_url)?;

        let mut builder = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs);
        if let Some(connect_timeout) = config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        let http = builder.build()?;

        debug!(base_url = %base_url, "created artifact client");

        Ok(Self {
            base_url,
            endpoint,
            http,
            chunk_size: config.chunk_size,
        })
    }

    /// Base URL with trailing slashes removed
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Upload a local file as a new artifact
    ///
    /// The file is streamed into the request body rather than read up front.
    /// Empty `metadata` and empty `idempotency_key` are not sent.
    pub fn upload(
        &self,
        file_path: impl AsRef<Path>,
        metadata: Option<&Metadata>,
        idempotency_key: Option<&str>,
    ) -> Result<UploadResponse> {
        let file_path = file_path.as_ref();
        let url = self.url(&["artifacts"])?;

        // The form owns the handle, so it is closed whichever way `send` goes.
        let file = File::open(file_path).map_err(|e| DorkyError::file_system(file_path, e))?;
        let file_meta = file
            .metadata()
            .map_err(|e| DorkyError::file_system(file_path, e))?;
        if !file_meta.is_file() {
            return Err(DorkyError::file_system(
                file_path,
                io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
            ));
        }
        let length = file_meta.len();
        let file_name = file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "artifact".to_string());

        let part = Part::reader_with_length(file, length)
            .file_name(file_name)
            .mime_str("application/octet-stream")?;
        let mut form = Form::new().part("file", part);

        if let Some(metadata) = metadata.filter(|m| !m.is_empty()) {
            form = form.text("metadata", encode_metadata(metadata)?);
        }
        if let Some(key) = idempotency_key.filter(|k| !k.is_empty()) {
            form = form.text("idempotency_key", key.to_string());
        }

        debug!(url = %url, path = %file_path.display(), bytes = length, "uploading artifact");
        let response = self.http.post(url).multipart(form).send()?;
        let response = check_status(response)?;

        let upload: UploadResponse = parse_json(response)?;
        if upload.id.is_empty() {
            return Err(DorkyError::invalid_response("upload response has an empty id"));
        }

        info!(id = %upload.id, bytes = length, "uploaded artifact");
        Ok(upload)
    }

    /// Download an artifact to `dest_path`
    ///
    /// The status is checked before anything on disk changes. The body is
    /// streamed in fixed-size chunks to a temporary file that replaces
    /// `dest_path` only once the whole artifact has arrived.
    pub fn download(
        &self,
        artifact_id: impl AsRef<str>,
        dest_path: impl AsRef<Path>,
    ) -> Result<PathBuf> {
        self.download_with_progress(artifact_id, dest_path, |_, _| {})
    }

    /// Like [`download`](Self::download), reporting `(bytes_written, content_length)`
    /// after each chunk
    pub fn download_with_progress<F>(
        &self,
        artifact_id: impl AsRef<str>,
        dest_path: impl AsRef<Path>,
        mut on_progress: F,
    ) -> Result<PathBuf>
    where
        F: FnMut(u64, Option<u64>),
    {
        let artifact_id = artifact_id.as_ref();
        let dest_path = dest_path.as_ref();
        let url = self.artifact_url(artifact_id, None)?;

        debug!(url = %url, dest = %dest_path.display(), "downloading artifact");
        let response = self.http.get(url).send()?;
        let mut response = check_status(response)?;
        let content_length = response.content_length();

        let written = transfer::write_atomically(
            &mut response,
            dest_path,
            self.chunk_size,
            |written| on_progress(written, content_length),
        )?;

        info!(id = artifact_id, bytes = written, dest = %dest_path.display(), "downloaded artifact");
        Ok(dest_path.to_path_buf())
    }

    /// Fetch the server's description of an artifact
    pub fn metadata(&self, artifact_id: impl AsRef<str>) -> Result<ArtifactInfo> {
        let url = self.artifact_url(artifact_id.as_ref(), Some("metadata"))?;

        debug!(url = %url, "fetching artifact metadata");
        let response = self.http.get(url).send()?;
        let response = check_status(response)?;
        parse_json(response)
    }

    fn artifact_url(&self, artifact_id: &str, suffix: Option<&str>) -> Result<Url> {
        validate_artifact_id(artifact_id)?;
        match suffix {
            Some(suffix) => self.url(&["artifacts", artifact_id, suffix]),
            None => self.url(&["artifacts", artifact_id]),
        }
    }

    /// Append percent-encoded path segments to the base URL
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| DorkyError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: "URL cannot be used as a base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Strip trailing slashes and check that the URL is an absolute HTTP(S) URL
pub fn normalize_base_url(base_url: &str) -> Result<String> {
    let trimmed = base_url.trim().trim_end_matches('/');
    parse_base_url(trimmed)?;
    Ok(trimmed.to_string())
}

fn parse_base_url(base_url: &str) -> Result<Url> {
    let invalid = |reason: String| DorkyError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason,
    };

    let url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {:?}", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot be used as a base".to_string()));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query strings and fragments are not allowed".to_string()));
    }
    Ok(url)
}

fn validate_artifact_id(artifact_id: &str) -> Result<()> {
    if artifact_id.is_empty()
        || artifact_id == "."
        || artifact_id == ".."
        || artifact_id.contains('/')
    {
        return Err(DorkyError::invalid_artifact_id(artifact_id));
    }
    Ok(())
}

/// Turn a non-success response into `HttpStatus`, keeping the body for diagnostics
fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().clone();
    let body = match response.text() {
        Ok(body) => body,
        Err(e) => {
            warn!(status = status.as_u16(), error = %e, "failed to read error body");
            String::new()
        },
    };
    warn!(status = status.as_u16(), url = %url, "server rejected request");
    Err(DorkyError::HttpStatus {
        status: status.as_u16(),
        body,
    })
}

fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.text()?;
    serde_json::from_str(&body).map_err(|e| {
        DorkyError::invalid_response(format!("{} (body: {:?})", e, truncate(&body, 200)))
    })
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
