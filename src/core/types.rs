//! Core data types for the dorky client

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Caller-supplied metadata attached to an upload
pub type Metadata = BTreeMap<String, Value>;

/// Server-assigned artifact identifier
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactId(String);

impl ArtifactId {
    pub fn new(id: impl Into<String>) -> Self {
        ArtifactId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArtifactId({})", self.0)
    }
}

impl AsRef<str> for ArtifactId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for ArtifactId {
    fn from(id: String) -> Self {
        ArtifactId(id)
    }
}

impl From<&str> for ArtifactId {
    fn from(id: &str) -> Self {
        ArtifactId(id.to_string())
    }
}

/// Body of a successful `POST /artifacts`
///
/// Only `id` is interpreted; every other field the server sends is kept in
/// `extra` and serializes back out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub id: ArtifactId,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UploadResponse {
    /// Relative artifact URL, when the server reports one
    pub fn url(&self) -> Option<&str> {
        self.extra.get("url").and_then(Value::as_str)
    }

    /// Look up any passthrough field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

/// Body of a successful `GET /artifacts/{id}/metadata`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactInfo {
    pub id: ArtifactId,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ArtifactInfo {
    /// Creation timestamp as reported by the server
    pub fn created(&self) -> Option<&str> {
        self.extra.get("created").and_then(Value::as_str)
    }
}
