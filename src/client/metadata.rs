//! Encoding of the upload `metadata` form field
//!
//! The field value is the metadata map serialized as compact JSON, then
//! percent-encoded with `application/x-www-form-urlencoded` rules (space
//! becomes `+`, anything outside the unreserved set becomes `%XX`). Keys are
//! emitted in sorted order, so equal maps always encode to the same string.

use crate::core::error::Result;
use crate::core::types::Metadata;
use url::form_urlencoded;

/// Encode metadata for the `metadata` form field
pub fn encode_metadata(metadata: &Metadata) -> Result<String> {
    let json = serde_json::to_string(metadata)?;
    Ok(form_urlencoded::byte_serialize(json.as_bytes()).collect())
}

/// Decode a `metadata` form field back into the map
pub fn decode_metadata(encoded: &str) -> Result<Metadata> {
    // Separators are always escaped by the encoder; a raw one means the
    // value was not produced by `encode_metadata`.
    if encoded.contains('&') || encoded.contains('=') {
        return Err(<serde_json::Error as serde::de::Error>::custom(
            "metadata field contains unescaped form separators",
        )
        .into());
    }

    let json = form_urlencoded::parse(encoded.as_bytes())
        .next()
        .map(|(key, _)| key.into_owned())
        .unwrap_or_default();

    Ok(serde_json::from_str(&json)?)
}
