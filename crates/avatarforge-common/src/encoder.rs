//! Image encoder - turns a selected image into the base64 payload the APIs expect

use crate::error::{AvatarError, Result};
use base64::{engine::general_purpose, Engine as _};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// A locally available image resource picked by the user
#[derive(Clone, Debug)]
pub enum ImageSource {
    /// Image file on disk
    File(PathBuf),
    /// Image bytes already in memory
    Memory(Vec<u8>),
    /// Already encoded `data:<mime>;base64,<payload>` string
    DataUri(String),
}

impl ImageSource {
    fn describe(&self) -> String {
        match self {
            ImageSource::File(path) => path.display().to_string(),
            ImageSource::Memory(bytes) => format!("<memory: {} bytes>", bytes.len()),
            ImageSource::DataUri(_) => "<data uri>".to_string(),
        }
    }
}

/// Raw base64 image payload, never carrying a data-URI prefix
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EncodedImage(String);

impl EncodedImage {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncodedImage({} chars)", self.0.len())
    }
}

/// Reads image resources and converts them to [`EncodedImage`]
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageEncoder;

impl ImageEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Read `source` and return its base64 payload
    pub async fn encode(&self, source: &ImageSource) -> Result<EncodedImage> {
        let payload = match source {
            ImageSource::File(path) => {
                let bytes = tokio::fs::read(path).await.map_err(|e| AvatarError::Fetch {
                    resource: source.describe(),
                    reason: e.to_string(),
                })?;
                general_purpose::STANDARD.encode(bytes)
            }
            ImageSource::Memory(bytes) => general_purpose::STANDARD.encode(bytes),
            ImageSource::DataUri(uri) => {
                let payload = strip_data_uri_prefix(uri)?;
                general_purpose::STANDARD
                    .decode(payload)
                    .map_err(|e| AvatarError::Encoding(format!("invalid base64 payload: {}", e)))?;
                payload.to_string()
            }
        };

        tracing::debug!(resource = %source.describe(), chars = payload.len(), "encoded image");
        Ok(EncodedImage(payload))
    }
}

/// Drop a leading `data:<mime>;base64,` header, leaving the payload
pub fn strip_data_uri_prefix(value: &str) -> Result<&str> {
    let Some(rest) = value.strip_prefix("data:") else {
        return Ok(value);
    };

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| AvatarError::Encoding("data URI has no payload separator".to_string()))?;

    if !header.ends_with(";base64") {
        return Err(AvatarError::Encoding(format!(
            "data URI is not base64 encoded ({})",
            header
        )));
    }

    Ok(payload)
}
