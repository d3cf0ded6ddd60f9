//! Error types for the avatar pipeline
//!
//! ## Table of Contents
//! 1. AvatarError - Main error enum
//! 2. Result alias

use crate::scene::SceneError;
use thiserror::Error;

/// Errors that can occur during a pipeline run
#[derive(Error, Debug)]
pub enum AvatarError {
    /// The image resource could not be read
    #[error("Fetch error: could not read image {resource}: {reason}")]
    Fetch { resource: String, reason: String },

    /// The image bytes could not be turned into a base64 payload
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The validation endpoint answered with something that is not `{ detail }`
    #[error("Validation parse error: {0}")]
    ValidationParse(String),

    /// The generation endpoint answered with a non-success status
    #[error("Generation error: HTTP {status}: {body}")]
    Generation { status: u16, body: String },

    /// The generation endpoint succeeded but the body has no usable `avatar_link`
    #[error("Generation parse error: {0}")]
    GenerationParse(String),

    /// Request never produced a response
    #[error("Transport error calling {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The scene host refused the model reference
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Another run is still in flight
    #[error("A pipeline run is already in progress")]
    RunInProgress,

    /// `run` was called before an image was selected
    #[error("No image selected")]
    NoImageSelected,
}

impl AvatarError {
    pub(crate) fn transport(endpoint: &str, source: reqwest::Error) -> Self {
        AvatarError::Transport {
            endpoint: endpoint.to_string(),
            source,
        }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, AvatarError>;
