//! Avatar generation client
//!
//! Sends the selfie payload and the chosen base body to the generation
//! service and returns the link of the produced model.

use crate::config::AvatarConfig;
use crate::encoder::EncodedImage;
use crate::error::{AvatarError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Generation request body. `body_id` is left out entirely when the catalog
/// had nothing to choose from.
#[derive(Serialize)]
struct GenerationRequest<'a> {
    name: &'a str,
    img: &'a EncodedImage,
    #[serde(skip_serializing_if = "Option::is_none")]
    body_id: Option<&'a str>,
}

/// Reference to a generated, loadable 3D asset
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct GenerationResult {
    #[serde(rename = "avatar_link")]
    pub avatar_model_reference: String,
}

/// Client for the avatar generation endpoint
#[derive(Clone)]
pub struct GenerationClient {
    config: Arc<AvatarConfig>,
    http: reqwest::Client,
}

impl GenerationClient {
    pub fn new(config: Arc<AvatarConfig>, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    /// Request an avatar for `image` on top of `body_id`
    pub async fn generate(
        &self,
        name: &str,
        image: &EncodedImage,
        body_id: Option<&str>,
    ) -> Result<GenerationResult> {
        let endpoint = &self.config.generation_url;

        tracing::info!(avatar_name = name, body_id = body_id.unwrap_or("<none>"), "requesting avatar generation");

        let response = self
            .http
            .post(endpoint)
            .header("Authorization", self.config.bearer())
            .json(&GenerationRequest {
                name,
                img: image,
                body_id,
            })
            .send()
            .await
            .map_err(|e| AvatarError::transport(endpoint, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AvatarError::transport(endpoint, e))?;

        if !status.is_success() {
            return Err(AvatarError::Generation {
                status: status.as_u16(),
                body,
            });
        }

        let result: GenerationResult = serde_json::from_str(&body)
            .map_err(|e| AvatarError::GenerationParse(e.to_string()))?;

        if result.avatar_model_reference.trim().is_empty() {
            return Err(AvatarError::GenerationParse("avatar_link is empty".to_string()));
        }

        Ok(result)
    }
}
