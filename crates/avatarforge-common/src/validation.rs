//! Face validation client
//!
//! The verdict is informational. A 4xx from the endpoint still carries a
//! `detail` worth showing, so the status code is not treated as failure.

use crate::config::AvatarConfig;
use crate::encoder::EncodedImage;
use crate::error::{AvatarError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Serialize)]
struct ValidationRequest<'a> {
    img: &'a EncodedImage,
}

/// Human-readable outcome of face validation
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ValidationResult {
    pub detail: String,
}

/// Client for the face validation endpoint
#[derive(Clone)]
pub struct ValidationClient {
    config: Arc<AvatarConfig>,
    http: reqwest::Client,
}

impl ValidationClient {
    pub fn new(config: Arc<AvatarConfig>, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    /// Submit `image` for face validation
    pub async fn validate(&self, image: &EncodedImage) -> Result<ValidationResult> {
        let endpoint = &self.config.validation_url;

        let response = self
            .http
            .post(endpoint)
            .header("Authorization", self.config.bearer())
            .json(&ValidationRequest { img: image })
            .send()
            .await
            .map_err(|e| AvatarError::transport(endpoint, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AvatarError::transport(endpoint, e))?;

        let result: ValidationResult = serde_json::from_str(&body)
            .map_err(|e| AvatarError::ValidationParse(format!("HTTP {}: {}", status, e)))?;

        tracing::debug!(%status, detail = %result.detail, "face validation answered");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{encoded, MockRoutes};
    use axum::http::Method;

    #[tokio::test]
    async fn test_validate_posts_image_payload() {
        let api = MockRoutes::new()
            .validation(200, r#"{"detail":"face ok"}"#)
            .serve()
            .await;
        let client = ValidationClient::new(Arc::new(api.config()), reqwest::Client::new());

        let result = client.validate(&encoded(b"hello").await).await.unwrap();
        assert_eq!(result.detail, "face ok");

        let calls = api.calls_to("/validate");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, Method::POST);
        assert_eq!(calls[0].body, serde_json::json!({ "img": "aGVsbG8=" }));
        assert_eq!(calls[0].authorization.as_deref(), Some("Bearer test-token"));
    }

    #[tokio::test]
    async fn test_client_error_status_still_surfaces_detail() {
        let api = MockRoutes::new()
            .validation(400, r#"{"detail":"no face found"}"#)
            .serve()
            .await;
        let client = ValidationClient::new(Arc::new(api.config()), reqwest::Client::new());

        let result = client.validate(&encoded(b"hello").await).await.unwrap();
        assert_eq!(result.detail, "no face found");
    }

    #[tokio::test]
    async fn test_unparseable_body_is_parse_error() {
        let api = MockRoutes::new()
            .validation(502, "<html>bad gateway</html>")
            .serve()
            .await;
        let client = ValidationClient::new(Arc::new(api.config()), reqwest::Client::new());

        let err = client.validate(&encoded(b"hello").await).await.unwrap_err();
        assert!(matches!(err, AvatarError::ValidationParse(_)));
    }
}
