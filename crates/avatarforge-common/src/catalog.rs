//! Body catalog client
//!
//! Fetches the base body models a generated avatar can be built on. A failing
//! catalog never aborts a run: the client logs and hands back an empty list.

use crate::config::AvatarConfig;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A selectable base body template
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyModel {
    /// Opaque identifier sent back as `body_id`
    pub id: String,
    /// Display name
    pub name: String,
    /// Reference to the body asset
    pub url: String,
}

/// Client for the body catalog endpoint
#[derive(Clone)]
pub struct CatalogClient {
    config: Arc<AvatarConfig>,
    http: reqwest::Client,
}

impl CatalogClient {
    pub fn new(config: Arc<AvatarConfig>, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    /// Fetch the current catalog, or an empty list if anything goes wrong
    pub async fn list_bodies(&self) -> Vec<BodyModel> {
        let endpoint = &self.config.catalog_url;

        let response = match self
            .http
            .get(endpoint)
            .header("Authorization", self.config.bearer())
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(%endpoint, error = %e, "body catalog unreachable");
                return Vec::new();
            }
        };

        if !response.status().is_success() {
            tracing::warn!(%endpoint, status = %response.status(), "body catalog request failed");
            return Vec::new();
        }

        match response.json::<Vec<BodyModel>>().await {
            Ok(bodies) => {
                tracing::debug!(count = bodies.len(), "fetched body catalog");
                bodies
            }
            Err(e) => {
                tracing::warn!(%endpoint, error = %e, "body catalog response not understood");
                Vec::new()
            }
        }
    }
}

/// Pick one body id uniformly at random; `None` when the catalog is empty
pub fn select_body_id<R: Rng + ?Sized>(bodies: &[BodyModel], rng: &mut R) -> Option<String> {
    bodies.choose(rng).map(|body| body.id.clone())
}
