//! Avatar pipeline - the brain of the upload flow
//!
//! Owns the run state, coordinates encoder and remote clients, and hands the
//! finished model to the scene host.
//!
//! ## Table of Contents
//! 1. PipelineState / PipelineSnapshot - observable state
//! 2. AvatarPipeline - orchestration
//! 3. Tests

use crate::catalog::{select_body_id, CatalogClient};
use crate::config::AvatarConfig;
use crate::encoder::{ImageEncoder, ImageSource};
use crate::error::{AvatarError, Result};
use crate::generation::GenerationClient;
use crate::scene::SceneHost;
use crate::validation::ValidationClient;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::Instrument;

// ============================================================================
// 1. Observable state
// ============================================================================

/// Where the pipeline is in its run lifecycle
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum PipelineState {
    #[default]
    Idle,
    /// An image was selected, the run has not started yet
    AwaitingImage,
    /// Encoding, validation and generation in flight
    Loading,
    /// Model reference handed to the scene host
    Completed(String),
    /// Run ended with an error; a new upload is allowed
    Failed(String),
}

/// What observers see of the pipeline
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct PipelineSnapshot {
    /// Incremented for every accepted image selection
    pub run_id: u64,
    pub state: PipelineState,
    /// Latest face validation detail for the current run
    pub validation_message: Option<String>,
}

impl PipelineSnapshot {
    pub fn is_loading(&self) -> bool {
        self.state == PipelineState::Loading
    }

    /// Whether a new image may be selected
    pub fn can_upload(&self) -> bool {
        matches!(
            self.state,
            PipelineState::Idle | PipelineState::Completed(_) | PipelineState::Failed(_)
        )
    }

    pub fn model_reference(&self) -> Option<&str> {
        match &self.state {
            PipelineState::Completed(reference) => Some(reference),
            _ => None,
        }
    }
}

// ============================================================================
// 2. AvatarPipeline
// ============================================================================

/// Orchestrates one avatar generation at a time
pub struct AvatarPipeline {
    config: Arc<AvatarConfig>,
    encoder: ImageEncoder,
    catalog: CatalogClient,
    validation: ValidationClient,
    generation: GenerationClient,
    scene: Arc<dyn SceneHost>,
    state: watch::Sender<PipelineSnapshot>,
    pending: Mutex<Option<ImageSource>>,
}

impl AvatarPipeline {
    pub fn new(config: Arc<AvatarConfig>, scene: Arc<dyn SceneHost>) -> Self {
        Self::with_http(config, scene, reqwest::Client::new())
    }

    /// Build with a caller-supplied HTTP client (shared connection pool, proxies)
    pub fn with_http(
        config: Arc<AvatarConfig>,
        scene: Arc<dyn SceneHost>,
        http: reqwest::Client,
    ) -> Self {
        let (state, _) = watch::channel(PipelineSnapshot::default());

        Self {
            encoder: ImageEncoder::new(),
            catalog: CatalogClient::new(config.clone(), http.clone()),
            validation: ValidationClient::new(config.clone(), http.clone()),
            generation: GenerationClient::new(config.clone(), http),
            config,
            scene,
            state,
            pending: Mutex::new(None),
        }
    }

    /// Observe state changes
    pub fn subscribe(&self) -> watch::Receiver<PipelineSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> PipelineSnapshot {
        self.state.borrow().clone()
    }

    /// Capture the user's image and move to `AwaitingImage`.
    ///
    /// Rejected with [`AvatarError::RunInProgress`] unless the pipeline is
    /// idle, completed or failed. Returns the id of the new run.
    pub fn select_image(&self, source: ImageSource) -> Result<u64> {
        let mut run_id = None;

        self.state.send_if_modified(|snapshot| {
            if !snapshot.can_upload() {
                return false;
            }
            *self.pending.lock() = Some(source);
            snapshot.run_id += 1;
            snapshot.state = PipelineState::AwaitingImage;
            snapshot.validation_message = None;
            run_id = Some(snapshot.run_id);
            true
        });

        run_id.ok_or(AvatarError::RunInProgress)
    }

    /// Run the pipeline for the selected image.
    ///
    /// Returns the model reference that was handed to the scene host. On
    /// error the pipeline is left in `Failed` and accepts a new image.
    pub async fn run(&self) -> Result<String> {
        let source = self.pending.lock().take().ok_or(AvatarError::NoImageSelected)?;

        let mut run_id = 0;
        let started = self.state.send_if_modified(|snapshot| {
            if snapshot.state != PipelineState::AwaitingImage {
                return false;
            }
            snapshot.state = PipelineState::Loading;
            run_id = snapshot.run_id;
            true
        });
        if !started {
            return Err(AvatarError::RunInProgress);
        }

        let span = tracing::info_span!("avatar_run", run_id);
        let outcome = self.execute(source).instrument(span.clone()).await;

        span.in_scope(|| match outcome {
            Ok(reference) => {
                tracing::info!(%reference, "avatar ready");
                self.state.send_modify(|snapshot| {
                    snapshot.state = PipelineState::Completed(reference.clone());
                });
                Ok(reference)
            }
            Err(e) => {
                tracing::error!(error = %e, "avatar run failed");
                self.state.send_modify(|snapshot| {
                    snapshot.state = PipelineState::Failed(e.to_string());
                });
                Err(e)
            }
        })
    }

    /// Select `source` and run the pipeline for it
    pub async fn submit(&self, source: ImageSource) -> Result<String> {
        self.select_image(source)?;
        self.run().await
    }

    /// Tear down whatever the scene host loaded
    pub fn dispose(&self) {
        self.scene.dispose();
    }

    async fn execute(&self, source: ImageSource) -> Result<String> {
        tracing::info!("avatar run started");

        // Independent: catalog fetch and image encoding
        let (bodies, image) = tokio::join!(self.catalog.list_bodies(), self.encoder.encode(&source));
        let image = image?;
        drop(source);

        let body_id = select_body_id(&bodies, &mut rand::thread_rng());
        match &body_id {
            Some(id) => tracing::debug!(body_id = %id, candidates = bodies.len(), "selected base body"),
            None => tracing::warn!("body catalog is empty, generating without a base body"),
        }

        // Advisory only: the verdict is shown to the user, never gates generation
        match self.validation.validate(&image).await {
            Ok(result) => {
                self.state.send_modify(|snapshot| {
                    snapshot.validation_message = Some(result.detail);
                });
            }
            Err(e) => tracing::warn!(error = %e, "face validation unavailable"),
        }

        let generated = self
            .generation
            .generate(&self.config.avatar_name, &image, body_id.as_deref())
            .await?;

        let reference = generated.avatar_model_reference;
        self.scene.load_model(&reference)?;
        Ok(reference)
    }
}

// ============================================================================
// 3. Tests
// ============================================================================
