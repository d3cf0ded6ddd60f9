//! # AvatarForge Common
//!
//! The avatar-generation pipeline: turns an uploaded selfie into a 3D model
//! reference and hands it to whatever owns the viewport.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          AvatarPipeline                                 │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  Input Layer                                                            │
//! │  ├── ImageEncoder: image resource -> base64 payload                     │
//! │  └── CatalogClient: GET base body models (fails soft)                   │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  Remote Layer                                                           │
//! │  ├── ValidationClient: POST face check (advisory only)                  │
//! │  └── GenerationClient: POST name + image + body id -> avatar_link       │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  Output Layer                                                           │
//! │  └── SceneHost: load the avatar_link into the live scene                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use avatarforge_common::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AvatarError> {
//!     let config = Arc::new(AvatarConfig::from_env()?);
//!     let pipeline = AvatarPipeline::new(config, Arc::new(MyScene));
//!
//!     let model = pipeline.submit(ImageSource::File("selfie.jpg".into())).await?;
//!     println!("Avatar: {}", model);
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod encoder;
pub mod error;
pub mod generation;
pub mod pipeline;
pub mod scene;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

pub use catalog::{select_body_id, BodyModel, CatalogClient};
pub use config::{AvatarConfig, ConfigError};
pub use encoder::{EncodedImage, ImageEncoder, ImageSource};
pub use error::{AvatarError, Result};
pub use generation::{GenerationClient, GenerationResult};
pub use pipeline::{AvatarPipeline, PipelineSnapshot, PipelineState};
pub use scene::{SceneError, SceneHost};
pub use validation::{ValidationClient, ValidationResult};

// ============================================================================
// Prelude
// ============================================================================

/// Convenient re-exports for pipeline consumers.
pub mod prelude {
    pub use super::config::AvatarConfig;
    pub use super::encoder::ImageSource;
    pub use super::error::AvatarError;
    pub use super::pipeline::{AvatarPipeline, PipelineSnapshot, PipelineState};
    pub use super::scene::{SceneError, SceneHost};
}
