//! Scene host contract
//!
//! The pipeline never touches the scene itself. Whoever owns the viewport
//! implements [`SceneHost`] and decides how a model reference becomes
//! something on screen.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The viewport is gone (window closed, host disposed)
    #[error("Scene host is no longer running")]
    Closed,

    #[error("Scene host rejected model {reference}: {reason}")]
    Rejected { reference: String, reason: String },
}

/// Owner of the live 3D scene
pub trait SceneHost: Send + Sync {
    /// Load the model at `reference` into the scene. Must insert it in one
    /// step so the render loop never sees a half-built avatar.
    fn load_model(&self, reference: &str) -> Result<(), SceneError>;

    /// Remove whatever this host loaded
    fn dispose(&self);
}
