//! Components for the generated avatar and the upload overlay

use bevy::prelude::*;

/// The avatar currently shown in the viewport. At most one exists.
#[derive(Component)]
pub struct AvatarModel {
    /// Model reference as received from the generation service
    pub reference: String,
    /// Scene handle being loaded from `reference`
    pub scene: Handle<Scene>,
    /// Set once the load outcome has been logged
    pub settled: bool,
}

/// Marks the upload button
#[derive(Component)]
pub struct UploadButton;

/// Marks the status line under the upload button
#[derive(Component)]
pub struct StatusText;
