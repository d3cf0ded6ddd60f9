//! AvatarForge Client - Selfie Upload & Avatar Viewer
//!
//! Lets the user pick a selfie, runs the avatar generation pipeline in the
//! background and drops the resulting model into a live 3D viewport.
//!
//! ## Plugins
//! - ViewportPlugin: Camera, lights, ground disc
//! - AvatarPlugin: Pipeline worker, upload prompt, avatar loading

mod components;
mod plugins;
mod systems;

use avatarforge_common::AvatarConfig;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use plugins::{AvatarPlugin, ViewportPlugin};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Endpoints + token, read once and shared with every client
    let config = AvatarConfig::from_env()?;

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "AvatarForge".to_string(),
                        resolution: bevy::window::WindowResolution::new(1280, 800),
                        present_mode: bevy::window::PresentMode::Fifo, // VSync
                        ..default()
                    }),
                    ..default()
                })
                .set(LogPlugin {
                    filter: "info,avatarforge_common=debug,wgpu=error,naga=warn".to_string(),
                    ..default()
                }),
        )
        .add_plugins(ViewportPlugin)
        .add_plugins(AvatarPlugin { config })
        .run();

    Ok(())
}
