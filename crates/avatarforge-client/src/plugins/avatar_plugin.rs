//! Avatar plugin - wires the generation pipeline into the app
//!
//! - Starts the pipeline worker thread
//! - Installs the Bevy scene host the pipeline loads models through
//! - Upload overlay and avatar loading systems

use crate::systems::*;
use avatarforge_common::AvatarConfig;
use bevy::prelude::*;
use std::sync::Arc;

pub struct AvatarPlugin {
    pub config: AvatarConfig,
}

impl Plugin for AvatarPlugin {
    fn build(&self, app: &mut App) {
        let (scene_host, scene_channel) = BevySceneHost::new(&self.config.generation_url);

        let handle = match AvatarPipelineHandle::spawn(self.config.clone(), Arc::new(scene_host)) {
            Ok(handle) => handle,
            Err(e) => {
                error!("❌ Could not start avatar pipeline worker: {}", e);
                return;
            }
        };

        app
            // Resources
            .insert_resource(handle)
            .insert_resource(scene_channel)

            // Systems
            .add_systems(Startup, setup_upload_ui)
            .add_systems(Update, (
                upload_button_system,
                pipeline_status_system,
                apply_scene_commands_system,
                watch_avatar_load_system,
                turntable_system,
            ).chain());

        info!("🎨 Avatar Plugin initialized ({:?})", self.config);
    }
}
