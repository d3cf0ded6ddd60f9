//! Avatar loader - the Bevy side of the scene host
//!
//! The pipeline worker pushes [`SceneCommand`]s through a crossbeam channel;
//! systems here drain it each frame and swap the avatar entity in one
//! command batch, so the renderer only ever sees the old avatar or the new one.

use crate::components::AvatarModel;
use avatarforge_common::{SceneError, SceneHost};
use bevy::asset::LoadState;
use bevy::prelude::*;
use url::Url;

/// Commands from the pipeline to the scene
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneCommand {
    /// Replace the current avatar with the model at this reference
    Load(String),
    /// Remove the current avatar
    Dispose,
}

/// [`SceneHost`] backed by the Bevy world
pub struct BevySceneHost {
    sender: crossbeam_channel::Sender<SceneCommand>,
    /// Generation endpoint, the base relative model links resolve against
    base: Option<Url>,
}

/// Receiving end, drained by [`apply_scene_commands_system`]
#[derive(Resource)]
pub struct SceneCommandChannel {
    pub receiver: crossbeam_channel::Receiver<SceneCommand>,
}

impl BevySceneHost {
    /// Create the host and the channel its commands arrive on
    pub fn new(generation_url: &str) -> (Self, SceneCommandChannel) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let host = Self {
            sender,
            base: Url::parse(generation_url).ok(),
        };
        (host, SceneCommandChannel { receiver })
    }
}

impl SceneHost for BevySceneHost {
    fn load_model(&self, reference: &str) -> Result<(), SceneError> {
        let resolved = resolve_model_reference(self.base.as_ref(), reference);
        self.sender
            .send(SceneCommand::Load(resolved))
            .map_err(|_| SceneError::Closed)
    }

    fn dispose(&self) {
        let _ = self.sender.send(SceneCommand::Dispose);
    }
}

/// Resolve `reference` against the generation endpoint (RFC 3986).
///
/// Without a base, or if the link cannot be joined, it is handed to the
/// asset server unchanged.
fn resolve_model_reference(base: Option<&Url>, reference: &str) -> String {
    let Some(base) = base else {
        return reference.to_string();
    };
    match base.join(reference) {
        Ok(url) => url.into(),
        Err(e) => {
            warn!("⚠️ Could not resolve model link {:?}: {}", reference, e);
            reference.to_string()
        }
    }
}

/// Apply the most recent scene command of this frame
pub fn apply_scene_commands_system(
    mut commands: Commands,
    channel: Res<SceneCommandChannel>,
    asset_server: Res<AssetServer>,
    existing: Query<Entity, With<AvatarModel>>,
) {
    // Load replaces and Dispose clears, so only the last command matters
    let Some(command) = channel.receiver.try_iter().last() else {
        return;
    };

    for entity in existing.iter() {
        commands.entity(entity).despawn();
    }

    match command {
        SceneCommand::Load(reference) => {
            info!("📦 Loading avatar from {}", reference);

            let scene: Handle<Scene> =
                asset_server.load(GltfAssetLabel::Scene(0).from_asset(reference.clone()));

            commands.spawn((
                Name::new("Avatar"),
                AvatarModel {
                    reference,
                    scene: scene.clone(),
                    settled: false,
                },
                SceneRoot(scene),
                Transform::default(),
            ));
        }
        SceneCommand::Dispose => {
            info!("🧹 Avatar removed from scene");
        }
    }
}

/// Log the load outcome of the avatar once
pub fn watch_avatar_load_system(
    asset_server: Res<AssetServer>,
    mut avatars: Query<&mut AvatarModel>,
) {
    for mut avatar in avatars.iter_mut() {
        if avatar.settled {
            continue;
        }

        match asset_server.load_state(&avatar.scene) {
            LoadState::Loaded => {
                info!("✅ Avatar loaded: {}", avatar.reference);
                avatar.settled = true;
            }
            LoadState::Failed(err) => {
                error!("❌ Failed to load avatar {}: {}", avatar.reference, err);
                avatar.settled = true;
            }
            _ => {
                // Still loading
            }
        }
    }
}

/// Slow turntable so the avatar can be inspected from all sides
pub fn turntable_system(time: Res<Time>, mut avatars: Query<&mut Transform, With<AvatarModel>>) {
    for mut transform in avatars.iter_mut() {
        transform.rotate_y(0.35 * time.delta_secs());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(url: &str) -> Url {
        Url::parse(url).unwrap()
    }

    #[test]
    fn test_absolute_reference_untouched() {
        let api = base("https://api.example.com/v1/avatars");
        assert_eq!(
            resolve_model_reference(Some(&api), "https://host/model.glb"),
            "https://host/model.glb"
        );
    }

    #[test]
    fn test_root_relative_reference_uses_service_host() {
        let api = base("https://api.example.com:8443/v1/avatars");
        assert_eq!(
            resolve_model_reference(Some(&api), "/media/avatars/a1.glb"),
            "https://api.example.com:8443/media/avatars/a1.glb"
        );
    }

    #[test]
    fn test_protocol_relative_reference_keeps_its_host() {
        let api = base("https://api.example.com/v1/avatars");
        assert_eq!(
            resolve_model_reference(Some(&api), "//cdn.example.com/a.glb"),
            "https://cdn.example.com/a.glb"
        );
    }

    #[test]
    fn test_path_relative_reference_follows_base_path() {
        let api = base("https://api.example.com/v1/avatars");
        assert_eq!(
            resolve_model_reference(Some(&api), "media/a.glb"),
            "https://api.example.com/v1/media/a.glb"
        );
    }

    #[test]
    fn test_base_query_is_not_carried_over() {
        let api = base("https://api.example.com?key=1");
        assert_eq!(
            resolve_model_reference(Some(&api), "/m.glb"),
            "https://api.example.com/m.glb"
        );
    }

    #[test]
    fn test_reference_without_base_untouched() {
        assert_eq!(resolve_model_reference(None, "media/a1.glb"), "media/a1.glb");
    }

    #[test]
    fn test_host_resolves_relative_links() {
        let (host, channel) = BevySceneHost::new("https://api.example.com/v1/avatars");

        host.load_model("/media/a1.glb").unwrap();

        assert_eq!(
            channel.receiver.try_recv(),
            Ok(SceneCommand::Load("https://api.example.com/media/a1.glb".to_string()))
        );
    }

    #[test]
    fn test_host_forwards_commands() {
        let (host, channel) = BevySceneHost::new("https://api.example.com/avatars");

        host.load_model("https://host/model.glb").unwrap();
        host.dispose();

        let received: Vec<SceneCommand> = channel.receiver.try_iter().collect();
        assert_eq!(
            received,
            vec![
                SceneCommand::Load("https://host/model.glb".to_string()),
                SceneCommand::Dispose,
            ]
        );
    }

    #[test]
    fn test_host_reports_closed_scene() {
        let (host, channel) = BevySceneHost::new("https://api.example.com/avatars");
        drop(channel);

        assert_eq!(host.load_model("https://host/model.glb"), Err(SceneError::Closed));
    }

    #[test]
    fn test_load_replaces_previous_avatar() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Scene>()
            .add_systems(Update, apply_scene_commands_system);

        // No base: references stay on the default asset source
        let (host, channel) = BevySceneHost::new("local");
        app.insert_resource(channel);

        host.load_model("first.glb").unwrap();
        app.update();
        host.load_model("second.glb").unwrap();
        app.update();

        let world = app.world_mut();
        let references: Vec<String> = world
            .query::<&AvatarModel>()
            .iter(world)
            .map(|a| a.reference.clone())
            .collect();
        assert_eq!(references, vec!["second.glb".to_string()]);

        host.dispose();
        app.update();
        let world = app.world_mut();
        assert_eq!(world.query::<&AvatarModel>().iter(world).count(), 0);
    }
}
