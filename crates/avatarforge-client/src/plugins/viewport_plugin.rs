//! # Viewport Plugin
//!
//! Camera, lighting and a ground disc for the avatar to stand on.

use bevy::prelude::*;
use std::f32::consts::FRAC_PI_2;

/// Where the camera looks: roughly chest height of a generated avatar
const FOCUS: Vec3 = Vec3::new(0.0, 1.0, 0.0);

pub struct ViewportPlugin;

impl Plugin for ViewportPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::srgb(0.11, 0.12, 0.15)))
            .add_systems(Startup, setup_viewport);
    }
}

fn setup_viewport(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // Camera
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 1.4, 3.2).looking_at(FOCUS, Vec3::Y),
    ));

    // Key light
    commands.spawn((
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(3.0, 6.0, 4.0).looking_at(FOCUS, Vec3::Y),
    ));

    // Fill light from the opposite side, no shadows
    commands.spawn((
        DirectionalLight {
            illuminance: 2500.0,
            ..default()
        },
        Transform::from_xyz(-4.0, 3.0, -2.0).looking_at(FOCUS, Vec3::Y),
    ));

    // Ground disc
    commands.spawn((
        Name::new("Ground"),
        Mesh3d(meshes.add(Circle::new(1.5))),
        MeshMaterial3d(materials.add(Color::srgb(0.25, 0.26, 0.3))),
        Transform::from_rotation(Quat::from_rotation_x(-FRAC_PI_2)),
    ));

    info!("🎥 Viewport ready");
}
