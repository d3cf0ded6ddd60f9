//! Upload overlay - selfie picker button and pipeline status line

use super::pipeline_worker::AvatarPipelineHandle;
use crate::components::{StatusText, UploadButton};
use avatarforge_common::{PipelineSnapshot, PipelineState};
use bevy::prelude::*;
use std::path::PathBuf;

const BUTTON_IDLE: Color = Color::srgb(0.20, 0.45, 0.85);
const BUTTON_HOVER: Color = Color::srgb(0.28, 0.55, 0.95);
const BUTTON_PRESSED: Color = Color::srgb(0.15, 0.35, 0.70);

const PROMPT: &str = "Upload a selfie to generate your avatar";

/// Spawn the overlay: button on top, status line below
pub fn setup_upload_ui(mut commands: Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            flex_direction: FlexDirection::Column,
            justify_content: JustifyContent::FlexEnd,
            align_items: AlignItems::Center,
            padding: UiRect::all(Val::Px(24.0)),
            row_gap: Val::Px(10.0),
            ..default()
        })
        .with_children(|root| {
            root.spawn((
                Button,
                UploadButton,
                Node {
                    padding: UiRect::axes(Val::Px(20.0), Val::Px(10.0)),
                    ..default()
                },
                BackgroundColor(BUTTON_IDLE),
            ))
            .with_children(|button| {
                button.spawn((
                    Text::new("Upload selfie"),
                    TextFont {
                        font_size: 20.0,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                ));
            });

            root.spawn((
                StatusText,
                Text::new(PROMPT),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(0.85, 0.85, 0.9)),
            ));
        });
}

/// Open the file picker when the upload button is pressed
pub fn upload_button_system(
    mut buttons: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<UploadButton>)>,
    handle: Res<AvatarPipelineHandle>,
) {
    for (interaction, mut color) in buttons.iter_mut() {
        match interaction {
            Interaction::Pressed => {
                *color = BackgroundColor(BUTTON_PRESSED);

                if !handle.snapshot().can_upload() {
                    continue;
                }

                let Some(path) = pick_selfie() else {
                    continue;
                };

                match handle.upload(path.clone()) {
                    Ok(run_id) => info!("📤 Upload {} started: {:?}", run_id, path),
                    Err(e) => warn!("⚠️ Upload ignored: {}", e),
                }
            }
            Interaction::Hovered => *color = BackgroundColor(BUTTON_HOVER),
            Interaction::None => *color = BackgroundColor(BUTTON_IDLE),
        }
    }
}

/// Mirror pipeline state into the overlay
pub fn pipeline_status_system(
    mut handle: ResMut<AvatarPipelineHandle>,
    mut status: Query<&mut Text, With<StatusText>>,
    mut buttons: Query<&mut Visibility, With<UploadButton>>,
) {
    if !handle.state.has_changed().unwrap_or(false) {
        return;
    }
    let snapshot = handle.state.borrow_and_update().clone();

    for mut text in status.iter_mut() {
        **text = status_line(&snapshot);
    }

    // Only one run at a time: hide the trigger while one is in flight
    let visibility = if snapshot.can_upload() {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    for mut button in buttons.iter_mut() {
        *button = visibility;
    }
}

/// Native file dialog filtered to common image formats
fn pick_selfie() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("Images", &["jpg", "jpeg", "png", "webp"])
        .set_title("Choose a selfie")
        .pick_file()
}

/// Text shown under the upload button
fn status_line(snapshot: &PipelineSnapshot) -> String {
    let verdict = snapshot
        .validation_message
        .as_deref()
        .map(|detail| format!(" (face check: {})", detail))
        .unwrap_or_default();

    match &snapshot.state {
        PipelineState::Idle => PROMPT.to_string(),
        PipelineState::AwaitingImage => "Preparing upload…".to_string(),
        PipelineState::Loading => format!("Generating avatar…{}", verdict),
        PipelineState::Completed(_) => format!("Avatar ready{}", verdict),
        PipelineState::Failed(_) => "Generation failed, try another photo".to_string(),
    }
}
