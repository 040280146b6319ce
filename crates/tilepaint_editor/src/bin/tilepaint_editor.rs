//! Standalone tile painter binary
//!
//! Run with: tilepaint_editor

use bevy::asset::{AssetPlugin, UnapprovedPathMode};
use bevy::image::{ImageFilterMode, ImageSamplerDescriptor};
use bevy::prelude::*;
use bevy::window::WindowResolution;
use std::path::PathBuf;
use tilepaint_editor::preferences::EditorPreferences;
use tilepaint_editor::project::Project;
use tilepaint_editor::{EditorState, TilePaintPlugin};

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Tile Painter".to_string(),
                        resolution: WindowResolution::new(1600, 900)
                            .with_scale_factor_override(1.0),
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin {
                    // Pixel art tiles stay crisp at any zoom
                    default_sampler: ImageSamplerDescriptor {
                        mag_filter: ImageFilterMode::Nearest,
                        min_filter: ImageFilterMode::Nearest,
                        mipmap_filter: ImageFilterMode::Nearest,
                        ..default()
                    },
                })
                .set(AssetPlugin {
                    // Projects may reference textures outside the assets folder
                    unapproved_path_mode: UnapprovedPathMode::Allow,
                    ..default()
                }),
        )
        .add_plugins(TilePaintPlugin::default())
        .add_systems(Startup, auto_open_last_project)
        .run();
}

/// Reopen the last project on startup if enabled in preferences
fn auto_open_last_project(
    mut project: ResMut<Project>,
    mut editor_state: ResMut<EditorState>,
    preferences: Res<EditorPreferences>,
) {
    if !preferences.auto_open_last_project {
        return;
    }
    let Some(last) = preferences.last_project.as_ref() else {
        return;
    };

    let path = PathBuf::from(last);
    if !path.exists() {
        warn!("Last project file not found: {}", last);
        return;
    }
    match Project::load(&path) {
        Ok(loaded) => {
            project.replace(loaded);
            editor_state.texture_path_input = project.source.path.clone().unwrap_or_default();
            info!("Auto-opened last project: {}", project.name());
        }
        Err(e) => warn!("Failed to auto-open project '{}': {}", last, e),
    }
}
