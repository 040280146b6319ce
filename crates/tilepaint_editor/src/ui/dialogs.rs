//! Dialog windows and deferred file actions

use bevy_egui::egui;
use std::path::Path;

use crate::preferences::EditorPreferences;
use crate::project::Project;
use crate::{AssetsBasePath, EditorState};

/// Actions that can be triggered from menus and the inspector
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    /// Create a map from the inspector's new-map form
    NewMap,
    Open,
    Save,
    SaveAs,
    /// Pick the source texture with a file dialog
    BrowseTexture,
    /// Assign the path typed into the inspector
    AssignTexture,
}

/// Render all dialogs and run the pending action
pub fn render_dialogs(
    ctx: &egui::Context,
    editor_state: &mut EditorState,
    project: &mut Project,
    preferences: &mut EditorPreferences,
    assets_base_path: &AssetsBasePath,
) {
    render_clear_tiles_dialog(ctx, editor_state, project);
    render_error_dialog(ctx, editor_state);

    if let Some(action) = editor_state.pending_action.take() {
        process_action(action, editor_state, project, preferences, assets_base_path);
    }
}

fn process_action(
    action: PendingAction,
    editor_state: &mut EditorState,
    project: &mut Project,
    preferences: &mut EditorPreferences,
    assets_base_path: &AssetsBasePath,
) {
    match action {
        PendingAction::NewMap => {
            let name = editor_state.new_map_name.trim();
            let name = if name.is_empty() { "TileMap" } else { name };
            project.create_map(
                name.to_string(),
                editor_state.new_map_rows.max(1),
                editor_state.new_map_columns.max(1),
            );
            if project.source.path.is_none() {
                project.source.pixels_per_unit = preferences.default_pixels_per_unit;
                project.source.slice_size = preferences.default_slice_size;
            }
            bevy::log::info!(
                "Created map '{}' ({} x {})",
                project.name(),
                editor_state.new_map_rows,
                editor_state.new_map_columns
            );
        }
        PendingAction::Open => {
            #[cfg(feature = "native")]
            {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Tile Map Project", &[crate::project::PROJECT_EXTENSION, "json"])
                    .pick_file()
                {
                    open_project(&path, editor_state, project, preferences);
                }
            }
        }
        PendingAction::Save => {
            if project.path.is_some() {
                if let Err(e) = project.save_current() {
                    editor_state.error_message = Some(format!("Failed to save: {}", e));
                }
            } else {
                // No path set, trigger Save As
                editor_state.pending_action = Some(PendingAction::SaveAs);
            }
        }
        PendingAction::SaveAs => {
            #[cfg(feature = "native")]
            {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Tile Map Project", &[crate::project::PROJECT_EXTENSION, "json"])
                    .set_file_name(format!("{}.{}", project.name(), crate::project::PROJECT_EXTENSION))
                    .save_file()
                {
                    match project.save(&path) {
                        Ok(()) => remember_project(&path, preferences),
                        Err(e) => {
                            editor_state.error_message = Some(format!("Failed to save: {}", e));
                        }
                    }
                }
            }
        }
        PendingAction::BrowseTexture => {
            #[cfg(feature = "native")]
            {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Images", &["png", "jpg", "jpeg", "bmp", "tga"])
                    .set_directory(assets_base_path.path())
                    .pick_file()
                {
                    match assets_base_path.to_relative_checked(&path) {
                        Ok(relative) => {
                            let relative = relative.to_string_lossy().to_string();
                            editor_state.texture_path_input = relative.clone();
                            assign_texture(project, preferences, Some(relative));
                        }
                        Err(e) => {
                            editor_state.error_message =
                                Some(format!("Cannot use texture: {}", e));
                        }
                    }
                }
            }
        }
        PendingAction::AssignTexture => {
            let path = editor_state.texture_path_input.trim();
            let path = (!path.is_empty()).then(|| crate::to_asset_path(path));
            assign_texture(project, preferences, path);
        }
    }

    #[cfg(not(feature = "native"))]
    let _ = assets_base_path;
}

/// Point the project at a new source texture; the slicer picks it up next frame
fn assign_texture(project: &mut Project, preferences: &EditorPreferences, path: Option<String>) {
    if project.source.path == path {
        return;
    }
    if project.source.path.is_none() {
        project.source.pixels_per_unit = preferences.default_pixels_per_unit;
        project.source.slice_size = preferences.default_slice_size;
    }
    match &path {
        Some(p) => bevy::log::info!("Assigned source texture: {}", p),
        None => bevy::log::info!("Removed source texture"),
    }
    project.set_texture_path(path);
}

/// Load a project file into the editor
pub fn open_project(
    path: &Path,
    editor_state: &mut EditorState,
    project: &mut Project,
    preferences: &mut EditorPreferences,
) {
    match Project::load(path) {
        Ok(loaded) => {
            project.replace(loaded);
            editor_state.texture_path_input = project.source.path.clone().unwrap_or_default();
            remember_project(path, preferences);
            bevy::log::info!("Opened project {:?}", path);
        }
        Err(e) => {
            editor_state.error_message = Some(format!("Failed to load project: {}", e));
        }
    }
}

fn remember_project(path: &Path, preferences: &mut EditorPreferences) {
    preferences.set_last_project(path.to_string_lossy());
    if let Err(e) = preferences.save() {
        bevy::log::warn!("Failed to save preferences: {}", e);
    }
}

fn render_clear_tiles_dialog(
    ctx: &egui::Context,
    editor_state: &mut EditorState,
    project: &mut Project,
) {
    if !editor_state.confirm_clear {
        return;
    }

    egui::Window::new("Clear map tiles?")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label("Are you sure?");
            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Clear").clicked() {
                    if let Some(map) = project.map.as_mut() {
                        let removed = map.clear();
                        bevy::log::info!("Cleared {} tiles", removed);
                        if removed > 0 {
                            project.mark_dirty();
                        }
                    }
                    editor_state.confirm_clear = false;
                }
                if ui.button("Do not clear").clicked() {
                    editor_state.confirm_clear = false;
                }
            });
        });
}

fn render_error_dialog(ctx: &egui::Context, editor_state: &mut EditorState) {
    let Some(error_msg) = editor_state.error_message.clone() else {
        return;
    };

    egui::Window::new("Error")
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(&error_msg);
            ui.separator();
            if ui.button("OK").clicked() {
                editor_state.error_message = None;
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_map_action_uses_form() {
        let mut editor_state = EditorState {
            new_map_name: "  ".to_string(),
            new_map_rows: 6,
            new_map_columns: 9,
            ..Default::default()
        };
        let mut project = Project::default();
        let mut preferences = EditorPreferences::default();
        let base = AssetsBasePath::new("assets");

        process_action(
            PendingAction::NewMap,
            &mut editor_state,
            &mut project,
            &mut preferences,
            &base,
        );

        let map = project.map.as_ref().unwrap();
        assert_eq!(map.name, "TileMap");
        assert_eq!(map.grid().rows, 6);
        assert_eq!(map.grid().columns, 9);
        assert!(project.dirty);
    }

    #[test]
    fn test_assign_texture_from_input() {
        let mut editor_state = EditorState {
            texture_path_input: "tiles\\forest.png".to_string(),
            ..Default::default()
        };
        let mut project = Project::default();
        let mut preferences = EditorPreferences {
            default_slice_size: [16, 16],
            ..Default::default()
        };
        let base = AssetsBasePath::new("assets");

        process_action(
            PendingAction::AssignTexture,
            &mut editor_state,
            &mut project,
            &mut preferences,
            &base,
        );
        assert_eq!(project.source.path.as_deref(), Some("tiles/forest.png"));
        assert_eq!(project.source.slice_size, [16, 16]);
        assert!(project.dirty);

        editor_state.texture_path_input.clear();
        process_action(
            PendingAction::AssignTexture,
            &mut editor_state,
            &mut project,
            &mut preferences,
            &base,
        );
        assert!(project.source.path.is_none());
    }

    #[test]
    fn test_save_without_path_asks_for_one() {
        let mut editor_state = EditorState::default();
        let mut project = Project::default();
        let mut preferences = EditorPreferences::default();
        let base = AssetsBasePath::new("assets");

        process_action(
            PendingAction::Save,
            &mut editor_state,
            &mut project,
            &mut preferences,
            &base,
        );
        assert_eq!(editor_state.pending_action, Some(PendingAction::SaveAs));
        assert!(editor_state.error_message.is_none());
    }
}
