//! Editor UI components using bevy_egui
//!
//! The inspector panel edits the map and its source texture, the picker
//! window chooses the brush tile, and dialogs handle file actions.

mod dialogs;
mod inspector;
mod menu_bar;
mod picker;

pub use dialogs::*;
pub use inspector::render_inspector;
pub use menu_bar::render_menu_bar;
pub use picker::{picker_layout, render_tile_picker};

use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPrimaryContextPass};

use crate::preferences::EditorPreferences;
use crate::project::Project;
use crate::texture::SourceTextureCache;
use crate::{AssetsBasePath, EditorState};

/// Main UI plugin
pub struct EditorUiPlugin;

impl Plugin for EditorUiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<UiState>()
            .add_systems(EguiPrimaryContextPass, render_ui);
    }
}

/// UI state for panel sizes
#[derive(Resource)]
pub struct UiState {
    pub inspector_width: f32,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            inspector_width: 260.0,
        }
    }
}

fn render_ui(
    mut contexts: EguiContexts,
    mut ui_state: ResMut<UiState>,
    mut editor_state: ResMut<EditorState>,
    mut project: ResMut<Project>,
    mut preferences: ResMut<EditorPreferences>,
    cache: Res<SourceTextureCache>,
    assets_base_path: Res<AssetsBasePath>,
) {
    let Ok(ctx) = contexts.ctx_mut() else { return };

    edit_project(&mut project, |project| {
        render_menu_bar(ctx, &mut editor_state, project);

        bevy_egui::egui::SidePanel::right("inspector")
            .resizable(true)
            .default_width(ui_state.inspector_width)
            .show(ctx, |ui| {
                ui_state.inspector_width = ui.available_width();
                render_inspector(ui, &mut editor_state, project, &preferences, &cache);
            });

        if editor_state.show_picker {
            render_tile_picker(ctx, &mut editor_state, project, &cache);
        }

        render_dialogs(
            ctx,
            &mut editor_state,
            project,
            &mut preferences,
            &assets_base_path,
        );
    });

    sync_view_preferences(&editor_state, &mut preferences);
}

/// Hand `&mut Project` to widgets without flagging the resource every frame.
/// It is marked changed only when the edit counter moved.
fn edit_project(project: &mut ResMut<Project>, edit: impl FnOnce(&mut Project)) {
    let revision = project.revision();
    edit(project.bypass_change_detection());
    if project.revision() != revision {
        project.set_changed();
    }
}

/// Persist view toggles when they change
fn sync_view_preferences(editor_state: &EditorState, preferences: &mut ResMut<EditorPreferences>) {
    if preferences.show_grid == editor_state.show_grid
        && preferences.picker_zoom == editor_state.picker_zoom
    {
        return;
    }
    preferences.show_grid = editor_state.show_grid;
    preferences.picker_zoom = editor_state.picker_zoom;
    if let Err(e) = preferences.save() {
        warn!("Failed to save preferences: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Resource, Default)]
    struct MakeEdit(bool);

    #[derive(Resource, Default)]
    struct ChangedFrames(Vec<bool>);

    fn show_widgets(mut project: ResMut<Project>, make_edit: Res<MakeEdit>) {
        let make_edit = make_edit.0;
        edit_project(&mut project, |project| {
            let _ = project.map.as_mut();
            if make_edit {
                project.mark_dirty();
            }
        });
    }

    fn record_changes(project: Res<Project>, mut frames: ResMut<ChangedFrames>) {
        frames.0.push(project.is_changed());
    }

    #[test]
    fn test_project_changes_only_on_edits() {
        let mut app = App::new();
        app.init_resource::<Project>()
            .init_resource::<MakeEdit>()
            .init_resource::<ChangedFrames>()
            .add_systems(Update, (show_widgets, record_changes).chain());

        app.update();
        app.update();
        app.update();
        app.world_mut().resource_mut::<MakeEdit>().0 = true;
        app.update();

        assert_eq!(
            app.world().resource::<ChangedFrames>().0,
            vec![true, false, false, true]
        );
    }
}
