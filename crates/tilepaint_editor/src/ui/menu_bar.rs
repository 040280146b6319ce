//! Menu bar UI

use bevy_egui::egui;

use super::PendingAction;
use crate::project::Project;
use crate::EditorState;

/// Render the menu bar
pub fn render_menu_bar(ctx: &egui::Context, editor_state: &mut EditorState, project: &Project) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Open Project...").clicked() {
                    editor_state.pending_action = Some(PendingAction::Open);
                    ui.close();
                }
                ui.separator();
                if ui.button("Save").clicked() {
                    editor_state.pending_action = Some(PendingAction::Save);
                    ui.close();
                }
                if ui.button("Save As...").clicked() {
                    editor_state.pending_action = Some(PendingAction::SaveAs);
                    ui.close();
                }
            });

            ui.menu_button("Map", |ui| {
                let has_tiles = project.map.as_ref().is_some_and(|m| !m.ledger().is_empty());
                if ui
                    .add_enabled(has_tiles, egui::Button::new("Clear Tiles..."))
                    .clicked()
                {
                    editor_state.confirm_clear = true;
                    ui.close();
                }
            });

            ui.menu_button("View", |ui| {
                ui.checkbox(&mut editor_state.show_grid, "Grid");
                ui.checkbox(&mut editor_state.show_picker, "Tile Picker");
                ui.separator();
                if ui.button("Reset Camera").clicked() {
                    editor_state.camera_offset = bevy::math::Vec2::ZERO;
                    editor_state.zoom = 1.0;
                    ui.close();
                }
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let marker = if project.dirty { "*" } else { "" };
                ui.label(format!("{}{}", project.name(), marker));
            });
        });
    });
}
