//! Inspector panel for the tile map

use bevy_egui::egui;

use super::PendingAction;
use crate::preferences::EditorPreferences;
use crate::project::Project;
use crate::texture::SourceTextureCache;
use crate::EditorState;

/// Render the inspector panel contents
pub fn render_inspector(
    ui: &mut egui::Ui,
    editor_state: &mut EditorState,
    project: &mut Project,
    preferences: &EditorPreferences,
    cache: &SourceTextureCache,
) {
    ui.heading("Tile Map");
    ui.separator();

    if project.map.is_none() {
        render_new_map_form(ui, editor_state);
        return;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        render_map_section(ui, project);
        ui.separator();
        render_texture_section(ui, editor_state, project, preferences, cache);
        ui.separator();
        render_info_section(ui, project);
        ui.separator();
        render_paint_section(ui, editor_state, project);
    });
}

fn render_new_map_form(ui: &mut egui::Ui, editor_state: &mut EditorState) {
    ui.colored_label(egui::Color32::YELLOW, "No tile map in this project.");
    ui.add_space(4.0);

    egui::Grid::new("new_map_grid")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui| {
            ui.label("Name:");
            ui.text_edit_singleline(&mut editor_state.new_map_name);
            ui.end_row();

            ui.label("Rows:");
            ui.add(egui::DragValue::new(&mut editor_state.new_map_rows).range(1..=1024));
            ui.end_row();

            ui.label("Columns:");
            ui.add(egui::DragValue::new(&mut editor_state.new_map_columns).range(1..=1024));
            ui.end_row();
        });

    ui.add_space(4.0);
    if ui.button("Create Tile Map").clicked() {
        editor_state.pending_action = Some(PendingAction::NewMap);
    }
}

fn render_map_section(ui: &mut egui::Ui, project: &mut Project) {
    let Some(map) = project.map.as_mut() else {
        return;
    };
    let mut changed = false;

    egui::Grid::new("map_grid")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui| {
            ui.label("Name:");
            changed |= ui.text_edit_singleline(&mut map.name).changed();
            ui.end_row();

            let mut rows = map.grid().rows;
            let mut columns = map.grid().columns;
            ui.label("Rows:");
            let rows_changed = ui
                .add(egui::DragValue::new(&mut rows).range(1..=1024))
                .changed();
            ui.end_row();
            ui.label("Columns:");
            let columns_changed = ui
                .add(egui::DragValue::new(&mut columns).range(1..=1024))
                .changed();
            ui.end_row();

            if rows_changed || columns_changed {
                let dropped = map.set_dimensions(rows, columns);
                if !dropped.is_empty() {
                    bevy::log::info!("Resize dropped {} tiles outside the grid", dropped.len());
                }
                changed = true;
            }
        });

    let mut origin = project.origin;
    ui.horizontal(|ui| {
        ui.label("Origin:");
        let x = ui.add(egui::DragValue::new(&mut origin[0]).speed(0.1).prefix("x "));
        let y = ui.add(egui::DragValue::new(&mut origin[1]).speed(0.1).prefix("y "));
        if x.changed() || y.changed() {
            project.set_origin(origin);
        }
    });

    if changed {
        project.mark_dirty();
    }
}

fn render_texture_section(
    ui: &mut egui::Ui,
    editor_state: &mut EditorState,
    project: &mut Project,
    preferences: &EditorPreferences,
    cache: &SourceTextureCache,
) {
    ui.label("Source Texture");

    ui.horizontal(|ui| {
        let response = ui.add(
            egui::TextEdit::singleline(&mut editor_state.texture_path_input)
                .hint_text("tiles/sheet.png")
                .desired_width(140.0),
        );
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if submitted || ui.button("Assign").clicked() {
            editor_state.pending_action = Some(PendingAction::AssignTexture);
        }
        #[cfg(feature = "native")]
        if ui.button("Browse...").clicked() {
            editor_state.pending_action = Some(PendingAction::BrowseTexture);
        }
    });

    let mut source = project.source.clone();
    egui::Grid::new("slice_grid")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui| {
            ui.label("Slice Size:");
            ui.horizontal(|ui| {
                ui.add(egui::DragValue::new(&mut source.slice_size[0]).range(1..=4096));
                ui.label("x");
                ui.add(egui::DragValue::new(&mut source.slice_size[1]).range(1..=4096));
            });
            ui.end_row();

            ui.label("Pixels Per Unit:");
            ui.add(egui::DragValue::new(&mut source.pixels_per_unit).range(1..=4096));
            ui.end_row();
        });
    if ui
        .small_button("Use defaults")
        .on_hover_text("Slice size and pixels per unit from preferences")
        .clicked()
    {
        source.slice_size = preferences.default_slice_size;
        source.pixels_per_unit = preferences.default_pixels_per_unit;
    }
    if source != project.source {
        project.source = source;
        project.mark_dirty();
    }

    match (&project.source.path, &cache.load_error) {
        (None, _) => {
            ui.colored_label(
                egui::Color32::YELLOW,
                "You have not selected a source texture yet.",
            );
        }
        (Some(_), Some(err)) => {
            ui.colored_label(egui::Color32::RED, format!("Failed to load: {}", err));
        }
        (Some(_), None) if !cache.is_ready() => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading texture...");
            });
        }
        (Some(_), None) => {
            let tile_count = project
                .map
                .as_ref()
                .and_then(|m| m.catalog())
                .map_or(0, |c| c.tile_count());
            if tile_count == 0 {
                ui.colored_label(
                    egui::Color32::YELLOW,
                    "Slice size is larger than the texture.",
                );
            }
        }
    }
}

fn render_info_section(ui: &mut egui::Ui, project: &Project) {
    let Some(map) = project.map.as_ref() else {
        return;
    };
    let grid = map.grid();
    let geometry = map.geometry();

    egui::Grid::new("info_grid")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .striped(true)
        .show(ui, |ui| {
            ui.label("Single Tile Size:");
            ui.label(format!(
                "{} x {} px",
                grid.tile_size_pixels[0], grid.tile_size_pixels[1]
            ));
            ui.end_row();

            ui.label("Grid Size in Units:");
            let [width, height] = geometry.extent();
            ui.label(format!("{:.2} x {:.2}", width, height));
            ui.end_row();

            ui.label("Pixels to Units:");
            ui.label(format!("1:{}", grid.pixels_per_unit));
            ui.end_row();

            ui.label("Selected Tile:");
            match map.selected_tile() {
                Some(id) => ui.label(format!(
                    "{} (painted in {} cells)",
                    id.get(),
                    map.ledger().cells_using(id).len()
                )),
                None => ui.label("none"),
            };
            ui.end_row();

            ui.label("Placed Tiles:");
            ui.label(map.ledger().len().to_string());
            ui.end_row();
        });

    if geometry.is_degraded() && map.catalog().is_some() {
        ui.colored_label(
            egui::Color32::RED,
            "Tile size or pixels per unit is zero; painting is disabled.",
        );
    }
}

fn render_paint_section(ui: &mut egui::Ui, editor_state: &mut EditorState, project: &Project) {
    if project.map.as_ref().is_some_and(|m| m.catalog().is_none()) {
        ui.colored_label(
            egui::Color32::YELLOW,
            "You have not assigned a texture to the TileMap",
        );
    }
    ui.label("Hold Shift to draw");
    ui.label("Hold Alt to erase");
    ui.add_space(4.0);

    let has_tiles = project.map.as_ref().is_some_and(|m| !m.ledger().is_empty());
    if ui
        .add_enabled(has_tiles, egui::Button::new("Clear Tiles"))
        .clicked()
    {
        editor_state.confirm_clear = true;
    }

    ui.separator();
    ui.checkbox(&mut editor_state.show_grid, "Show Grid");
    ui.checkbox(&mut editor_state.show_picker, "Show Tile Picker");

    ui.separator();
    ui.horizontal(|ui| {
        if ui.button("Open...").clicked() {
            editor_state.pending_action = Some(PendingAction::Open);
        }
        if ui.button("Save").clicked() {
            editor_state.pending_action = Some(PendingAction::Save);
        }
    });
}
