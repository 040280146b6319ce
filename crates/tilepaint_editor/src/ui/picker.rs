//! Tile picker window
//!
//! Shows the whole source texture at the chosen zoom and turns a click into
//! a brush selection. Tiles are numbered row-major from the top-left, the
//! same order the atlas slices them in.

use bevy_egui::egui;
use tilepaint_core::{PickerLayout, TileError, ZoomScale};

use crate::project::Project;
use crate::texture::SourceTextureCache;
use crate::EditorState;

const SELECTION_COLOR: egui::Color32 = egui::Color32::from_rgba_premultiplied(0, 51, 102, 102);

/// Picker layout for the loaded texture, or `None` until it is sliced
pub fn picker_layout(
    project: &Project,
    cache: &SourceTextureCache,
    zoom: ZoomScale,
) -> Option<PickerLayout> {
    let catalog = project.map.as_ref()?.catalog()?;
    let [width, height] = catalog.texture_size();
    if width == 0 || height == 0 || !cache.is_ready() {
        return None;
    }
    Some(PickerLayout::new(
        [width as f32, height as f32],
        catalog.tile_size_pixels(),
        zoom,
    ))
}

/// Render the picker window
pub fn render_tile_picker(
    ctx: &egui::Context,
    editor_state: &mut EditorState,
    project: &mut Project,
    cache: &SourceTextureCache,
) {
    let mut open = editor_state.show_picker;

    egui::Window::new("Tile Picker")
        .open(&mut open)
        .default_size([320.0, 360.0])
        .resizable(true)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Zoom:");
                egui::ComboBox::from_id_salt("picker_zoom")
                    .selected_text(editor_state.picker_zoom.label())
                    .show_ui(ui, |ui| {
                        for zoom in ZoomScale::all() {
                            ui.selectable_value(&mut editor_state.picker_zoom, *zoom, zoom.label());
                        }
                    });
            });
            ui.separator();

            if project.map.is_none() {
                ui.label("Create a tile map first.");
                return;
            }
            if project.source.path.is_none() {
                ui.colored_label(
                    egui::Color32::YELLOW,
                    "You have not selected a source texture yet.",
                );
                return;
            }
            let (Some(texture_id), Some(layout)) = (
                cache.egui_texture,
                picker_layout(project, cache, editor_state.picker_zoom),
            ) else {
                ui.spinner();
                return;
            };

            egui::ScrollArea::both().show(ui, |ui| {
                render_sheet(ui, texture_id, layout, project);
            });
        });

    editor_state.show_picker = open;
}

fn render_sheet(
    ui: &mut egui::Ui,
    texture_id: egui::TextureId,
    layout: PickerLayout,
    project: &mut Project,
) {
    let [width, height] = layout.scaled_texture();
    let (rect, response) =
        ui.allocate_exact_size(egui::vec2(width, height), egui::Sense::click());

    ui.painter().image(
        texture_id,
        rect,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );

    let layout = layout.with_offset([rect.min.x, rect.min.y]);

    if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            select_at(&layout, [pos.x, pos.y], project);
        }
    }

    let selected = project.map.as_ref().and_then(|m| m.selected_tile());
    if let Some(cell) = selected.and_then(|id| layout.selection_for_id(id).ok()) {
        let [x, y, w, h] = layout.selection_rect(cell);
        let highlight = egui::Rect::from_min_size(egui::pos2(x, y), egui::vec2(w, h));
        ui.painter().rect_filled(highlight, 0.0, SELECTION_COLOR);
        ui.painter().rect_stroke(
            highlight,
            0.0,
            egui::Stroke::new(1.0, egui::Color32::from_rgb(0, 128, 255)),
            egui::StrokeKind::Inside,
        );
    }

    response.on_hover_cursor(egui::CursorIcon::PointingHand);
}

/// Select the tile under a point in screen space
fn select_at(layout: &PickerLayout, point: [f32; 2], project: &mut Project) {
    let Some(cell) = layout.selection_from_point(point) else {
        return;
    };
    let Some(map) = project.map.as_mut() else {
        return;
    };
    let result = layout
        .tile_id(cell)
        .and_then(|id| map.select_tile(id.get()));
    match result {
        Ok(id) => {
            bevy::log::debug!("Selected tile {}", id.get());
            project.mark_dirty();
        }
        Err(TileError::InvalidTileId(raw)) => {
            bevy::log::warn!("Tile {} is not in the source texture", raw)
        }
        Err(e) => bevy::log::warn!("Tile selection failed: {}", e),
    }
}
