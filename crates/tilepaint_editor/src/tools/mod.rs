//! Viewport input: hover, paint/erase with modifiers, pan and zoom
//!
//! Holding Shift paints the brush into the cell under the cursor, holding
//! Alt erases it. Each system run handles one frame's input to completion.

use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;
use bevy_egui::EguiContexts;
use tilepaint_core::{MapEdit, PaintAction, TileError};

use crate::project::Project;
use crate::render::{root_for_map, TileMapRoot};
use crate::EditorState;

/// Plugin for viewport input
pub struct EditorToolsPlugin;

impl Plugin for EditorToolsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ViewportInputState>()
            .add_systems(Update, (handle_viewport_input, handle_zoom_input));
    }
}

/// State for viewport input handling
#[derive(Resource, Default)]
pub struct ViewportInputState {
    /// Whether we're currently panning
    pub is_panning: bool,
    pub pan_start_pos: Option<Vec2>,
    /// Edits made since the modifier was pressed
    pub stroke_edits: usize,
    pub stroke_action: Option<PaintAction>,
}

/// Convert a world position into the map root's local space
pub fn world_to_local(root: &GlobalTransform, world: Vec2) -> Vec2 {
    root.affine()
        .inverse()
        .transform_point3(world.extend(0.0))
        .truncate()
}

fn modifiers_held(keyboard: &ButtonInput<KeyCode>) -> (bool, bool) {
    let shift = keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);
    let alt = keyboard.any_pressed([KeyCode::AltLeft, KeyCode::AltRight]);
    (shift, alt)
}

fn finish_stroke(input_state: &mut ViewportInputState) {
    if let Some(action) = input_state.stroke_action.take() {
        if input_state.stroke_edits > 0 {
            debug!(
                "{} stroke finished: {} cells changed",
                action.label(),
                input_state.stroke_edits
            );
        }
    }
    input_state.stroke_edits = 0;
}

/// Clear the hovered cell without touching change detection when already clear
fn clear_hover(project: &mut ResMut<Project>) {
    if project.map.as_ref().is_some_and(|m| m.brush().hovered().is_some()) {
        if let Some(map) = project.map.as_mut() {
            map.clear_hover();
        }
    }
}

fn handle_viewport_input(
    mut contexts: EguiContexts,
    mut editor_state: ResMut<EditorState>,
    mut project: ResMut<Project>,
    mut input_state: ResMut<ViewportInputState>,
    windows: Query<&Window>,
    camera_q: Query<(&Camera, &GlobalTransform), With<Camera2d>>,
    roots: Query<(&GlobalTransform, &TileMapRoot)>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
) {
    let Ok(ctx) = contexts.ctx_mut() else { return };

    let Some(window) = windows.iter().next() else {
        return;
    };
    let Some((camera, camera_transform)) = camera_q.iter().next() else {
        return;
    };

    let Some(cursor_position) = window.cursor_position() else {
        input_state.is_panning = false;
        finish_stroke(&mut input_state);
        clear_hover(&mut project);
        return;
    };

    // Panels and the picker window own the pointer while it is over them
    if ctx.is_pointer_over_area() || ctx.is_using_pointer() {
        input_state.is_panning = false;
        finish_stroke(&mut input_state);
        clear_hover(&mut project);
        return;
    }

    // Pan with the middle mouse button
    if mouse_buttons.pressed(MouseButton::Middle) {
        if let Some(start_pos) = input_state.pan_start_pos.filter(|_| input_state.is_panning) {
            let delta = cursor_position - start_pos;
            editor_state.camera_offset.x -= delta.x / editor_state.zoom;
            editor_state.camera_offset.y += delta.y / editor_state.zoom;
        }
        input_state.is_panning = true;
        input_state.pan_start_pos = Some(cursor_position);
    } else {
        input_state.is_panning = false;
        input_state.pan_start_pos = None;
    }

    let Ok(world_pos) = camera.viewport_to_world_2d(camera_transform, cursor_position) else {
        return;
    };

    let Some(map_id) = project.map.as_ref().map(|m| m.id) else {
        return;
    };
    let Some(root) = root_for_map(roots.iter(), map_id) else {
        return;
    };
    let local = world_to_local(root, world_pos);
    let local = [local.x, local.y];
    let origin = root.translation().truncate();
    let origin = [origin.x, origin.y];

    let previous_hover = project.map.as_ref().and_then(|m| m.brush().hovered());
    let hovered = project
        .map
        .as_ref()
        .and_then(|m| m.geometry().cell_from_point(local).ok());
    if hovered != previous_hover {
        if let Some(map) = project.map.as_mut() {
            map.hover(local);
        }
    }

    let (shift, alt) = modifiers_held(&keyboard);
    let Some(action) = PaintAction::from_modifiers(shift, alt) else {
        finish_stroke(&mut input_state);
        return;
    };
    if input_state.stroke_action != Some(action) {
        finish_stroke(&mut input_state);
        input_state.stroke_action = Some(action);
    }

    // Off-grid pointer positions are silently ignored
    if hovered.is_none() {
        return;
    }

    let Some(map) = project.map.as_mut() else {
        return;
    };
    match map.apply(action, local, origin) {
        Ok(MapEdit::Unchanged) => {}
        Ok(edit) => {
            trace!("{:?}", edit);
            input_state.stroke_edits += 1;
            project.mark_dirty();
        }
        Err(TileError::OutsideGrid) => {}
        Err(e) => warn!("{} failed: {}", action.label(), e),
    }
}

fn handle_zoom_input(
    mut contexts: EguiContexts,
    mut editor_state: ResMut<EditorState>,
    mut scroll_events: MessageReader<MouseWheel>,
) {
    let Ok(ctx) = contexts.ctx_mut() else { return };
    let over_ui = ctx.is_pointer_over_area() || ctx.is_using_pointer();

    for event in scroll_events.read() {
        if over_ui {
            continue;
        }
        let zoom_delta = event.y * 0.1;
        editor_state.zoom = (editor_state.zoom * (1.0 + zoom_delta)).clamp(0.05, 20.0);
    }
}
