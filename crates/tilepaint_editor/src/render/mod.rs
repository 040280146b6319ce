//! Scene rendering for the tile map
//!
//! The map is a root entity at the project origin with a `Tiles` child that
//! parents one sprite per placed tile. A translucent brush sprite follows
//! the hovered cell, and gizmos outline the grid.

use bevy::math::Isometry2d;
use bevy::prelude::*;
use std::collections::HashMap;
use tilepaint_core::{Cell, TileId, TileMap};
use uuid::Uuid;

use crate::project::Project;
use crate::texture::{atlas_index, SourceTextureCache};
use crate::EditorState;

/// Plugin for map rendering
pub struct MapRenderPlugin;

impl Plugin for MapRenderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RenderState>()
            .add_systems(
                Update,
                (sync_map_root, sync_placed_tiles, sync_brush_preview).chain(),
            )
            .add_systems(Update, draw_grid_gizmos)
            .add_systems(Update, update_camera_from_editor_state);
    }
}

/// Entities spawned for the current map
#[derive(Resource, Default)]
pub struct RenderState {
    /// Map the entities below belong to
    pub rendered_map: Option<Uuid>,
    pub root: Option<Entity>,
    pub tiles_parent: Option<Entity>,
    pub brush: Option<Entity>,
    /// Placed tile sprites by cell, with the tile each one shows
    pub sprites: HashMap<Cell, (Entity, TileId)>,
    /// Atlas the sprites were built with; a new atlas forces a rebuild
    pub rendered_layout: Option<AssetId<TextureAtlasLayout>>,
}

/// Root entity of the tile map; its transform is the grid origin
#[derive(Component)]
pub struct TileMapRoot {
    pub map_id: Uuid,
}

/// Transform of the root spawned for `map_id`.
///
/// A replaced map's root lingers until its despawn is applied.
pub fn root_for_map<'a>(
    roots: impl IntoIterator<Item = (&'a GlobalTransform, &'a TileMapRoot)>,
    map_id: Uuid,
) -> Option<&'a GlobalTransform> {
    roots
        .into_iter()
        .find(|(_, root)| root.map_id == map_id)
        .map(|(transform, _)| transform)
}

/// Parent of every placed tile sprite
#[derive(Component)]
pub struct TilesContainer;

/// Sprite for one placed tile
#[derive(Component)]
pub struct PlacedTileSprite;

/// Translucent preview of the brush under the cursor
#[derive(Component)]
pub struct BrushPreview;

const GRID_COLOR: Color = Color::srgb(0.5, 0.5, 0.5);
const BORDER_COLOR: Color = Color::WHITE;
const BRUSH_COLOR: Color = Color::srgb(1.0, 0.0, 0.0);
const BRUSH_TINT: Color = Color::srgba(1.0, 1.0, 1.0, 0.6);

fn vec2(v: [f32; 2]) -> Vec2 {
    Vec2::new(v[0], v[1])
}

/// Sprite showing `tile` from the source texture at its size in units
fn tile_sprite(
    map: &TileMap,
    tile: TileId,
    cache: &SourceTextureCache,
    tint: Color,
) -> Option<Sprite> {
    let image = cache.image.clone()?;
    let layout = cache.layout.clone()?;
    let sub_image = map.catalog()?.sub_image(tile).ok()?;

    let mut sprite = Sprite::from_atlas_image(
        image,
        TextureAtlas {
            layout,
            index: atlas_index(tile),
        },
    );
    sprite.custom_size = Some(vec2(sub_image.size_units));
    sprite.color = tint;
    Some(sprite)
}

fn despawn_all(commands: &mut Commands, render_state: &mut RenderState) {
    if let Some(root) = render_state.root.take() {
        let _ = commands.get_entity(root).map(|mut e| e.despawn());
    }
    render_state.tiles_parent = None;
    render_state.brush = None;
    render_state.sprites.clear();
    render_state.rendered_map = None;
    render_state.rendered_layout = None;
}

/// Spawn or despawn the root entity and keep it at the project origin
fn sync_map_root(
    mut commands: Commands,
    mut render_state: ResMut<RenderState>,
    project: Res<Project>,
    mut roots: Query<&mut Transform, With<TileMapRoot>>,
) {
    let map_id = project.map.as_ref().map(|m| m.id);

    if render_state.rendered_map != map_id {
        despawn_all(&mut commands, &mut render_state);

        if let Some(map_id) = map_id {
            let origin = vec2(project.origin);
            let root = commands
                .spawn((
                    Name::new(project.name().to_string()),
                    TileMapRoot { map_id },
                    Transform::from_translation(origin.extend(0.0)),
                    Visibility::default(),
                ))
                .id();
            let tiles = commands
                .spawn((
                    Name::new("Tiles"),
                    TilesContainer,
                    Transform::default(),
                    Visibility::default(),
                    ChildOf(root),
                ))
                .id();
            let brush = commands
                .spawn((
                    Name::new("Brush"),
                    BrushPreview,
                    Sprite::default(),
                    Transform::from_xyz(0.0, 0.0, 1.0),
                    Visibility::Hidden,
                    ChildOf(root),
                ))
                .id();

            render_state.root = Some(root);
            render_state.tiles_parent = Some(tiles);
            render_state.brush = Some(brush);
            render_state.rendered_map = Some(map_id);
            info!("Spawned tile map '{}'", project.name());
        }
        return;
    }

    if let Some(root) = render_state.root {
        if let Ok(mut transform) = roots.get_mut(root) {
            let origin = vec2(project.origin);
            if transform.translation.truncate() != origin {
                transform.translation = origin.extend(transform.translation.z);
            }
        }
    }
}

/// Mirror the placement ledger as sprites under the `Tiles` container
fn sync_placed_tiles(
    mut commands: Commands,
    mut render_state: ResMut<RenderState>,
    project: Res<Project>,
    cache: Res<SourceTextureCache>,
) {
    let Some(map) = project.map.as_ref() else {
        return;
    };
    let Some(parent) = render_state.tiles_parent else {
        return;
    };

    let layout_id = cache.layout.as_ref().map(|h| h.id());
    let layout_changed = render_state.rendered_layout != layout_id;
    if !project.is_changed() && !cache.is_changed() && !layout_changed {
        return;
    }

    if layout_changed {
        for (_, (entity, _)) in render_state.sprites.drain() {
            let _ = commands.get_entity(entity).map(|mut e| e.despawn());
        }
        render_state.rendered_layout = layout_id;
    }

    // Drop sprites whose cell was erased or repainted with another tile
    let stale: Vec<Cell> = render_state
        .sprites
        .iter()
        .filter(|(cell, (_, tile))| map.ledger().get(**cell).map(|p| p.tile) != Some(*tile))
        .map(|(cell, _)| *cell)
        .collect();
    for cell in stale {
        if let Some((entity, _)) = render_state.sprites.remove(&cell) {
            let _ = commands.get_entity(entity).map(|mut e| e.despawn());
        }
    }

    let geometry = map.geometry();
    for placed in map.ledger().iter() {
        if render_state.sprites.contains_key(&placed.cell) {
            continue;
        }
        let Ok(local) = geometry.cell_center(placed.cell, [0.0, 0.0]) else {
            continue;
        };
        let Some(sprite) = tile_sprite(map, placed.tile, &cache, Color::WHITE) else {
            continue;
        };

        let entity = commands
            .spawn((
                Name::new(format!("tile_{}_{}", placed.cell.row, placed.cell.column)),
                PlacedTileSprite,
                sprite,
                Transform::from_translation(vec2(local).extend(0.0)),
                ChildOf(parent),
            ))
            .id();
        render_state.sprites.insert(placed.cell, (entity, placed.tile));
    }
}

/// Move the brush preview to the hovered cell and show the selected tile
fn sync_brush_preview(
    render_state: Res<RenderState>,
    project: Res<Project>,
    cache: Res<SourceTextureCache>,
    mut brushes: Query<(&mut Sprite, &mut Transform, &mut Visibility), With<BrushPreview>>,
) {
    let Some(brush_entity) = render_state.brush else {
        return;
    };
    let Ok((mut sprite, mut transform, mut visibility)) = brushes.get_mut(brush_entity) else {
        return;
    };
    let Some(map) = project.map.as_ref() else {
        return;
    };

    let hovered = map.brush().hovered();
    let center = hovered.and_then(|cell| map.geometry().cell_center(cell, [0.0, 0.0]).ok());
    let tile_sprite = map
        .brush()
        .tile()
        .and_then(|tile| tile_sprite(map, tile, &cache, BRUSH_TINT));

    match (center, tile_sprite) {
        (Some(center), Some(new_sprite)) => {
            transform.translation = vec2(center).extend(1.0);
            if sprite.texture_atlas.as_ref().map(|a| a.index)
                != new_sprite.texture_atlas.as_ref().map(|a| a.index)
                || sprite.custom_size != new_sprite.custom_size
            {
                *sprite = new_sprite;
            }
            *visibility = Visibility::Inherited;
        }
        _ => *visibility = Visibility::Hidden,
    }
}

/// Gray cell outlines, white border and red brush box
fn draw_grid_gizmos(
    mut gizmos: Gizmos,
    editor_state: Res<EditorState>,
    project: Res<Project>,
    roots: Query<(&GlobalTransform, &TileMapRoot)>,
) {
    if !editor_state.show_grid {
        return;
    }
    let Some(map) = project.map.as_ref() else {
        return;
    };
    let geometry = map.geometry();
    if geometry.is_degraded() {
        return;
    }
    let origin = root_for_map(roots.iter(), map.id)
        .map(|t| t.translation().truncate())
        .unwrap_or_else(|| vec2(project.origin));
    let origin = [origin.x, origin.y];

    let tile_size = vec2(geometry.tile_size_units);
    for center in geometry.cell_centers(origin) {
        gizmos.rect_2d(Isometry2d::from_translation(vec2(center)), tile_size, GRID_COLOR);
    }

    gizmos.rect_2d(
        Isometry2d::from_translation(vec2(geometry.center(origin))),
        vec2(geometry.extent()),
        BORDER_COLOR,
    );

    if let Some(cell) = map.brush().hovered() {
        if let Ok(center) = geometry.cell_center(cell, origin) {
            let size = map.brush().size_units();
            let size = if size[0] > 0.0 { vec2(size) } else { tile_size };
            gizmos.rect_2d(Isometry2d::from_translation(vec2(center)), size, BRUSH_COLOR);
        }
    }
}

/// Apply the editor's pan and zoom to the 2D camera
fn update_camera_from_editor_state(
    editor_state: Res<EditorState>,
    mut camera_query: Query<(&mut Transform, &mut Projection), With<Camera2d>>,
) {
    if !editor_state.is_changed() {
        return;
    }
    for (mut transform, mut projection) in camera_query.iter_mut() {
        transform.translation.x = editor_state.camera_offset.x;
        transform.translation.y = editor_state.camera_offset.y;
        if let Projection::Orthographic(ref mut ortho) = *projection {
            ortho.scale = 1.0 / editor_state.zoom;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_for_map_skips_stale_roots() {
        let old = TileMapRoot {
            map_id: Uuid::new_v4(),
        };
        let current = TileMapRoot {
            map_id: Uuid::new_v4(),
        };
        let old_at = GlobalTransform::from_xyz(5.0, 5.0, 0.0);
        let current_at = GlobalTransform::from_xyz(-3.0, 2.0, 0.0);
        let roots = [(&old_at, &old), (&current_at, &current)];

        let found = root_for_map(roots, current.map_id).unwrap();
        assert_eq!(found.translation(), Vec3::new(-3.0, 2.0, 0.0));
        assert!(root_for_map(roots, Uuid::new_v4()).is_none());
    }
}
