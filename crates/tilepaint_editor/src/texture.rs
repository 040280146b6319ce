//! Source texture loading and slicing
//!
//! Bevy's asset server decodes the image and `TextureAtlasLayout` cuts it
//! into tiles; the layout is then recorded as a `SliceCatalog` for the map.

use bevy::asset::LoadState;
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiTextureHandle};
use tilepaint_core::{PixelRect, SliceCatalog, TileId};
use uuid::Uuid;

use crate::project::{Project, SourceTexture};

/// Plugin that keeps the map's catalog in sync with its source texture
pub struct SourceTexturePlugin;

impl Plugin for SourceTexturePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SourceTextureCache>()
            .add_systems(Update, sync_source_texture);
    }
}

/// Loaded source texture and the atlas built from it
#[derive(Resource, Default)]
pub struct SourceTextureCache {
    /// Path the current handle was loaded from
    pub requested: Option<String>,
    pub image: Option<Handle<Image>>,
    pub layout: Option<Handle<TextureAtlasLayout>>,
    /// Texture registered with egui for the picker window
    pub egui_texture: Option<egui::TextureId>,
    pub texture_size: [u32; 2],
    pub load_error: Option<String>,
    /// Slice settings and map the current catalog was built for
    built_for: Option<(SourceTexture, Uuid)>,
}

impl SourceTextureCache {
    fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether the image and its atlas are ready for rendering
    pub fn is_ready(&self) -> bool {
        self.image.is_some() && self.layout.is_some()
    }
}

/// Atlas slot for a tile id. Catalog entry 0 is the whole texture, so tile
/// `k` lives in atlas slot `k - 1`.
pub fn atlas_index(tile: TileId) -> usize {
    (tile.get() - 1) as usize
}

/// Record an atlas layout as a slice catalog
pub fn catalog_from_layout(layout: &TextureAtlasLayout, pixels_per_unit: u32) -> SliceCatalog {
    let rects = layout
        .textures
        .iter()
        .map(|rect| PixelRect::new(rect.min.x, rect.min.y, rect.width(), rect.height()));
    SliceCatalog::from_rects(
        [layout.size.x, layout.size.y],
        rects,
        pixels_per_unit as f32,
    )
}

/// Cut an image of `image_size` pixels into a grid of `slice_size` tiles
pub fn slice_layout(image_size: UVec2, slice_size: [u32; 2]) -> TextureAtlasLayout {
    let tile = UVec2::new(slice_size[0].max(1), slice_size[1].max(1));
    let columns = image_size.x / tile.x;
    let rows = image_size.y / tile.y;
    let mut layout = TextureAtlasLayout::from_grid(tile, columns, rows, None, None);
    // Keep the real image size so the whole-texture entry covers any leftover pixels
    layout.size = image_size;
    layout
}

fn sync_source_texture(
    mut contexts: EguiContexts,
    mut cache: ResMut<SourceTextureCache>,
    mut project: ResMut<Project>,
    asset_server: Res<AssetServer>,
    images: Res<Assets<Image>>,
    mut layouts: ResMut<Assets<TextureAtlasLayout>>,
) {
    let requested = project.source.path.clone();
    if cache.requested != requested {
        cache.reset();
        cache.requested = requested.clone();
        match &requested {
            Some(path) => {
                debug!("Loading source texture: {}", path);
                cache.image = Some(asset_server.load(crate::to_asset_path(path)));
            }
            None => {
                if project.map.as_ref().is_some_and(|m| m.catalog().is_some()) {
                    if let Some(map) = project.map.as_mut() {
                        map.clear_catalog();
                    }
                    info!("Source texture cleared");
                }
            }
        }
    }

    let Some(handle) = cache.image.clone() else {
        return;
    };

    if let LoadState::Failed(err) = asset_server.load_state(&handle) {
        if cache.load_error.is_none() {
            warn!("Failed to load source texture {:?}: {}", cache.requested, err);
            cache.load_error = Some(err.to_string());
        }
        return;
    }

    let Some(image) = images.get(&handle) else {
        return;
    };

    if cache.egui_texture.is_none() {
        cache.egui_texture = Some(contexts.add_image(EguiTextureHandle::Strong(handle.clone())));
    }

    let Some(map) = project.map.as_ref() else {
        return;
    };
    let key = (project.source.clone(), map.id);
    if cache.built_for.as_ref() == Some(&key) && map.catalog().is_some() {
        return;
    }

    let image_size = image.size();
    let layout = slice_layout(image_size, project.source.slice_size);
    let catalog = catalog_from_layout(&layout, project.source.pixels_per_unit);
    let tile_count = catalog.tile_count();

    cache.layout = Some(layouts.add(layout));
    cache.texture_size = [image_size.x, image_size.y];
    cache.built_for = Some(key);

    if let Some(map) = project.map.as_mut() {
        match map.set_catalog(catalog) {
            Ok(()) => info!(
                "Sliced source texture {}x{} px into {} tiles",
                image_size.x, image_size.y, tile_count
            ),
            Err(e) => warn!(
                "Source texture {:?} gives an unusable grid: {}",
                project.source.path, e
            ),
        }
    }
}
