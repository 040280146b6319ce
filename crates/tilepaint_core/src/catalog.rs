//! Slice catalog: the sub-images cut out of a source texture
//!
//! The host asset pipeline does the slicing; this type only records the
//! result. Entry 0 is always the whole texture, entries `1..=n` are tiles, so
//! a [`TileId`] of `k` names entry `k`.

use crate::{TileError, TileId};
use serde::{Deserialize, Serialize};

/// A rectangle in texture pixels, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// One entry of the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubImage {
    /// Position in the catalog (0 = whole texture)
    pub index: usize,
    pub rect: PixelRect,
    /// Rendered size in world units
    pub size_units: [f32; 2],
}

/// Ordered list of sub-images for one source texture
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SliceCatalog {
    entries: Vec<SubImage>,
    /// Ratio the sizes in units were computed with; 0 when unusable
    pixels_per_unit: f32,
}

impl SliceCatalog {
    /// Build a catalog from the rects the host produced for a texture.
    ///
    /// Sizes in units are `pixels / pixels_per_unit`; a non-positive ratio
    /// yields zero sizes.
    pub fn from_rects(
        texture_size: [u32; 2],
        rects: impl IntoIterator<Item = PixelRect>,
        pixels_per_unit: f32,
    ) -> Self {
        let usable = pixels_per_unit > 0.0 && pixels_per_unit.is_finite();
        let to_units = |rect: &PixelRect| -> [f32; 2] {
            if usable {
                [
                    rect.width as f32 / pixels_per_unit,
                    rect.height as f32 / pixels_per_unit,
                ]
            } else {
                [0.0, 0.0]
            }
        };

        let whole = PixelRect::new(0, 0, texture_size[0], texture_size[1]);
        let mut entries = vec![SubImage {
            index: 0,
            rect: whole,
            size_units: to_units(&whole),
        }];
        for rect in rects {
            entries.push(SubImage {
                index: entries.len(),
                rect,
                size_units: to_units(&rect),
            });
        }
        Self {
            entries,
            pixels_per_unit: if usable { pixels_per_unit } else { 0.0 },
        }
    }

    /// Total entries, including the whole-texture entry
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of selectable tiles (entries after the whole texture)
    pub fn tile_count(&self) -> u32 {
        self.entries.len().saturating_sub(1) as u32
    }

    /// The whole-texture entry
    pub fn whole(&self) -> Option<&SubImage> {
        self.entries.first()
    }

    /// The first real tile, used to derive tile size and pixels per unit
    pub fn first_tile(&self) -> Option<&SubImage> {
        self.entries.get(1)
    }

    /// Look up the sub-image for a tile id
    pub fn sub_image(&self, id: TileId) -> Result<&SubImage, TileError> {
        self.entries
            .get(id.get() as usize)
            .ok_or(TileError::MissingSubImage(id.get()))
    }

    /// Raw lookup; 0 and out-of-range ids mean "no brush"
    pub fn sub_image_raw(&self, raw: u32) -> Option<&SubImage> {
        TileId::new(raw).and_then(|id| self.sub_image(id).ok())
    }

    /// Pixels per unit the tile sizes were computed with.
    /// Zero when there is no tile or the tile has no size.
    pub fn pixels_per_unit(&self) -> f32 {
        self.first_tile()
            .filter(|tile| tile.size_units[0] > 0.0)
            .map_or(0.0, |_| self.pixels_per_unit)
    }

    /// Pixel size of the first tile, or zero when the catalog has no tiles
    pub fn tile_size_pixels(&self) -> [f32; 2] {
        self.first_tile()
            .map(|tile| [tile.rect.width as f32, tile.rect.height as f32])
            .unwrap_or([0.0, 0.0])
    }

    /// Texture size in pixels
    pub fn texture_size(&self) -> [u32; 2] {
        self.whole()
            .map(|whole| [whole.rect.width, whole.rect.height])
            .unwrap_or([0, 0])
    }

    /// How many tiles fit across and down the texture (columns, rows)
    pub fn picker_grid(&self) -> (u32, u32) {
        let [tile_w, tile_h] = self.tile_size_pixels();
        if tile_w < 1.0 || tile_h < 1.0 {
            return (0, 0);
        }
        let [width, height] = self.texture_size();
        (width / tile_w as u32, height / tile_h as u32)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SubImage> {
        self.entries.iter()
    }
}
