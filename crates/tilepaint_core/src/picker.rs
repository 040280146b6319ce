//! Tile picker layout: maps clicks on the zoomed source texture to tile ids

use crate::{Cell, TileError, TileId, TileIndex};
use serde::{Deserialize, Serialize};

/// Zoom applied to the texture shown in the picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ZoomScale {
    #[default]
    X1,
    X2,
    X3,
    X4,
    X5,
}

impl ZoomScale {
    pub fn factor(&self) -> f32 {
        match self {
            ZoomScale::X1 => 1.0,
            ZoomScale::X2 => 2.0,
            ZoomScale::X3 => 3.0,
            ZoomScale::X4 => 4.0,
            ZoomScale::X5 => 5.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ZoomScale::X1 => "x1",
            ZoomScale::X2 => "x2",
            ZoomScale::X3 => "x3",
            ZoomScale::X4 => "x4",
            ZoomScale::X5 => "x5",
        }
    }

    pub fn all() -> &'static [ZoomScale] {
        &[
            ZoomScale::X1,
            ZoomScale::X2,
            ZoomScale::X3,
            ZoomScale::X4,
            ZoomScale::X5,
        ]
    }
}

/// Layout of the source texture inside the picker's scroll area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickerLayout {
    /// Texture size in pixels
    pub texture_size: [f32; 2],
    /// Tile size in pixels
    pub tile_size: [f32; 2],
    pub zoom: ZoomScale,
    /// Where the texture starts inside the scroll content
    pub offset: [f32; 2],
}

impl PickerLayout {
    pub fn new(texture_size: [f32; 2], tile_size: [f32; 2], zoom: ZoomScale) -> Self {
        Self {
            texture_size,
            tile_size,
            zoom,
            offset: [0.0, 0.0],
        }
    }

    pub fn with_offset(mut self, offset: [f32; 2]) -> Self {
        self.offset = offset;
        self
    }

    fn usable(&self) -> bool {
        self.tile_size[0] >= 1.0 && self.tile_size[1] >= 1.0
    }

    /// Tiles across the texture
    pub fn columns(&self) -> u32 {
        if !self.usable() {
            return 0;
        }
        (self.texture_size[0] / self.tile_size[0]).floor() as u32
    }

    /// Tiles down the texture
    pub fn rows(&self) -> u32 {
        if !self.usable() {
            return 0;
        }
        (self.texture_size[1] / self.tile_size[1]).floor() as u32
    }

    pub fn index(&self) -> TileIndex {
        TileIndex::new(self.rows(), self.columns())
    }

    /// Texture size after zoom
    pub fn scaled_texture(&self) -> [f32; 2] {
        let factor = self.zoom.factor();
        [self.texture_size[0] * factor, self.texture_size[1] * factor]
    }

    /// Tile size after zoom
    pub fn scaled_tile(&self) -> [f32; 2] {
        let factor = self.zoom.factor();
        [self.tile_size[0] * factor, self.tile_size[1] * factor]
    }

    /// Tile under a point in scroll-content coordinates, clamped to the sheet
    pub fn selection_from_point(&self, point: [f32; 2]) -> Option<Cell> {
        let columns = self.columns();
        let rows = self.rows();
        if columns == 0 || rows == 0 {
            return None;
        }
        let [tile_w, tile_h] = self.scaled_tile();
        let column = ((point[0] - self.offset[0]) / tile_w).floor().max(0.0) as u32;
        let row = ((point[1] - self.offset[1]) / tile_h).floor().max(0.0) as u32;
        Some(Cell::new(row.min(rows - 1), column.min(columns - 1)))
    }

    /// Id of the tile at a picker cell
    pub fn tile_id(&self, cell: Cell) -> Result<TileId, TileError> {
        self.index().id_from_cell(cell)
    }

    /// Picker cell showing a tile id
    pub fn selection_for_id(&self, id: TileId) -> Result<Cell, TileError> {
        self.index().cell_from_id(id)
    }

    /// Highlight rectangle (x, y, width, height) in scroll-content coordinates
    pub fn selection_rect(&self, cell: Cell) -> [f32; 4] {
        let [tile_w, tile_h] = self.scaled_tile();
        [
            self.offset[0] + cell.column as f32 * tile_w,
            self.offset[1] + cell.row as f32 * tile_h,
            tile_w,
            tile_h,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(zoom: ZoomScale) -> PickerLayout {
        PickerLayout::new([128.0, 64.0], [32.0, 32.0], zoom).with_offset([10.0, 25.0])
    }

    #[test]
    fn test_sheet_dimensions() {
        let layout = layout(ZoomScale::X2);
        assert_eq!(layout.columns(), 4);
        assert_eq!(layout.rows(), 2);
        assert_eq!(layout.scaled_tile(), [64.0, 64.0]);
        assert_eq!(layout.scaled_texture(), [256.0, 128.0]);
    }

    #[test]
    fn test_click_selects_tile() {
        let layout = layout(ZoomScale::X1);
        let cell = layout.selection_from_point([10.0 + 70.0, 25.0 + 40.0]).unwrap();
        assert_eq!(cell, Cell::new(1, 2));
        assert_eq!(layout.tile_id(cell).unwrap().get(), 7);
        assert_eq!(layout.selection_for_id(TileId::new(7).unwrap()), Ok(cell));
    }

    #[test]
    fn test_click_is_clamped_to_sheet() {
        let layout = layout(ZoomScale::X3);
        assert_eq!(
            layout.selection_from_point([5000.0, 5000.0]),
            Some(Cell::new(1, 3))
        );
        assert_eq!(
            layout.selection_from_point([0.0, 0.0]),
            Some(Cell::new(0, 0))
        );
    }

    #[test]
    fn test_selection_rect_follows_zoom() {
        let layout = layout(ZoomScale::X2);
        assert_eq!(
            layout.selection_rect(Cell::new(1, 1)),
            [74.0, 89.0, 64.0, 64.0]
        );
    }

    #[test]
    fn test_empty_sheet() {
        let layout = PickerLayout::new([128.0, 64.0], [0.0, 0.0], ZoomScale::X1);
        assert_eq!(layout.columns(), 0);
        assert_eq!(layout.selection_from_point([10.0, 10.0]), None);
    }
}
