//! A tile map: the grid, brush and ledger of one editing session

use crate::{
    BrushState, Cell, Grid, GridGeometry, PaintAction, PlacedTile, PlacementLedger,
    SliceCatalog, TileError, TileId,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Result of a paint or erase that hit the grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEdit {
    /// A tile was written into a cell, possibly over another one
    Placed {
        cell: Cell,
        tile: TileId,
        replaced: Option<TileId>,
    },
    /// The tile in a cell was removed
    Erased { cell: Cell, tile: TileId },
    /// Nothing changed (same tile already there, empty cell, or no brush)
    Unchanged,
}

impl MapEdit {
    pub fn changed(&self) -> bool {
        !matches!(self, MapEdit::Unchanged)
    }
}

/// A grid of painted tiles attached to a scene object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileMap {
    pub id: Uuid,
    pub name: String,
    grid: Grid,
    #[serde(default)]
    ledger: PlacementLedger,
    /// Last selected tile, restored once a catalog is assigned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    selected_tile: Option<TileId>,
    #[serde(skip)]
    catalog: Option<SliceCatalog>,
    #[serde(skip)]
    geometry: GridGeometry,
    #[serde(skip)]
    brush: BrushState,
}

impl TileMap {
    /// Create an empty map. Degraded until a catalog is assigned.
    pub fn new(name: String, rows: u32, columns: u32) -> Self {
        let grid = Grid::new(rows, columns);
        Self {
            id: Uuid::new_v4(),
            name,
            geometry: grid.geometry(),
            grid,
            ledger: PlacementLedger::new(),
            selected_tile: None,
            catalog: None,
            brush: BrushState::new(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Cached geometry, recomputed when the grid or catalog changes
    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub fn ledger(&self) -> &PlacementLedger {
        &self.ledger
    }

    pub fn brush(&self) -> &BrushState {
        &self.brush
    }

    pub fn catalog(&self) -> Option<&SliceCatalog> {
        self.catalog.as_ref()
    }

    pub fn selected_tile(&self) -> Option<TileId> {
        self.selected_tile
    }

    fn recompute_geometry(&mut self) {
        self.geometry = self.grid.geometry();
    }

    /// Resize the grid. Tiles that no longer fit are dropped and returned.
    pub fn set_dimensions(&mut self, rows: u32, columns: u32) -> Vec<PlacedTile> {
        let before = (self.grid.rows, self.grid.columns);
        self.grid.resize(rows, columns);
        if (self.grid.rows, self.grid.columns) == before {
            return Vec::new();
        }
        self.recompute_geometry();
        self.ledger.retain_within(self.grid.rows, self.grid.columns)
    }

    /// Assign the sliced source texture.
    ///
    /// Tile size and pixels per unit come from the catalog's first tile. The
    /// brush falls back to tile 1 when the previous selection is not valid.
    /// Returns `DegradedGrid` when the catalog gives the grid no size; the
    /// catalog is kept either way.
    pub fn set_catalog(&mut self, catalog: SliceCatalog) -> Result<(), TileError> {
        let [width, height] = catalog.tile_size_pixels();
        self.grid.tile_size_pixels = [width, height];
        self.grid.pixels_per_unit = catalog.pixels_per_unit();
        self.recompute_geometry();

        let preferred = self.selected_tile.map(TileId::get).unwrap_or(1);
        let selected = self
            .brush
            .select_tile(preferred, &catalog)
            .or_else(|_| self.brush.select_tile(1, &catalog));
        match selected {
            Ok(id) => self.selected_tile = Some(id),
            Err(_) => {
                self.brush.clear();
                self.selected_tile = None;
            }
        }
        self.catalog = Some(catalog);

        if self.geometry.is_degraded() {
            Err(TileError::DegradedGrid)
        } else {
            Ok(())
        }
    }

    /// Forget the source texture. Placed tiles stay in the ledger.
    pub fn clear_catalog(&mut self) {
        self.catalog = None;
        self.brush.clear();
        self.grid.tile_size_pixels = [0.0, 0.0];
        self.recompute_geometry();
    }

    /// Forget the selected tile. The next catalog starts the brush at tile 1.
    pub fn reset_selection(&mut self) {
        self.selected_tile = None;
        self.brush.clear();
    }

    /// Change the brush. The previous brush is kept on error.
    pub fn select_tile(&mut self, raw: u32) -> Result<TileId, TileError> {
        let catalog = self
            .catalog
            .as_ref()
            .ok_or(TileError::MissingSubImage(raw))?;
        let id = self.brush.select_tile(raw, catalog)?;
        self.selected_tile = Some(id);
        Ok(id)
    }

    /// Track the cell under a local point; `None` when off the grid
    pub fn hover(&mut self, local: [f32; 2]) -> Option<Cell> {
        let cell = self.geometry.cell_from_point(local).ok();
        self.brush.hover(cell);
        cell
    }

    pub fn clear_hover(&mut self) {
        self.brush.hover(None);
    }

    /// Paint the brush tile into the cell under `local`.
    ///
    /// `origin` is the grid origin in world space and is used for the stored
    /// position.
    pub fn paint(&mut self, local: [f32; 2], origin: [f32; 2]) -> Result<MapEdit, TileError> {
        let cell = self.geometry.cell_from_point(local)?;
        self.paint_cell(cell, origin)
    }

    /// Paint the brush tile into a known cell
    pub fn paint_cell(&mut self, cell: Cell, origin: [f32; 2]) -> Result<MapEdit, TileError> {
        let Some(tile) = self.brush.tile() else {
            return Ok(MapEdit::Unchanged);
        };
        let position = self.geometry.cell_center(cell, origin)?;

        if let Some(existing) = self.ledger.get(cell) {
            if existing.tile == tile && existing.position == position {
                return Ok(MapEdit::Unchanged);
            }
        }

        let replaced = self.ledger.place(cell, tile, position).map(|old| old.tile);
        Ok(MapEdit::Placed {
            cell,
            tile,
            replaced,
        })
    }

    /// Remove whatever is painted in the cell under `local`
    pub fn erase(&mut self, local: [f32; 2]) -> Result<MapEdit, TileError> {
        let cell = self.geometry.cell_from_point(local)?;
        Ok(self.erase_cell(cell))
    }

    pub fn erase_cell(&mut self, cell: Cell) -> MapEdit {
        match self.ledger.remove(cell) {
            Some(removed) => MapEdit::Erased {
                cell,
                tile: removed.tile,
            },
            None => MapEdit::Unchanged,
        }
    }

    /// Run a paint or erase for a pointer event
    pub fn apply(
        &mut self,
        action: PaintAction,
        local: [f32; 2],
        origin: [f32; 2],
    ) -> Result<MapEdit, TileError> {
        match action {
            PaintAction::Paint => self.paint(local, origin),
            PaintAction::Erase => self.erase(local),
        }
    }

    /// Remove every placed tile
    pub fn clear(&mut self) -> usize {
        self.ledger.clear()
    }

    /// Recompute stored world positions after the grid origin moved
    pub fn relocate(&mut self, origin: [f32; 2]) {
        let placed: Vec<PlacedTile> = self.ledger.iter().copied().collect();
        for tile in placed {
            if let Ok(position) = self.geometry.cell_center(tile.cell, origin) {
                self.ledger.place(tile.cell, tile.tile, position);
            }
        }
    }

    /// Restore derived state after deserialising. Oversized grids from the
    /// file are capped and tiles past the cap are dropped.
    pub fn rebuild_after_load(&mut self) {
        let (rows, columns) = (self.grid.rows, self.grid.columns);
        self.grid.resize(rows, columns);
        self.ledger.retain_within(self.grid.rows, self.grid.columns);
        self.recompute_geometry();
        self.brush = BrushState::new();
        self.catalog = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PixelRect, MAX_GRID_DIMENSION};

    fn catalog(tile: u32, columns: u32, rows: u32, ppu: f32) -> SliceCatalog {
        let mut rects = Vec::new();
        for row in 0..rows {
            for column in 0..columns {
                rects.push(PixelRect::new(column * tile, row * tile, tile, tile));
            }
        }
        SliceCatalog::from_rects([columns * tile, rows * tile], rects, ppu)
    }

    fn painted_map() -> TileMap {
        let mut map = TileMap::new("Ground".to_string(), 3, 4);
        map.set_catalog(catalog(32, 4, 2, 32.0)).unwrap();
        map
    }

    #[test]
    fn test_new_map_is_degraded() {
        let mut map = TileMap::new("Empty".to_string(), 3, 4);
        assert!(map.geometry().is_degraded());
        assert_eq!(map.paint([0.5, 0.5], [0.0, 0.0]), Err(TileError::OutsideGrid));
        assert_eq!(map.hover([0.5, 0.5]), None);
        assert!(map.select_tile(1).is_err());
    }

    #[test]
    fn test_catalog_sets_geometry_and_brush() {
        let map = painted_map();
        assert_eq!(map.grid().pixels_per_unit, 32.0);
        assert_eq!(map.geometry().extent(), [4.0, 3.0]);
        assert_eq!(map.brush().tile().map(TileId::get), Some(1));
        assert_eq!(map.selected_tile().map(TileId::get), Some(1));
    }

    #[test]
    fn test_paint_and_erase() {
        let mut map = painted_map();
        map.select_tile(5).unwrap();

        let edit = map.paint([2.5, 1.2], [10.0, 0.0]).unwrap();
        assert_eq!(
            edit,
            MapEdit::Placed {
                cell: Cell::new(1, 2),
                tile: TileId::new(5).unwrap(),
                replaced: None,
            }
        );
        let placed = map.ledger().get(Cell::new(1, 2)).unwrap();
        assert_eq!(placed.position, [12.5, 1.5]);

        // Painting the same tile again changes nothing
        assert_eq!(
            map.paint([2.9, 1.9], [10.0, 0.0]).unwrap(),
            MapEdit::Unchanged
        );

        let erased = map.erase([2.1, 1.1]).unwrap();
        assert!(erased.changed());
        assert!(map.ledger().is_empty());
        assert_eq!(map.erase([2.1, 1.1]).unwrap(), MapEdit::Unchanged);
    }

    #[test]
    fn test_apply_outside_grid_is_noop() {
        let mut map = painted_map();
        assert_eq!(
            map.apply(PaintAction::Paint, [4.5, 0.5], [0.0, 0.0]),
            Err(TileError::OutsideGrid)
        );
        assert!(map.ledger().is_empty());
    }

    #[test]
    fn test_invalid_selection_keeps_brush() {
        let mut map = painted_map();
        map.select_tile(3).unwrap();
        assert_eq!(map.select_tile(9), Err(TileError::InvalidTileId(9)));
        assert_eq!(map.brush().tile().map(TileId::get), Some(3));
    }

    #[test]
    fn test_shrinking_drops_outside_tiles() {
        let mut map = painted_map();
        map.paint([0.5, 0.5], [0.0, 0.0]).unwrap();
        map.paint([3.5, 2.5], [0.0, 0.0]).unwrap();

        let dropped = map.set_dimensions(2, 2);
        assert_eq!(dropped.len(), 1);
        assert_eq!(map.ledger().len(), 1);
        assert_eq!(map.geometry().extent(), [2.0, 2.0]);
    }

    #[test]
    fn test_relocate_updates_positions() {
        let mut map = painted_map();
        map.paint([0.5, 0.5], [0.0, 0.0]).unwrap();
        map.relocate([5.0, 5.0]);
        assert_eq!(
            map.ledger().get(Cell::new(0, 0)).unwrap().position,
            [5.5, 5.5]
        );
    }

    #[test]
    fn test_selection_survives_reload() {
        let mut map = painted_map();
        map.select_tile(6).unwrap();
        map.paint([1.5, 0.5], [0.0, 0.0]).unwrap();

        let json = serde_json::to_string(&map).unwrap();
        let mut loaded: TileMap = serde_json::from_str(&json).unwrap();
        loaded.rebuild_after_load();

        assert_eq!(loaded.ledger().len(), 1);
        assert_eq!(loaded.brush().tile(), None);
        loaded.set_catalog(catalog(32, 4, 2, 32.0)).unwrap();
        assert_eq!(loaded.brush().tile().map(TileId::get), Some(6));
    }

    #[test]
    fn test_new_texture_starts_at_first_tile() {
        let mut map = painted_map();
        map.select_tile(6).unwrap();

        map.reset_selection();
        assert_eq!(map.brush().tile(), None);
        map.set_catalog(catalog(16, 4, 4, 16.0)).unwrap();
        assert_eq!(map.selected_tile().map(TileId::get), Some(1));
    }

    #[test]
    fn test_oversized_dimensions_are_capped() {
        let mut map = painted_map();
        map.set_dimensions(u32::MAX, 70_000);
        assert_eq!(map.grid().rows, MAX_GRID_DIMENSION);
        assert_eq!(map.grid().columns, MAX_GRID_DIMENSION);

        let json = r#"{
            "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "name": "Huge",
            "grid": { "rows": 4000000, "columns": 2 },
            "ledger": [
                { "cell": { "row": 1, "column": 1 }, "tile": 2, "position": [0.0, 0.0] },
                { "cell": { "row": 3000000, "column": 0 }, "tile": 1, "position": [0.0, 0.0] }
            ]
        }"#;
        let mut loaded: TileMap = serde_json::from_str(json).unwrap();
        loaded.rebuild_after_load();
        assert_eq!(loaded.grid().rows, MAX_GRID_DIMENSION);
        assert_eq!(loaded.ledger().len(), 1);
    }

    #[test]
    fn test_catalog_without_tiles_degrades() {
        let mut map = TileMap::new("Map".to_string(), 2, 2);
        let result = map.set_catalog(SliceCatalog::from_rects([64, 64], Vec::new(), 32.0));
        assert_eq!(result, Err(TileError::DegradedGrid));
        assert_eq!(map.brush().tile(), None);
        assert!(map.catalog().is_some());

        map.clear_catalog();
        assert!(map.catalog().is_none());
    }
}
