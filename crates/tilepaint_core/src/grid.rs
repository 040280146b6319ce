//! Grid geometry: point <-> cell mapping and extents in world units

use crate::{Cell, TileError, TileIndex};
use serde::{Deserialize, Serialize};

/// Default conversion between texture pixels and world units
pub const DEFAULT_PIXELS_PER_UNIT: f32 = 100.0;

/// Largest row or column count a grid accepts
pub const MAX_GRID_DIMENSION: u32 = 1024;

/// Grid parameters as edited by the designer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub rows: u32,
    pub columns: u32,
    /// Size of one tile in texture pixels (width, height)
    #[serde(default)]
    pub tile_size_pixels: [f32; 2],
    #[serde(default = "default_pixels_per_unit")]
    pub pixels_per_unit: f32,
}

fn default_pixels_per_unit() -> f32 {
    DEFAULT_PIXELS_PER_UNIT
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            rows: 0,
            columns: 0,
            tile_size_pixels: [0.0, 0.0],
            pixels_per_unit: DEFAULT_PIXELS_PER_UNIT,
        }
    }
}

impl Grid {
    /// Create a grid with no tile size yet (degraded until a texture is assigned).
    /// Rows and columns are capped at [`MAX_GRID_DIMENSION`].
    pub fn new(rows: u32, columns: u32) -> Self {
        Self {
            rows: rows.min(MAX_GRID_DIMENSION),
            columns: columns.min(MAX_GRID_DIMENSION),
            ..Default::default()
        }
    }

    /// Change rows and columns, capped like [`Grid::new`]
    pub fn resize(&mut self, rows: u32, columns: u32) {
        self.rows = rows.min(MAX_GRID_DIMENSION);
        self.columns = columns.min(MAX_GRID_DIMENSION);
    }

    /// Set the tile size in pixels and the pixels-per-unit ratio
    pub fn with_tile_size(mut self, width: f32, height: f32, pixels_per_unit: f32) -> Self {
        self.tile_size_pixels = [width, height];
        self.pixels_per_unit = pixels_per_unit;
        self
    }

    pub fn index(&self) -> TileIndex {
        TileIndex::new(self.rows, self.columns)
    }

    /// Derive the geometry. Pure function of the four grid parameters.
    pub fn geometry(&self) -> GridGeometry {
        let [width, height] = self.tile_size_pixels;
        let ppu = self.pixels_per_unit;
        let usable = ppu.is_finite()
            && ppu > 0.0
            && width.is_finite()
            && height.is_finite()
            && width > 0.0
            && height > 0.0;

        let tile_size_units = if usable {
            [width / ppu, height / ppu]
        } else {
            [0.0, 0.0]
        };

        GridGeometry {
            rows: self.rows,
            columns: self.columns,
            tile_size_units,
            extent_units: [
                self.columns as f32 * tile_size_units[0],
                self.rows as f32 * tile_size_units[1],
            ],
        }
    }
}

/// Derived sizes of a [`Grid`], in world units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GridGeometry {
    pub rows: u32,
    pub columns: u32,
    pub tile_size_units: [f32; 2],
    pub extent_units: [f32; 2],
}

impl GridGeometry {
    /// A degraded grid has no area; every query on it is a no-op
    pub fn is_degraded(&self) -> bool {
        self.tile_size_units[0] <= 0.0
            || self.tile_size_units[1] <= 0.0
            || self.rows == 0
            || self.columns == 0
    }

    /// Total size of the grid (columns x tile width, rows x tile height)
    pub fn extent(&self) -> [f32; 2] {
        self.extent_units
    }

    pub fn index(&self) -> TileIndex {
        TileIndex::new(self.rows, self.columns)
    }

    /// Whether a local point lies in `[0, extent)` on both axes
    pub fn contains(&self, point: [f32; 2]) -> bool {
        !self.is_degraded()
            && point[0] >= 0.0
            && point[1] >= 0.0
            && point[0] < self.extent_units[0]
            && point[1] < self.extent_units[1]
    }

    /// Cell containing a point given relative to the grid origin.
    ///
    /// Columns run along x and rows along y.
    pub fn cell_from_point(&self, point: [f32; 2]) -> Result<Cell, TileError> {
        if !self.contains(point) {
            return Err(TileError::OutsideGrid);
        }
        let column = (point[0] / self.tile_size_units[0]).floor() as u32;
        let row = (point[1] / self.tile_size_units[1]).floor() as u32;
        // Float rounding right below the extent can land on the next cell
        Ok(Cell::new(
            row.min(self.rows - 1),
            column.min(self.columns - 1),
        ))
    }

    /// Lower-left corner of a cell relative to the grid origin
    pub fn cell_min(&self, cell: Cell) -> Result<[f32; 2], TileError> {
        if self.is_degraded() {
            return Err(TileError::DegradedGrid);
        }
        if !self.index().contains(cell) {
            return Err(TileError::OutsideGrid);
        }
        Ok([
            cell.column as f32 * self.tile_size_units[0],
            cell.row as f32 * self.tile_size_units[1],
        ])
    }

    /// Centre of a cell in the coordinate space of `origin`
    pub fn cell_center(&self, cell: Cell, origin: [f32; 2]) -> Result<[f32; 2], TileError> {
        let [x, y] = self.cell_min(cell)?;
        Ok([
            origin[0] + x + self.tile_size_units[0] / 2.0,
            origin[1] + y + self.tile_size_units[1] / 2.0,
        ])
    }

    /// Centre of the whole grid in the coordinate space of `origin`
    pub fn center(&self, origin: [f32; 2]) -> [f32; 2] {
        [
            origin[0] + self.extent_units[0] / 2.0,
            origin[1] + self.extent_units[1] / 2.0,
        ]
    }

    /// Snap a local point to the lower-left corner of its cell
    pub fn snap(&self, point: [f32; 2]) -> Result<[f32; 2], TileError> {
        let cell = self.cell_from_point(point)?;
        self.cell_min(cell)
    }

    /// Centres of every cell in row-major order, for drawing the grid
    pub fn cell_centers(&self, origin: [f32; 2]) -> Vec<[f32; 2]> {
        if self.is_degraded() {
            return Vec::new();
        }
        self.index()
            .cells()
            .filter_map(|cell| self.cell_center(cell, origin).ok())
            .collect()
    }
}
