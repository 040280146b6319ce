//! Linear tile ids and grid cells
//!
//! Ids are row-major and 1-based: `id = row * columns + column + 1`.
//! The same addressing is used for cells of the painting grid and for tiles
//! of the source texture shown in the picker.

use crate::TileError;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// A 1-based tile identifier. Zero is not representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(NonZeroU32);

impl TileId {
    /// Wrap a raw id, returning `None` for 0
    pub fn new(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }

    /// The raw 1-based value
    #[inline]
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A (row, column) address inside a grid
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Cell {
    pub row: u32,
    pub column: u32,
}

impl Cell {
    pub fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }
}

/// Bidirectional mapping between cells and linear ids for a rows x columns grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TileIndex {
    pub rows: u32,
    pub columns: u32,
}

impl TileIndex {
    pub fn new(rows: u32, columns: u32) -> Self {
        Self { rows, columns }
    }

    /// Number of addressable ids. Saturates for grids with more than
    /// `u32::MAX` cells; ids past that point are not addressable.
    pub fn len(&self) -> u32 {
        self.rows.saturating_mul(self.columns)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the cell lies inside the grid
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.column < self.columns
    }

    /// Row-major 1-based id of a cell
    pub fn id_from_cell(&self, cell: Cell) -> Result<TileId, TileError> {
        if !self.contains(cell) {
            return Err(TileError::OutsideGrid);
        }
        cell.row
            .checked_mul(self.columns)
            .and_then(|raw| raw.checked_add(cell.column))
            .and_then(|raw| raw.checked_add(1))
            .and_then(TileId::new)
            .ok_or(TileError::OutsideGrid)
    }

    /// Exact inverse of [`TileIndex::id_from_cell`]
    pub fn cell_from_id(&self, id: TileId) -> Result<Cell, TileError> {
        let raw = id.get();
        if raw > self.len() {
            return Err(TileError::InvalidTileId(raw));
        }
        let zero_based = raw - 1;
        Ok(Cell::new(
            zero_based / self.columns,
            zero_based % self.columns,
        ))
    }

    /// Same as [`TileIndex::cell_from_id`] but accepts a raw id, rejecting 0
    pub fn cell_from_raw(&self, raw: u32) -> Result<Cell, TileError> {
        let id = TileId::new(raw).ok_or(TileError::InvalidTileId(raw))?;
        self.cell_from_id(id)
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let columns = self.columns;
        (0..self.rows).flat_map(move |row| (0..columns).map(move |column| Cell::new(row, column)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_id_rejects_zero() {
        assert!(TileId::new(0).is_none());
        assert_eq!(TileId::new(7).map(TileId::get), Some(7));
    }

    #[test]
    fn test_cell_id_round_trip() {
        let index = TileIndex::new(3, 4);
        for cell in index.cells() {
            let id = index.id_from_cell(cell).unwrap();
            assert!(id.get() >= 1 && id.get() <= index.len());
            assert_eq!(index.cell_from_id(id).unwrap(), cell);
        }
        assert_eq!(index.cells().count(), 12);
    }

    #[test]
    fn test_row_major_formula() {
        let index = TileIndex::new(3, 4);
        assert_eq!(index.id_from_cell(Cell::new(0, 0)).unwrap().get(), 1);
        assert_eq!(index.id_from_cell(Cell::new(1, 2)).unwrap().get(), 7);
        assert_eq!(index.id_from_cell(Cell::new(2, 3)).unwrap().get(), 12);
    }

    #[test]
    fn test_ids_outside_range_are_invalid() {
        let index = TileIndex::new(3, 4);
        assert_eq!(index.cell_from_raw(0), Err(TileError::InvalidTileId(0)));
        assert_eq!(index.cell_from_raw(13), Err(TileError::InvalidTileId(13)));
        assert_eq!(index.cell_from_raw(12), Ok(Cell::new(2, 3)));
    }

    #[test]
    fn test_cell_outside_grid() {
        let index = TileIndex::new(3, 4);
        assert_eq!(
            index.id_from_cell(Cell::new(0, 4)),
            Err(TileError::OutsideGrid)
        );
        assert_eq!(
            index.id_from_cell(Cell::new(3, 0)),
            Err(TileError::OutsideGrid)
        );
    }

    #[test]
    fn test_huge_grid_does_not_overflow() {
        let index = TileIndex::new(70_000, 70_000);
        assert_eq!(index.len(), u32::MAX);
        assert_eq!(
            index.id_from_cell(Cell::new(69_999, 69_999)),
            Err(TileError::OutsideGrid)
        );
        assert_eq!(index.id_from_cell(Cell::new(0, 5)).unwrap().get(), 6);

        let last = index.id_from_cell(Cell::new(61_356, 44_294)).unwrap();
        assert_eq!(index.cell_from_id(last).unwrap(), Cell::new(61_356, 44_294));
    }

    #[test]
    fn test_empty_index() {
        let index = TileIndex::new(0, 5);
        assert!(index.is_empty());
        assert_eq!(index.cell_from_raw(1), Err(TileError::InvalidTileId(1)));
        assert_eq!(index.cells().count(), 0);
    }
}
