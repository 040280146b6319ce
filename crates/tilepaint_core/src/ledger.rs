//! Record of which tiles have been placed on the grid

use crate::{Cell, TileId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A tile painted into one cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedTile {
    pub cell: Cell,
    /// Which sub-image of the source texture to render
    pub tile: TileId,
    /// World position of the cell centre
    pub position: [f32; 2],
}

/// Sparse map from cell to placed tile.
///
/// Keyed by cell, so painting the same tile in two cells keeps both.
/// Serialised as a flat list ordered row-major.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<PlacedTile>", into = "Vec<PlacedTile>")]
pub struct PlacementLedger {
    placed: BTreeMap<Cell, PlacedTile>,
}

impl From<Vec<PlacedTile>> for PlacementLedger {
    fn from(tiles: Vec<PlacedTile>) -> Self {
        Self {
            placed: tiles.into_iter().map(|tile| (tile.cell, tile)).collect(),
        }
    }
}

impl From<PlacementLedger> for Vec<PlacedTile> {
    fn from(ledger: PlacementLedger) -> Self {
        ledger.placed.into_values().collect()
    }
}

impl PlacementLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the tile at `cell`. Returns the replaced record.
    pub fn place(&mut self, cell: Cell, tile: TileId, position: [f32; 2]) -> Option<PlacedTile> {
        self.placed.insert(
            cell,
            PlacedTile {
                cell,
                tile,
                position,
            },
        )
    }

    /// Remove the tile at `cell`; absent cells are ignored
    pub fn remove(&mut self, cell: Cell) -> Option<PlacedTile> {
        self.placed.remove(&cell)
    }

    /// Remove everything, returning how many tiles were dropped
    pub fn clear(&mut self) -> usize {
        let count = self.placed.len();
        self.placed.clear();
        count
    }

    pub fn get(&self, cell: Cell) -> Option<&PlacedTile> {
        self.placed.get(&cell)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.placed.contains_key(&cell)
    }

    pub fn len(&self) -> usize {
        self.placed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    /// Placed tiles in row-major order
    pub fn iter(&self) -> impl Iterator<Item = &PlacedTile> {
        self.placed.values()
    }

    /// Cells currently painted with `tile`
    pub fn cells_using(&self, tile: TileId) -> Vec<Cell> {
        self.placed
            .values()
            .filter(|placed| placed.tile == tile)
            .map(|placed| placed.cell)
            .collect()
    }

    /// Drop records that fall outside a rows x columns grid
    pub fn retain_within(&mut self, rows: u32, columns: u32) -> Vec<PlacedTile> {
        let outside: Vec<Cell> = self
            .placed
            .keys()
            .filter(|cell| cell.row >= rows || cell.column >= columns)
            .copied()
            .collect();
        outside
            .into_iter()
            .filter_map(|cell| self.placed.remove(&cell))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u32) -> TileId {
        TileId::new(raw).unwrap()
    }

    #[test]
    fn test_place_is_idempotent() {
        let mut once = PlacementLedger::new();
        once.place(Cell::new(1, 2), id(4), [2.5, 1.5]);

        let mut twice = PlacementLedger::new();
        twice.place(Cell::new(1, 2), id(4), [2.5, 1.5]);
        let replaced = twice.place(Cell::new(1, 2), id(4), [2.5, 1.5]);

        assert_eq!(once, twice);
        assert_eq!(replaced.map(|p| p.tile), Some(id(4)));
    }

    #[test]
    fn test_repaint_replaces_tile() {
        let mut ledger = PlacementLedger::new();
        ledger.place(Cell::new(0, 0), id(1), [0.5, 0.5]);
        let old = ledger.place(Cell::new(0, 0), id(3), [0.5, 0.5]).unwrap();

        assert_eq!(old.tile, id(1));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get(Cell::new(0, 0)).unwrap().tile, id(3));
    }

    #[test]
    fn test_same_tile_in_two_cells() {
        let mut ledger = PlacementLedger::new();
        ledger.place(Cell::new(0, 0), id(2), [0.5, 0.5]);
        ledger.place(Cell::new(2, 1), id(2), [1.5, 2.5]);

        assert_eq!(ledger.len(), 2);
        assert_eq!(
            ledger.cells_using(id(2)),
            vec![Cell::new(0, 0), Cell::new(2, 1)]
        );
    }

    #[test]
    fn test_remove_after_place_empties() {
        let mut ledger = PlacementLedger::new();
        ledger.place(Cell::new(1, 1), id(5), [1.5, 1.5]);
        assert!(ledger.remove(Cell::new(1, 1)).is_some());
        assert!(ledger.is_empty());

        // Removing again is a no-op
        assert!(ledger.remove(Cell::new(1, 1)).is_none());
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_clear_and_retain() {
        let mut ledger = PlacementLedger::new();
        ledger.place(Cell::new(0, 0), id(1), [0.5, 0.5]);
        ledger.place(Cell::new(0, 5), id(1), [5.5, 0.5]);
        ledger.place(Cell::new(4, 0), id(1), [0.5, 4.5]);

        let dropped = ledger.retain_within(3, 3);
        assert_eq!(dropped.len(), 2);
        assert!(ledger.contains(Cell::new(0, 0)));

        assert_eq!(ledger.clear(), 1);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_serializes_as_list() {
        let mut ledger = PlacementLedger::new();
        ledger.place(Cell::new(1, 0), id(2), [0.5, 1.5]);
        ledger.place(Cell::new(0, 3), id(7), [3.5, 0.5]);

        let json = serde_json::to_value(&ledger).unwrap();
        let list = json.as_array().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["tile"], 7);
        assert_eq!(list[1]["cell"]["row"], 1);

        let back: PlacementLedger = serde_json::from_value(json).unwrap();
        assert_eq!(back, ledger);
    }
}
