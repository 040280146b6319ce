//! Core data structures for tilepaint
//!
//! Engine-independent tile grid addressing:
//! - `Grid` / `GridGeometry` - point <-> cell mapping and extents in world units
//! - `TileIndex` / `TileId` / `Cell` - row-major 1-based tile ids
//! - `SliceCatalog` - sub-images cut from a source texture by the host
//! - `BrushState` - the tile used for the next paint
//! - `PlacementLedger` - which tile is painted in which cell
//! - `TileMap` - one editing session tying the above together

mod brush;
mod catalog;
mod error;
mod grid;
mod index;
mod ledger;
mod map;
mod picker;
mod tool;

pub use brush::{Brush, BrushState};
pub use catalog::{PixelRect, SliceCatalog, SubImage};
pub use error::TileError;
pub use grid::{Grid, GridGeometry, DEFAULT_PIXELS_PER_UNIT, MAX_GRID_DIMENSION};
pub use index::{Cell, TileId, TileIndex};
pub use ledger::{PlacedTile, PlacementLedger};
pub use map::{MapEdit, TileMap};
pub use picker::{PickerLayout, ZoomScale};
pub use tool::PaintAction;
