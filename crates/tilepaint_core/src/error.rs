//! Error type shared by the grid, index, brush and map operations

/// Failure of a grid or tile query
///
/// None of these are fatal. Callers treat them as "do nothing" and may
/// surface a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileError {
    /// Tile size or pixels-per-unit is zero, so the grid has no extent
    DegradedGrid,
    /// Tile id outside the addressable range
    InvalidTileId(u32),
    /// Point or cell outside the grid bounds
    OutsideGrid,
    /// The slice catalog has no sub-image for this id
    MissingSubImage(u32),
}

impl std::fmt::Display for TileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TileError::DegradedGrid => write!(f, "Grid has zero tile size or pixels per unit"),
            TileError::InvalidTileId(id) => write!(f, "Invalid tile id: {}", id),
            TileError::OutsideGrid => write!(f, "Position is outside the grid"),
            TileError::MissingSubImage(id) => write!(f, "No sub-image for tile id {}", id),
        }
    }
}

impl std::error::Error for TileError {}
