//! The brush: which tile the next paint uses and where the cursor hovers

use crate::{Cell, SliceCatalog, SubImage, TileError, TileId};

/// Currently selected tile
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Brush {
    #[default]
    None,
    Tile { id: TileId, sub_image: SubImage },
}

/// Brush owned by one editing session. Not persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BrushState {
    brush: Brush,
    hovered: Option<Cell>,
}

impl BrushState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a tile from the catalog.
    ///
    /// On error the previous selection is kept.
    pub fn select_tile(&mut self, raw: u32, catalog: &SliceCatalog) -> Result<TileId, TileError> {
        let id = TileId::new(raw).ok_or(TileError::InvalidTileId(raw))?;
        if raw > catalog.tile_count() {
            return Err(TileError::InvalidTileId(raw));
        }
        let sub_image = catalog.sub_image(id)?.clone();
        self.brush = Brush::Tile { id, sub_image };
        Ok(id)
    }

    /// Drop the selection (no brush)
    pub fn clear(&mut self) {
        self.brush = Brush::None;
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    pub fn tile(&self) -> Option<TileId> {
        match &self.brush {
            Brush::Tile { id, .. } => Some(*id),
            Brush::None => None,
        }
    }

    pub fn sub_image(&self) -> Option<&SubImage> {
        match &self.brush {
            Brush::Tile { sub_image, .. } => Some(sub_image),
            Brush::None => None,
        }
    }

    /// Size of the brush in world units, zero without a selection
    pub fn size_units(&self) -> [f32; 2] {
        self.sub_image()
            .map(|sub_image| sub_image.size_units)
            .unwrap_or([0.0, 0.0])
    }

    pub fn hover(&mut self, cell: Option<Cell>) {
        self.hovered = cell;
    }

    pub fn hovered(&self) -> Option<Cell> {
        self.hovered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PixelRect;

    fn catalog() -> SliceCatalog {
        let rects = (0..4).map(|i| PixelRect::new(i * 16, 0, 16, 16));
        SliceCatalog::from_rects([64, 16], rects, 16.0)
    }

    #[test]
    fn test_select_valid_tile() {
        let catalog = catalog();
        let mut brush = BrushState::new();
        assert_eq!(brush.tile(), None);

        let id = brush.select_tile(2, &catalog).unwrap();
        assert_eq!(id.get(), 2);
        assert_eq!(brush.tile(), Some(id));
        assert_eq!(brush.sub_image().unwrap().rect.x, 16);
        assert_eq!(brush.size_units(), [1.0, 1.0]);
    }

    #[test]
    fn test_invalid_selection_keeps_previous() {
        let catalog = catalog();
        let mut brush = BrushState::new();
        brush.select_tile(3, &catalog).unwrap();
        let before = brush.clone();

        assert_eq!(
            brush.select_tile(0, &catalog),
            Err(TileError::InvalidTileId(0))
        );
        assert_eq!(
            brush.select_tile(5, &catalog),
            Err(TileError::InvalidTileId(5))
        );
        assert_eq!(brush, before);
    }

    #[test]
    fn test_clear_brush() {
        let catalog = catalog();
        let mut brush = BrushState::new();
        brush.select_tile(1, &catalog).unwrap();
        brush.hover(Some(Cell::new(0, 1)));
        brush.clear();

        assert_eq!(brush.brush(), &Brush::None);
        assert_eq!(brush.size_units(), [0.0, 0.0]);
        assert_eq!(brush.hovered(), Some(Cell::new(0, 1)));
    }
}
