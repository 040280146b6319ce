//! Paint/erase decision from modifier keys

/// What a pointer event over the grid does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintAction {
    Paint,
    Erase,
}

impl PaintAction {
    /// Shift paints, Alt erases. Shift wins when both are held.
    pub fn from_modifiers(shift: bool, alt: bool) -> Option<Self> {
        if shift {
            Some(PaintAction::Paint)
        } else if alt {
            Some(PaintAction::Erase)
        } else {
            None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaintAction::Paint => "Paint",
            PaintAction::Erase => "Erase",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_mapping() {
        assert_eq!(PaintAction::from_modifiers(false, false), None);
        assert_eq!(
            PaintAction::from_modifiers(true, false),
            Some(PaintAction::Paint)
        );
        assert_eq!(
            PaintAction::from_modifiers(false, true),
            Some(PaintAction::Erase)
        );
        assert_eq!(
            PaintAction::from_modifiers(true, true),
            Some(PaintAction::Paint)
        );
    }
}
