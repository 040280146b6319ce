//! User preferences persisted between sessions

mod file;

pub use file::*;

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use tilepaint_core::ZoomScale;

/// Editor preferences stored in the platform config directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct EditorPreferences {
    /// Zoom used by the tile picker window
    pub picker_zoom: ZoomScale,
    /// Pixels per unit given to newly assigned textures
    pub default_pixels_per_unit: u32,
    /// Slice size given to newly assigned textures
    pub default_slice_size: [u32; 2],
    pub show_grid: bool,
    /// Reopen the last project on startup
    pub auto_open_last_project: bool,
    pub last_project: Option<String>,
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            picker_zoom: ZoomScale::X1,
            default_pixels_per_unit: 1,
            default_slice_size: [32, 32],
            show_grid: true,
            auto_open_last_project: false,
            last_project: None,
        }
    }
}

impl EditorPreferences {
    /// Remember a project path for the next session
    pub fn set_last_project(&mut self, path: impl Into<String>) {
        self.last_project = Some(path.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let prefs: EditorPreferences =
            serde_json::from_str(r#"{ "picker_zoom": "X3", "show_grid": false }"#).unwrap();
        assert_eq!(prefs.picker_zoom, ZoomScale::X3);
        assert!(!prefs.show_grid);
        assert_eq!(prefs.default_pixels_per_unit, 1);
        assert_eq!(prefs.default_slice_size, [32, 32]);
        assert!(prefs.last_project.is_none());
    }

    #[test]
    fn test_set_last_project() {
        let mut prefs = EditorPreferences::default();
        prefs.set_last_project("/tmp/level.tilepaint.json");
        assert_eq!(
            prefs.last_project.as_deref(),
            Some("/tmp/level.tilepaint.json")
        );
    }
}
