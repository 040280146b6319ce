//! Project management for the tile painter
//!
//! A project holds one tile map, the settings used to slice its source
//! texture, and where the map sits in the scene.

mod file;

pub use file::*;

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tilepaint_core::TileMap;

/// Current project file format version
pub const PROJECT_VERSION: u32 = 1;

/// File extension used by the open/save dialogs
pub const PROJECT_EXTENSION: &str = "tilepaint.json";

/// How the source texture is cut into tiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceTexture {
    /// Image path relative to the assets folder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Width and height of one tile in pixels
    pub slice_size: [u32; 2],
    /// Texture pixels per world unit
    pub pixels_per_unit: u32,
}

impl Default for SourceTexture {
    fn default() -> Self {
        Self {
            path: None,
            slice_size: [32, 32],
            pixels_per_unit: 1,
        }
    }
}

/// The editor project
#[derive(Debug, Clone, Serialize, Deserialize, Resource)]
pub struct Project {
    pub version: u32,
    #[serde(skip)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub map: Option<TileMap>,
    #[serde(default)]
    pub source: SourceTexture,
    /// World position of the grid's lower-left corner
    #[serde(default)]
    pub origin: [f32; 2],
    #[serde(skip)]
    pub dirty: bool,
    /// Bumped on every edit, including ones already covered by `dirty`
    #[serde(skip)]
    revision: u64,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            version: PROJECT_VERSION,
            path: None,
            map: None,
            source: SourceTexture::default(),
            origin: [0.0, 0.0],
            dirty: false,
            revision: 0,
        }
    }
}

impl Project {
    /// Display name: the map name, else the file name, else "Untitled"
    pub fn name(&self) -> &str {
        if let Some(map) = &self.map {
            return &map.name;
        }
        self.path
            .as_ref()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or("Untitled")
    }

    /// Attach a new empty map, replacing any existing one
    pub fn create_map(&mut self, name: String, rows: u32, columns: u32) {
        self.map = Some(TileMap::new(name, rows, columns));
        self.mark_dirty();
    }

    /// Move the grid origin, keeping stored tile positions in step
    pub fn set_origin(&mut self, origin: [f32; 2]) {
        if self.origin == origin {
            return;
        }
        self.origin = origin;
        if let Some(map) = &mut self.map {
            map.relocate(origin);
        }
        self.mark_dirty();
    }

    /// Point at another source texture. A different image starts the brush
    /// back at tile 1 once it is sliced.
    pub fn set_texture_path(&mut self, path: Option<String>) {
        if self.source.path == path {
            return;
        }
        self.source.path = path;
        if let Some(map) = &mut self.map {
            map.reset_selection();
        }
        self.mark_dirty();
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
        self.revision = self.revision.wrapping_add(1);
    }

    /// Edit counter; compare two readings to tell whether anything changed
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Swap in a freshly loaded project. Counts as an edit but leaves it clean.
    pub fn replace(&mut self, loaded: Project) {
        let revision = self.revision.wrapping_add(1);
        *self = loaded;
        self.revision = revision;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_project() {
        let project = Project::default();
        assert_eq!(project.version, PROJECT_VERSION);
        assert!(project.map.is_none());
        assert_eq!(project.name(), "Untitled");
        assert!(!project.dirty);
    }

    #[test]
    fn test_create_map_marks_dirty() {
        let mut project = Project::default();
        project.create_map("Dungeon".to_string(), 8, 12);

        assert!(project.dirty);
        assert_eq!(project.name(), "Dungeon");
        let map = project.map.as_ref().unwrap();
        assert_eq!(map.grid().rows, 8);
        assert_eq!(map.grid().columns, 12);
    }

    #[test]
    fn test_document_keeps_settings() {
        let mut project = Project::default();
        project.create_map("Level".to_string(), 4, 4);
        project.source.path = Some("tiles/forest.png".to_string());
        project.source.slice_size = [16, 16];
        project.origin = [3.0, -2.0];

        let json = serde_json::to_string_pretty(&project).unwrap();
        let loaded: Project = serde_json::from_str(&json).unwrap();

        assert_eq!(loaded.source, project.source);
        assert_eq!(loaded.origin, [3.0, -2.0]);
        assert!(loaded.path.is_none());
        assert!(!loaded.dirty);
        assert_eq!(loaded.map.unwrap().name, "Level");
    }

    #[test]
    fn test_new_texture_resets_brush() {
        use tilepaint_core::{PixelRect, SliceCatalog};

        let sheet = || {
            let rects = (0..4).map(|column| PixelRect::new(column * 16, 0, 16, 16));
            SliceCatalog::from_rects([64, 16], rects, 16.0)
        };

        let mut project = Project::default();
        project.create_map("Level".to_string(), 4, 4);
        project.set_texture_path(Some("tiles/a.png".to_string()));
        let map = project.map.as_mut().unwrap();
        map.set_catalog(sheet()).unwrap();
        map.select_tile(3).unwrap();

        // Same path: the selection stays
        project.set_texture_path(Some("tiles/a.png".to_string()));
        assert_eq!(project.map.as_ref().unwrap().selected_tile().unwrap().get(), 3);

        project.set_texture_path(Some("tiles/b.png".to_string()));
        let map = project.map.as_mut().unwrap();
        assert!(map.brush().tile().is_none());
        map.set_catalog(sheet()).unwrap();
        assert_eq!(map.selected_tile().unwrap().get(), 1);
    }

    #[test]
    fn test_revision_tracks_edits() {
        let mut project = Project::default();
        let start = project.revision();

        project.set_origin([0.0, 0.0]);
        assert_eq!(project.revision(), start);

        project.create_map("Level".to_string(), 2, 2);
        project.set_origin([1.0, 0.0]);
        assert_eq!(project.revision(), start + 2);

        let before = project.revision();
        project.replace(Project::default());
        assert!(project.revision() > before);
        assert!(!project.dirty);
        assert!(project.map.is_none());
    }

    #[test]
    fn test_older_document_uses_defaults() {
        let loaded: Project = serde_json::from_str(r#"{ "version": 1 }"#).unwrap();
        assert!(loaded.map.is_none());
        assert_eq!(loaded.source, SourceTexture::default());
        assert_eq!(loaded.origin, [0.0, 0.0]);
    }
}
