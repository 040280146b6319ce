//! Project file save/load operations

use super::{Project, PROJECT_VERSION};
use std::path::Path;

#[derive(Debug)]
pub enum ProjectError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    UnsupportedVersion(u32),
    NoPath,
}

impl std::fmt::Display for ProjectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectError::IoError(e) => write!(f, "IO error: {}", e),
            ProjectError::ParseError(e) => write!(f, "Parse error: {}", e),
            ProjectError::SerializeError(e) => write!(f, "Serialize error: {}", e),
            ProjectError::UnsupportedVersion(v) => {
                write!(f, "Unsupported project version: {}", v)
            }
            ProjectError::NoPath => write!(f, "No file path set"),
        }
    }
}

impl std::error::Error for ProjectError {}

impl Project {
    /// Parse a project document
    pub fn from_json(content: &str) -> Result<Self, ProjectError> {
        let mut project: Project =
            serde_json::from_str(content).map_err(|e| ProjectError::ParseError(e.to_string()))?;

        if project.version > PROJECT_VERSION {
            return Err(ProjectError::UnsupportedVersion(project.version));
        }

        // Geometry and brush are derived; the catalog is rebuilt once the texture loads
        if let Some(map) = &mut project.map {
            map.rebuild_after_load();
        }
        project.dirty = false;

        Ok(project)
    }

    /// Load project from file
    pub fn load(path: &Path) -> Result<Self, ProjectError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ProjectError::IoError(e.to_string()))?;

        let mut project = Self::from_json(&content)?;
        project.path = Some(path.to_path_buf());
        Ok(project)
    }

    /// Save project to file
    pub fn save(&mut self, path: &Path) -> Result<(), ProjectError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ProjectError::SerializeError(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ProjectError::IoError(e.to_string()))?;

        self.path = Some(path.to_path_buf());
        self.dirty = false;

        Ok(())
    }

    /// Save to current path if set
    pub fn save_current(&mut self) -> Result<(), ProjectError> {
        if let Some(path) = self.path.clone() {
            self.save(&path)
        } else {
            Err(ProjectError::NoPath)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_newer_version() {
        let result = Project::from_json(r#"{ "version": 99 }"#);
        assert!(matches!(result, Err(ProjectError::UnsupportedVersion(99))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Project::from_json("{ not json"),
            Err(ProjectError::ParseError(_))
        ));
    }

    #[test]
    fn test_save_without_path() {
        let mut project = Project::default();
        assert!(matches!(project.save_current(), Err(ProjectError::NoPath)));
    }

    #[test]
    fn test_loaded_map_has_geometry_but_no_brush() {
        let json = r#"{
            "version": 1,
            "map": {
                "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
                "name": "Cave",
                "grid": {
                    "rows": 2,
                    "columns": 3,
                    "tile_size_pixels": [16.0, 16.0],
                    "pixels_per_unit": 16.0
                },
                "ledger": [
                    { "cell": { "row": 1, "column": 2 }, "tile": 4, "position": [2.5, 1.5] }
                ]
            }
        }"#;

        let project = Project::from_json(json).unwrap();
        let map = project.map.unwrap();
        assert_eq!(map.geometry().extent(), [3.0, 2.0]);
        assert_eq!(map.ledger().len(), 1);
        assert!(map.brush().tile().is_none());
    }
}
