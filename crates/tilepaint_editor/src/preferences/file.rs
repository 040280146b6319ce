//! Reading and writing `preferences.json`

use super::EditorPreferences;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

const PREFERENCES_FILE: &str = "preferences.json";

#[derive(Debug)]
pub enum PreferencesError {
    Read(PathBuf, String),
    Write(PathBuf, String),
    Parse(String),
    Encode(String),
    NoConfigDir,
}

impl std::fmt::Display for PreferencesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreferencesError::Read(path, e) => write!(f, "cannot read {:?}: {}", path, e),
            PreferencesError::Write(path, e) => write!(f, "cannot write {:?}: {}", path, e),
            PreferencesError::Parse(e) => write!(f, "invalid preferences: {}", e),
            PreferencesError::Encode(e) => write!(f, "cannot encode preferences: {}", e),
            PreferencesError::NoConfigDir => write!(f, "no config directory on this platform"),
        }
    }
}

impl std::error::Error for PreferencesError {}

impl EditorPreferences {
    /// `<config dir>/tilepaint_editor/preferences.json`
    pub fn file_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "tilepaint", "tilepaint_editor")
            .map(|dirs| dirs.config_dir().join(PREFERENCES_FILE))
    }

    /// Saved preferences, or defaults when there are none or they are unreadable
    pub fn load() -> Self {
        let Some(path) = Self::file_path() else {
            bevy::log::warn!("{}; using default preferences", PreferencesError::NoConfigDir);
            return Self::default();
        };
        Self::load_from(&path).unwrap_or_else(|e| {
            bevy::log::warn!("{}; using default preferences", e);
            Self::default()
        })
    }

    /// Read preferences from `path`. A missing file gives the defaults.
    pub fn load_from(path: &Path) -> Result<Self, PreferencesError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| PreferencesError::Read(path.to_path_buf(), e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| PreferencesError::Parse(e.to_string()))
    }

    pub fn save(&self) -> Result<(), PreferencesError> {
        let path = Self::file_path().ok_or(PreferencesError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Write preferences to `path`, creating its directory
    pub fn save_to(&self, path: &Path) -> Result<(), PreferencesError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .map_err(|e| PreferencesError::Write(dir.to_path_buf(), e.to_string()))?;
        }
        let text = serde_json::to_string_pretty(self)
            .map_err(|e| PreferencesError::Encode(e.to_string()))?;
        std::fs::write(path, text)
            .map_err(|e| PreferencesError::Write(path.to_path_buf(), e.to_string()))?;

        bevy::log::debug!("Preferences written to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilepaint_core::ZoomScale;

    fn scratch_file() -> PathBuf {
        std::env::temp_dir()
            .join(format!("tilepaint_prefs_{}", uuid::Uuid::new_v4()))
            .join(PREFERENCES_FILE)
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let prefs = EditorPreferences::load_from(&scratch_file()).unwrap();
        assert_eq!(prefs, EditorPreferences::default());
    }

    #[test]
    fn test_saved_preferences_load_back() {
        let path = scratch_file();
        let mut prefs = EditorPreferences {
            picker_zoom: ZoomScale::X4,
            show_grid: false,
            ..Default::default()
        };
        prefs.set_last_project("/tmp/cave.tilepaint.json");
        prefs.save_to(&path).unwrap();

        assert_eq!(EditorPreferences::load_from(&path).unwrap(), prefs);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let path = scratch_file();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ nope").unwrap();

        assert!(matches!(
            EditorPreferences::load_from(&path),
            Err(PreferencesError::Parse(_))
        ));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
