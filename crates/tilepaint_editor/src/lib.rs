//! tilepaint_editor - paint tiles onto a grid in a Bevy scene
//!
//! This crate provides:
//! - A tile map entity whose grid is drawn with gizmos
//! - Shift to paint and Alt to erase under the cursor
//! - A tile picker window showing the sliced source texture
//! - An inspector for grid size, texture slicing and clearing
//! - Project save/load and persisted preferences
//!
//! # Usage
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use tilepaint_editor::TilePaintPlugin;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(TilePaintPlugin::default())
//!         .run();
//! }
//! ```

pub mod preferences;
pub mod project;
pub mod render;
pub mod texture;
pub mod tools;
pub mod ui;

pub use tilepaint_core;

use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use std::path::PathBuf;
use tilepaint_core::ZoomScale;

use project::Project;
use render::MapRenderPlugin;
use texture::SourceTexturePlugin;
use tools::EditorToolsPlugin;
use ui::{EditorUiPlugin, PendingAction};

/// Error types for asset path handling
#[derive(Debug, Clone, PartialEq)]
pub enum PathError {
    /// File does not exist at the specified path
    FileNotFound(String),
    /// File is outside the assets directory
    OutsideAssetsDirectory(PathBuf),
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::FileNotFound(path) => write!(f, "File not found: {}", path),
            PathError::OutsideAssetsDirectory(path) => {
                write!(f, "File is outside assets directory: {}", path.display())
            }
        }
    }
}

impl std::error::Error for PathError {}

/// Resource storing the base assets path for converting absolute paths to relative
#[derive(Resource, Default)]
pub struct AssetsBasePath(pub PathBuf);

impl AssetsBasePath {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &std::path::Path {
        &self.0
    }

    /// Convert an absolute path to a path relative to the assets folder.
    /// Returns an error if the file doesn't exist or is outside the assets directory.
    pub fn to_relative_checked(
        &self,
        absolute_path: &std::path::Path,
    ) -> Result<PathBuf, PathError> {
        let assets_path = self.0.canonicalize().unwrap_or_else(|_| self.0.clone());
        let file_path = absolute_path
            .canonicalize()
            .map_err(|_| PathError::FileNotFound(absolute_path.to_string_lossy().to_string()))?;

        if let Ok(relative) = file_path.strip_prefix(&assets_path) {
            // Bevy asset paths always use forward slashes
            let relative_str = relative.to_string_lossy().replace('\\', "/");
            Ok(PathBuf::from(relative_str))
        } else {
            Err(PathError::OutsideAssetsDirectory(
                absolute_path.to_path_buf(),
            ))
        }
    }
}

/// Convert a path to a format Bevy's AssetServer can load
pub fn to_asset_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Configuration for initial editor state
#[derive(Clone, Debug)]
pub struct EditorStateConfig {
    /// Whether to show the grid on startup. Default: from preferences
    pub show_grid: Option<bool>,
    /// Rows and columns offered for a new map. Default: 10 x 10
    pub grid_size: (u32, u32),
    /// Picker zoom. Default: from preferences
    pub picker_zoom: Option<ZoomScale>,
    /// Pixels per unit for new textures. Default: from preferences
    pub pixels_per_unit: Option<u32>,
    /// Initial camera zoom (0.05 to 20.0). Default: 1.0
    pub initial_zoom: f32,
}

impl Default for EditorStateConfig {
    fn default() -> Self {
        Self {
            show_grid: None,
            grid_size: (10, 10),
            picker_zoom: None,
            pixels_per_unit: None,
            initial_zoom: 1.0,
        }
    }
}

/// Main plugin with configurable assets path and initial state
///
/// # Example
///
/// ```rust,ignore
/// use bevy::prelude::*;
/// use tilepaint_editor::TilePaintPlugin;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(
///         TilePaintPlugin::new()
///             .with_assets_path("my_assets")
///             .with_grid_size(16, 24)
///             .with_initial_zoom(2.0)
///     )
///     .run();
/// ```
#[derive(Default)]
pub struct TilePaintPlugin {
    /// Custom assets path. If None, uses `./assets`.
    pub assets_path: Option<PathBuf>,
    pub initial_state: EditorStateConfig,
}

impl TilePaintPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the assets directory path.
    /// This should match where Bevy's AssetServer looks for files.
    pub fn with_assets_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.assets_path = Some(path.into());
        self
    }

    /// Rows and columns offered when creating a map
    pub fn with_grid_size(mut self, rows: u32, columns: u32) -> Self {
        self.initial_state.grid_size = (rows.max(1), columns.max(1));
        self
    }

    pub fn with_initial_grid(mut self, show: bool) -> Self {
        self.initial_state.show_grid = Some(show);
        self
    }

    pub fn with_picker_zoom(mut self, zoom: ZoomScale) -> Self {
        self.initial_state.picker_zoom = Some(zoom);
        self
    }

    pub fn with_pixels_per_unit(mut self, pixels_per_unit: u32) -> Self {
        self.initial_state.pixels_per_unit = Some(pixels_per_unit.max(1));
        self
    }

    pub fn with_initial_zoom(mut self, zoom: f32) -> Self {
        self.initial_state.initial_zoom = zoom.clamp(0.05, 20.0);
        self
    }

    fn detect_assets_path(&self) -> PathBuf {
        if let Some(path) = &self.assets_path {
            return path.clone();
        }
        std::env::current_dir()
            .map(|p| p.join("assets"))
            .unwrap_or_else(|_| PathBuf::from("assets"))
    }
}

impl Plugin for TilePaintPlugin {
    fn build(&self, app: &mut App) {
        let assets_path = self.detect_assets_path();
        bevy::log::info!("TilePaintPlugin: Using assets path: {:?}", assets_path);

        let mut preferences = preferences::EditorPreferences::load();
        if let Some(ppu) = self.initial_state.pixels_per_unit {
            preferences.default_pixels_per_unit = ppu;
        }

        // Plugin config takes precedence over saved preferences
        let config = &self.initial_state;
        let editor_state = EditorState {
            show_grid: config.show_grid.unwrap_or(preferences.show_grid),
            picker_zoom: config.picker_zoom.unwrap_or(preferences.picker_zoom),
            zoom: config.initial_zoom,
            new_map_rows: config.grid_size.0,
            new_map_columns: config.grid_size.1,
            ..Default::default()
        };

        app.add_plugins(EguiPlugin::default())
            .add_plugins(EditorUiPlugin)
            .add_plugins(SourceTexturePlugin)
            .add_plugins(MapRenderPlugin)
            .add_plugins(EditorToolsPlugin)
            .insert_resource(editor_state)
            .insert_resource(preferences)
            .insert_resource(Project::default())
            .insert_resource(AssetsBasePath::new(assets_path))
            .add_systems(Startup, setup_editor_camera);
    }
}

/// Spawns the editor camera if one doesn't exist
fn setup_editor_camera(mut commands: Commands, camera_query: Query<&Camera2d>) {
    if camera_query.is_empty() {
        commands.spawn(Camera2d);
    }
}

/// Global editor state
#[derive(Resource)]
pub struct EditorState {
    pub show_grid: bool,
    pub show_picker: bool,
    pub picker_zoom: ZoomScale,
    pub zoom: f32,
    pub camera_offset: Vec2,

    // Dialogs
    pub confirm_clear: bool,
    pub pending_action: Option<PendingAction>,
    pub error_message: Option<String>,

    // New map form
    pub new_map_name: String,
    pub new_map_rows: u32,
    pub new_map_columns: u32,

    /// Text field for the source texture path
    pub texture_path_input: String,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            show_grid: true,
            show_picker: true,
            picker_zoom: ZoomScale::X1,
            zoom: 1.0,
            camera_offset: Vec2::ZERO,
            confirm_clear: false,
            pending_action: None,
            error_message: None,
            new_map_name: "TileMap".to_string(),
            new_map_rows: 10,
            new_map_columns: 10,
            texture_path_input: String::new(),
        }
    }
}
