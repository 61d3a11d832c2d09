//! dungeon_map_editor - Editing core for dungeon tile maps
//!
//! This crate provides the state-mutation core of a tile-map editor:
//! - Viewport transform between screen pixels, world pixels and tiles
//! - Point, drag, rectangle and flood-fill selection
//! - Paint, fill, erase, tile type and location marker tools
//! - Bounded undo/redo over tile edits
//! - Map save/load and user preferences
//!
//! Drawing is left to the host application; the plugin only wires window
//! input to [`EditorState`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use dungeon_map_editor::MapEditorPlugin;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(MapEditorPlugin::new().with_grid_size(64, 64))
//!         .run();
//! }
//! ```

pub mod commands;
pub mod preferences;
pub mod project;
pub mod selection;
pub mod state;
pub mod tools;
pub mod viewport;

pub use dungeon_map_core;

pub use state::{EditorState, PendingAction};

use bevy::prelude::*;
use dungeon_map_core::DEFAULT_MAX_LAYERS;

use commands::{handle_keyboard_shortcuts, DEFAULT_HISTORY_CAPACITY};
use preferences::{EditorPreferences, PreferencesStore};
use std::path::Path;
use tools::{EditorTool, EditorToolsPlugin};
use viewport::{DEFAULT_TILE_SIZE, MAX_ZOOM, MIN_ZOOM};

/// Initial editor configuration
#[derive(Clone, Debug)]
pub struct EditorStateConfig {
    pub initial_zoom: f32,
    pub base_tile_size: u32,
    /// Size of the map created at startup and by "New"
    pub grid_size: (u32, u32),
    pub history_capacity: usize,
    pub max_layers: usize,
    /// Height of the toolbar strip above the work area, in pixels
    pub toolbar_height: f32,
    pub initial_tool: EditorTool,
    /// Reopen the last saved or opened map at startup
    pub reopen_last_file: bool,
}

impl Default for EditorStateConfig {
    fn default() -> Self {
        Self {
            initial_zoom: 1.0,
            base_tile_size: DEFAULT_TILE_SIZE,
            grid_size: (50, 50),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            max_layers: DEFAULT_MAX_LAYERS,
            toolbar_height: 40.0,
            initial_tool: EditorTool::Paint,
            reopen_last_file: true,
        }
    }
}

/// Dungeon map editor plugin
///
/// # Example
///
/// ```rust,ignore
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(
///         MapEditorPlugin::new()
///             .with_initial_zoom(2.0)
///             .with_history_capacity(200),
///     )
///     .run();
/// ```
#[derive(Default)]
pub struct MapEditorPlugin {
    pub initial_state: EditorStateConfig,
}

impl MapEditorPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_zoom(mut self, zoom: f32) -> Self {
        self.initial_state.initial_zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self
    }

    pub fn with_base_tile_size(mut self, size: u32) -> Self {
        self.initial_state.base_tile_size = size.max(1);
        self
    }

    pub fn with_grid_size(mut self, width: u32, height: u32) -> Self {
        self.initial_state.grid_size = (width, height);
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.initial_state.history_capacity = capacity.max(1);
        self
    }

    pub fn with_max_layers(mut self, max_layers: usize) -> Self {
        self.initial_state.max_layers = max_layers;
        self
    }

    pub fn with_toolbar_height(mut self, height: f32) -> Self {
        self.initial_state.toolbar_height = height.max(0.0);
        self
    }

    pub fn with_initial_tool(mut self, tool: EditorTool) -> Self {
        self.initial_state.initial_tool = tool;
        self
    }

    pub fn with_reopen_last_file(mut self, reopen: bool) -> Self {
        self.initial_state.reopen_last_file = reopen;
        self
    }
}

impl Plugin for MapEditorPlugin {
    fn build(&self, app: &mut App) {
        let store = PreferencesStore::default();
        let preferences = store.load();
        bevy::log::info!("Loaded editor preferences");

        let editor_state = EditorState::new(&self.initial_state);

        app.add_plugins(EditorToolsPlugin)
            .insert_resource(editor_state)
            .insert_resource(preferences)
            .insert_resource(store)
            .add_systems(
                Update,
                (handle_keyboard_shortcuts, process_pending_actions).chain(),
            );

        if self.initial_state.reopen_last_file {
            app.add_systems(Startup, reopen_last_file);
        }
    }
}

/// Run the action requested by a shortcut or the host
pub fn process_pending_actions(
    mut editor_state: ResMut<EditorState>,
    mut preferences: ResMut<EditorPreferences>,
    store: Res<PreferencesStore>,
) {
    let Some(action) = editor_state.pending_action.take() else {
        return;
    };

    match action {
        PendingAction::Undo => {
            editor_state.undo();
        }
        PendingAction::Redo => {
            editor_state.redo();
        }
        PendingAction::Save => {
            if editor_state.save_current().is_ok() {
                if let Some(path) = editor_state.project.path.clone() {
                    remember_last_file(&mut preferences, &store, &path);
                }
            }
        }
        PendingAction::SaveAs(path) => {
            if editor_state.save_map(&path).is_ok() {
                remember_last_file(&mut preferences, &store, &path);
            }
        }
        PendingAction::Open(path) => {
            if editor_state.open_map(&path).is_ok() {
                remember_last_file(&mut preferences, &store, &path);
            }
        }
        PendingAction::SelectAll => editor_state.select_all(),
        PendingAction::ClearSelection => editor_state.selection.clear(),
        PendingAction::NewMap => {
            let (width, height) = editor_state.new_map_size;
            editor_state.new_map(width, height);
        }
        PendingAction::CloseMap => editor_state.close_map(),
        PendingAction::Validate => {
            let missing = editor_state.validate().len();
            editor_state.status_message = Some(match missing {
                0 => "All textures found".to_string(),
                n => format!("{} missing texture reference(s)", n),
            });
        }
    }
}

fn remember_last_file(preferences: &mut EditorPreferences, store: &PreferencesStore, path: &Path) {
    preferences.set_last_opened_file(path);
    if let Err(e) = store.save(preferences) {
        bevy::log::error!("Failed to save preferences: {}", e);
    }
}

/// Startup system that reopens the map named in preferences
pub fn reopen_last_file(
    mut editor_state: ResMut<EditorState>,
    mut preferences: ResMut<EditorPreferences>,
    store: Res<PreferencesStore>,
) {
    let Some(path) = preferences.last_opened_file.clone() else {
        return;
    };

    if !path.exists() {
        bevy::log::warn!("Last opened map not found: {:?}", path);
        preferences.clear_last_opened_file();
        if let Err(e) = store.save(&preferences) {
            bevy::log::error!("Failed to save preferences: {}", e);
        }
        return;
    }

    if editor_state.open_map(&path).is_ok() {
        bevy::log::info!("Reopened last map: {:?}", path);
    }
}
