//! Editor state resource and the handlers input systems call into
//!
//! `EditorState` owns the grid and its history. All tile mutations go through
//! [`EditorState::apply_active_tool`], [`EditorState::undo`] and
//! [`EditorState::redo`]; the grid itself is only exposed read-only.

use bevy::log::{debug, error, info, warn};
use bevy::math::Vec2;
use bevy::prelude::Resource;
use dungeon_map_core::{
    MapDocument, MarkerKind, MissingResource, Position, TextureCatalog, TextureRegion, TileGrid,
};
use std::path::{Path, PathBuf};

use crate::commands::CommandHistory;
use crate::project::{Project, ProjectError, UNTITLED};
use crate::selection::{flood_fill, TileSelection};
use crate::tools::{apply_tool, EditorTool, ToolMode, ToolOutcome, ToolSettings};
use crate::viewport::{Viewport, WindowLayout, DEFAULT_WINDOW_SIZE};
use crate::EditorStateConfig;

/// Actions requested by shortcuts or menus, run by `process_pending_actions`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    Undo,
    Redo,
    Save,
    /// Save to a new path chosen by the host
    SaveAs(PathBuf),
    Open(PathBuf),
    SelectAll,
    ClearSelection,
    NewMap,
    CloseMap,
    Validate,
}

#[derive(Resource)]
pub struct EditorState {
    grid: TileGrid,
    history: CommandHistory,

    // View
    pub viewport: Viewport,
    pub layout: WindowLayout,
    pub toolbar_height: f32,

    // Tools
    pub selection: TileSelection,
    pub current_tool: EditorTool,
    pub tool_settings: ToolSettings,

    // Resources
    pub resources: TextureCatalog,
    pub missing_resources: Vec<MissingResource>,

    pub project: Project,
    pub pending_action: Option<PendingAction>,
    pub status_message: Option<String>,
    pub error_message: Option<String>,

    /// Size used by `PendingAction::NewMap`
    pub new_map_size: (u32, u32),

    /// Left button held over the work area
    dragging: bool,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(&EditorStateConfig::default())
    }
}

impl EditorState {
    pub fn new(config: &EditorStateConfig) -> Self {
        let grid = TileGrid::with_max_layers(config.grid_size.0, config.grid_size.1, config.max_layers);
        let layout = WindowLayout::from_window(
            DEFAULT_WINDOW_SIZE.x,
            DEFAULT_WINDOW_SIZE.y,
            config.toolbar_height,
        );

        Self {
            grid,
            history: CommandHistory::new(config.history_capacity),
            viewport: Viewport::new(config.base_tile_size, config.initial_zoom),
            layout,
            toolbar_height: config.toolbar_height,
            selection: TileSelection::new(),
            current_tool: config.initial_tool,
            tool_settings: ToolSettings::default(),
            resources: TextureCatalog::new(),
            missing_resources: Vec::new(),
            project: Project::default(),
            pending_action: None,
            status_message: None,
            error_message: None,
            new_map_size: config.grid_size,
            dragging: false,
        }
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Re-derive the work area from the window size
    pub fn update_layout(&mut self, window_size: Vec2) {
        let layout = WindowLayout::from_window(window_size.x, window_size.y, self.toolbar_height);
        if layout != self.layout {
            self.layout = layout;
            self.viewport = self.viewport.clamped(&self.layout, self.grid.size());
        }
    }

    fn tile_at(&self, pixel: Vec2) -> Option<Position> {
        self.viewport.screen_to_tile(pixel, &self.layout, self.grid.size())
    }

    /// Left button pressed. Starts a selection at the tile under `pixel`.
    ///
    /// Returns `false` if the pixel is not over a tile.
    pub fn handle_pointer_down(&mut self, pixel: Vec2) -> bool {
        let Some(tile) = self.tile_at(pixel) else {
            return false;
        };

        self.dragging = true;
        if self.current_tool == EditorTool::Fill {
            let region = flood_fill(&self.grid, tile);
            self.selection.select_region(region);
        } else {
            self.selection.select_point(tile);
        }
        true
    }

    /// Pointer moved. While dragging with a multi-tile tool, grows the selection.
    pub fn handle_pointer_move(&mut self, pixel: Vec2) {
        if !self.dragging || !self.current_tool.supports_multi_tile() {
            return;
        }
        let Some(tile) = self.tile_at(pixel) else {
            return;
        };

        if self.tool_settings.mode == ToolMode::Rectangle && self.current_tool.supports_modes() {
            self.selection.drag_rectangle_to(tile, self.grid.size());
        } else {
            self.selection.extend(tile);
        }
    }

    /// Left button released. Applies editing tools to the selection.
    pub fn handle_pointer_up(&mut self) -> ToolOutcome {
        if !std::mem::take(&mut self.dragging) {
            return ToolOutcome::Idle;
        }
        if !self.current_tool.edits_tiles() {
            return ToolOutcome::Idle;
        }
        self.apply_active_tool()
    }

    /// Apply the current tool to the current selection
    pub fn apply_active_tool(&mut self) -> ToolOutcome {
        let outcome = apply_tool(
            &mut self.grid,
            &mut self.history,
            self.current_tool,
            &self.tool_settings,
            self.selection.positions(),
        );

        match &outcome {
            ToolOutcome::Recorded { .. } => {
                self.project.mark_dirty();
                self.status_message = self.history.undo_description().map(str::to_string);
            }
            ToolOutcome::MarkersChanged => {
                self.project.mark_dirty();
                self.status_message =
                    Some(format!("Placed {}", self.tool_settings.location.display_name()));
            }
            ToolOutcome::Idle | ToolOutcome::Unchanged => {}
        }
        outcome
    }

    /// Zoom by `delta` wheel steps around `pixel`
    pub fn handle_zoom(&mut self, pixel: Vec2, delta: f32) {
        self.viewport = self
            .viewport
            .zoomed_at(pixel, delta, &self.layout, self.grid.size());
    }

    /// Scroll the view by a pixel delta. Positive values move toward higher tile indices.
    pub fn handle_pan(&mut self, delta: Vec2) {
        self.viewport = self.viewport.panned(delta, &self.layout, self.grid.size());
    }

    /// Undo the last tile edit. Returns `false` if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.undo(&mut self.grid) {
            Some(description) => {
                debug!("Undo: {}", description);
                self.project.mark_dirty();
                self.status_message = Some(format!("Undo: {}", description));
                true
            }
            None => {
                self.status_message = Some("Nothing to undo".to_string());
                false
            }
        }
    }

    /// Redo the last undone edit. Returns `false` if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.history.redo(&mut self.grid) {
            Some(description) => {
                debug!("Redo: {}", description);
                self.project.mark_dirty();
                self.status_message = Some(format!("Redo: {}", description));
                true
            }
            None => {
                self.status_message = Some("Nothing to redo".to_string());
                false
            }
        }
    }

    /// Resize the map, keeping the overlapping tiles.
    ///
    /// History is kept; entries touching removed tiles skip those positions.
    pub fn resize_grid(&mut self, width: u32, height: u32) {
        info!(
            "Resizing map from {}x{} to {}x{}",
            self.grid.width(),
            self.grid.height(),
            width,
            height
        );
        self.grid.resize(width, height);
        self.selection.clear();
        self.dragging = false;
        self.viewport = self.viewport.clamped(&self.layout, self.grid.size());
        self.project.mark_dirty();
        self.validate();
    }

    /// Rescan the grid for textures missing from the catalog
    pub fn validate(&mut self) -> &[MissingResource] {
        self.missing_resources = self.grid.validate(&self.resources);
        if !self.missing_resources.is_empty() {
            warn!(
                "{} tile texture reference(s) missing from the catalog",
                self.missing_resources.len()
            );
        }
        &self.missing_resources
    }

    /// Register a texture and rescan
    pub fn add_texture(&mut self, name: impl Into<String>, region: TextureRegion) {
        self.resources.insert(name, region);
        self.project.mark_dirty();
        self.validate();
    }

    /// Remove a texture and rescan. Returns `false` if it was not registered.
    pub fn remove_texture(&mut self, name: &str) -> bool {
        let removed = self.resources.remove(name).is_some();
        if removed {
            self.project.mark_dirty();
            self.validate();
        }
        removed
    }

    pub fn set_tool(&mut self, tool: EditorTool) {
        if self.current_tool != tool {
            debug!("Tool: {}", tool.label());
            self.current_tool = tool;
            self.dragging = false;
        }
    }

    /// Choose the marker placed by the location tool.
    ///
    /// Switching into dungeon-entry mode starts a fresh entry list.
    pub fn set_location_kind(&mut self, kind: MarkerKind) {
        let entering = kind == MarkerKind::DungeonEntry
            && self.tool_settings.location != MarkerKind::DungeonEntry;
        if entering && !self.grid.dungeon_entries().is_empty() {
            info!("Clearing {} dungeon entries", self.grid.dungeon_entries().len());
            self.grid.clear_dungeon_entries();
            self.project.mark_dirty();
        }
        self.tool_settings.location = kind;
    }

    pub fn select_all(&mut self) {
        self.selection.select_all(self.grid.size());
    }

    /// Build the document that would be written to disk
    pub fn document(&self) -> MapDocument {
        let mut document = MapDocument::new(
            self.project.name.clone(),
            self.grid.clone(),
            self.resources.clone(),
        );
        document.id = self.project.id;
        document
    }

    /// Replace the map with an empty one. Texture catalog is kept.
    pub fn new_map(&mut self, width: u32, height: u32) {
        let grid = TileGrid::with_max_layers(width, height, self.grid.max_layers());
        self.replace_document(Project::new(UNTITLED), grid, self.resources.clone());
        info!("Created new {}x{} map", width, height);
        self.status_message = Some(format!("New {}x{} map", width, height));
    }

    /// Close the current map. Leaves an empty untitled map with no textures.
    pub fn close_map(&mut self) {
        let (width, height) = self.new_map_size;
        let grid = TileGrid::with_max_layers(width, height, self.grid.max_layers());
        info!("Closed {}", self.project.display_name());
        self.replace_document(Project::new(UNTITLED), grid, TextureCatalog::new());
        self.status_message = Some("Map closed".to_string());
    }

    /// Load a map from disk, replacing the current one and clearing history
    pub fn open_map(&mut self, path: &Path) -> Result<(), ProjectError> {
        match Project::load(path) {
            Ok((project, document)) => {
                self.replace_document(project, document.grid, document.resources);
                info!("Opened map {:?}", path);
                self.status_message = Some(format!("Opened {}", self.project.display_name()));
                Ok(())
            }
            Err(e) => {
                error!("Failed to open map {:?}: {}", path, e);
                self.error_message = Some(format!("Failed to open map: {}", e));
                Err(e)
            }
        }
    }

    /// Save the map to `path`, which becomes the current path
    pub fn save_map(&mut self, path: &Path) -> Result<(), ProjectError> {
        let document = self.document();
        let result = self.project.save(&document, path);
        self.report_save(result)
    }

    /// Save the map to its current path
    pub fn save_current(&mut self) -> Result<(), ProjectError> {
        let document = self.document();
        let result = self.project.save_current(&document);
        self.report_save(result)
    }

    fn report_save(&mut self, result: Result<(), ProjectError>) -> Result<(), ProjectError> {
        match &result {
            Ok(()) => {
                info!("Saved map to {:?}", self.project.path);
                self.status_message = Some(format!("Saved {}", self.project.display_name()));
            }
            Err(e) => {
                error!("Failed to save map: {}", e);
                self.error_message = Some(format!("Failed to save map: {}", e));
            }
        }
        result
    }

    fn replace_document(&mut self, project: Project, grid: TileGrid, resources: TextureCatalog) {
        self.grid = grid;
        self.resources = resources;
        self.project = project;
        self.history.clear();
        self.selection.clear();
        self.dragging = false;
        self.viewport.offset = Position::new(0, 0);
        self.viewport = self.viewport.clamped(&self.layout, self.grid.size());
        self.validate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeon_map_core::{Frame, TextureLayer, TileType};

    // Default layout is 1280x720 with a 40px toolbar; tiles are 32px at zoom 1
    fn center_of(x: i32, y: i32) -> Vec2 {
        Vec2::new(x as f32 * 32.0 + 16.0, 40.0 + y as f32 * 32.0 + 16.0)
    }

    fn editor(width: u32, height: u32) -> EditorState {
        let config = EditorStateConfig {
            grid_size: (width, height),
            ..Default::default()
        };
        let mut state = EditorState::new(&config);
        state.tool_settings.brush = Some(TextureLayer::single(Frame::new("grass")));
        state
    }

    #[test]
    fn test_click_paints_one_tile() {
        let mut state = editor(10, 10);
        state.set_tool(EditorTool::Paint);

        assert!(state.handle_pointer_down(center_of(2, 2)));
        assert_eq!(state.handle_pointer_up(), ToolOutcome::Recorded { tiles: 1 });

        let tile = state.grid().get(Position::new(2, 2)).unwrap();
        assert_eq!(tile.layer(0).unwrap().frames[0].texture, "grass");
        assert_eq!(state.history().undo_len(), 1);
        assert_eq!(state.status_message.as_deref(), Some("Paint 1 tile with grass"));
        assert!(state.project.is_dirty());
    }

    #[test]
    fn test_drag_paints_visited_tiles_as_one_step() {
        let mut state = editor(10, 10);
        state.set_tool(EditorTool::Paint);

        state.handle_pointer_down(center_of(0, 0));
        state.handle_pointer_move(center_of(1, 0));
        state.handle_pointer_move(center_of(2, 0));
        state.handle_pointer_move(center_of(1, 0));
        // Over the toolbar: ignored
        state.handle_pointer_move(Vec2::new(100.0, 10.0));
        assert_eq!(state.selection.len(), 3);

        assert_eq!(state.handle_pointer_up(), ToolOutcome::Recorded { tiles: 3 });
        assert_eq!(state.history().undo_len(), 1);

        assert!(state.undo());
        assert!(state.grid().tiles().iter().all(|t| t.is_bare()));
        assert_eq!(state.status_message.as_deref(), Some("Undo: Paint 3 tiles with grass"));
    }

    #[test]
    fn test_rectangle_mode_drag() {
        let mut state = editor(10, 10);
        state.set_tool(EditorTool::TileType);
        state.tool_settings.mode = ToolMode::Rectangle;

        state.handle_pointer_down(center_of(1, 1));
        state.handle_pointer_move(center_of(3, 2));
        assert_eq!(state.handle_pointer_up(), ToolOutcome::Recorded { tiles: 6 });
        assert_eq!(state.grid().get(Position::new(3, 2)).unwrap().tile_type, TileType::Wall);
        assert_eq!(state.grid().get(Position::new(0, 0)).unwrap().tile_type, TileType::Floor);
    }

    #[test]
    fn test_click_outside_work_area_is_ignored() {
        let mut state = editor(10, 10);
        assert!(!state.handle_pointer_down(Vec2::new(50.0, 20.0)));
        // Beyond the right edge of a 10-wide grid
        assert!(!state.handle_pointer_down(center_of(12, 0)));
        assert_eq!(state.handle_pointer_up(), ToolOutcome::Idle);
        assert!(!state.history().can_undo());
    }

    #[test]
    fn test_fill_floods_clicked_region() {
        let mut state = editor(6, 6);
        state.set_tool(EditorTool::TileType);
        for y in 0..6 {
            state.selection.extend(Position::new(3, y));
        }
        state.apply_active_tool();

        state.tool_settings.brush = Some(TextureLayer::single(Frame::new("water")));
        state.set_tool(EditorTool::Fill);
        state.handle_pointer_down(center_of(0, 0));
        assert_eq!(state.handle_pointer_up(), ToolOutcome::Recorded { tiles: 18 });
        assert!(state.grid().get(Position::new(2, 5)).unwrap().layer(0).is_some());
        assert!(state.grid().get(Position::new(4, 0)).unwrap().layer(0).is_none());
    }

    #[test]
    fn test_select_tool_does_not_edit() {
        let mut state = editor(5, 5);
        state.set_tool(EditorTool::Select);
        state.handle_pointer_down(center_of(0, 0));
        state.handle_pointer_move(center_of(1, 0));
        assert_eq!(state.handle_pointer_up(), ToolOutcome::Idle);
        assert_eq!(state.selection.len(), 2);
        assert!(!state.history().can_undo());
    }

    #[test]
    fn test_location_tool_ignores_drag() {
        let mut state = editor(5, 5);
        state.set_tool(EditorTool::Location);
        state.set_location_kind(MarkerKind::Exit);

        state.handle_pointer_down(center_of(1, 1));
        state.handle_pointer_move(center_of(2, 1));
        assert_eq!(state.handle_pointer_up(), ToolOutcome::MarkersChanged);
        assert_eq!(state.grid().marker(MarkerKind::Exit), Some(Position::new(1, 1)));
        assert!(!state.history().can_undo());
    }

    #[test]
    fn test_dungeon_entry_mode_switch_resets_entries() {
        let mut state = editor(5, 5);
        state.set_tool(EditorTool::Location);
        state.set_location_kind(MarkerKind::DungeonEntry);
        for x in 0..3 {
            state.handle_pointer_down(center_of(x, 0));
            state.handle_pointer_up();
        }
        assert_eq!(state.grid().dungeon_entries().len(), 3);

        // Staying in the mode keeps entries
        state.set_location_kind(MarkerKind::DungeonEntry);
        assert_eq!(state.grid().dungeon_entries().len(), 3);

        state.set_location_kind(MarkerKind::Start);
        assert_eq!(state.grid().dungeon_entries().len(), 3);
        state.set_location_kind(MarkerKind::DungeonEntry);
        assert!(state.grid().dungeon_entries().is_empty());
    }

    #[test]
    fn test_empty_history_reports_status() {
        let mut state = editor(3, 3);
        assert!(!state.undo());
        assert_eq!(state.status_message.as_deref(), Some("Nothing to undo"));
        assert!(!state.redo());
        assert_eq!(state.status_message.as_deref(), Some("Nothing to redo"));
    }

    #[test]
    fn test_resize_clamps_viewport_and_revalidates() {
        let mut state = editor(100, 100);
        state.handle_pan(Vec2::new(10_000.0, 10_000.0));
        // 1280x680 work area at 32px shows 40x21 tiles
        assert_eq!(state.viewport.offset, Position::new(60, 79));

        state.selection.select_point(Position::new(90, 90));
        state.apply_active_tool();
        assert_eq!(state.missing_resources.len(), 0);

        state.resize_grid(95, 95);
        assert_eq!(state.missing_resources.len(), 1);
        assert_eq!(state.viewport.offset, Position::new(55, 74));

        state.resize_grid(20, 20);
        assert_eq!(state.viewport.offset, Position::new(0, 0));
        assert!(state.missing_resources.is_empty());
        assert!(state.selection.is_empty());
    }

    #[test]
    fn test_texture_catalog_updates_missing_resources() {
        let mut state = editor(4, 4);
        state.selection.select_point(Position::new(0, 0));
        state.apply_active_tool();
        assert_eq!(state.validate().len(), 1);

        let region = TextureRegion {
            image: 0,
            rect: [0.0, 0.0, 32.0, 32.0],
        };
        state.add_texture("grass", region);
        assert!(state.missing_resources.is_empty());

        assert!(state.remove_texture("grass"));
        assert_eq!(state.missing_resources[0].texture_name, "grass");
        assert!(!state.remove_texture("grass"));
    }

    #[test]
    fn test_zoom_keeps_viewport_valid() {
        let mut state = editor(50, 50);
        for _ in 0..40 {
            state.handle_zoom(center_of(5, 5), -1.0);
        }
        assert_eq!(state.viewport.zoom, crate::viewport::MIN_ZOOM);
        assert_eq!(state.viewport.offset, Position::new(0, 0));

        for _ in 0..40 {
            state.handle_zoom(center_of(30, 15), 1.0);
        }
        assert_eq!(state.viewport.zoom, crate::viewport::MAX_ZOOM);
        let (visible_x, visible_y) = state.viewport.visible_tiles(&state.layout);
        assert!(state.viewport.offset.x <= 50 - visible_x);
        assert!(state.viewport.offset.y <= 50 - visible_y);
    }

    #[test]
    fn test_save_and_open_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("level.json");

        let mut state = editor(8, 8);
        state.selection.select_point(Position::new(4, 4));
        state.apply_active_tool();
        state.set_tool(EditorTool::Location);
        state.set_location_kind(MarkerKind::Start);
        state.apply_active_tool();
        state.save_map(&path).unwrap();
        assert!(!state.project.is_dirty());
        let saved_grid = state.grid().clone();

        state.new_map(3, 3);
        assert_eq!(state.grid().size(), (3, 3));
        assert!(!state.history().can_undo());
        assert!(state.save_current().is_err());
        assert!(state.error_message.is_some());

        state.open_map(&path).unwrap();
        assert_eq!(state.grid(), &saved_grid);
        assert_eq!(state.grid().marker(MarkerKind::Start), Some(Position::new(4, 4)));
        assert!(!state.history().can_undo());
        assert_eq!(state.project.path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_close_map_drops_document_and_history() {
        let mut state = editor(8, 8);
        state.new_map_size = (5, 4);
        state.add_texture(
            "grass",
            TextureRegion {
                image: 0,
                rect: [0.0, 0.0, 32.0, 32.0],
            },
        );
        state.selection.select_point(Position::new(1, 1));
        state.apply_active_tool();
        assert!(state.history().can_undo());

        state.close_map();
        assert_eq!(state.grid().size(), (5, 4));
        assert!(state.grid().tiles().iter().all(|t| t.is_bare()));
        assert!(!state.history().can_undo());
        assert!(!state.history().can_redo());
        assert!(state.resources.is_empty());
        assert!(state.selection.is_empty());
        assert_eq!(state.project.path, None);
        assert!(!state.project.is_dirty());
        assert!(!state.undo());
    }

    #[test]
    fn test_open_missing_file_sets_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = editor(4, 4);
        let before = state.grid().clone();
        assert!(state.open_map(&dir.path().join("nope.json")).is_err());
        assert!(state.error_message.is_some());
        assert_eq!(state.grid(), &before);
    }
}
