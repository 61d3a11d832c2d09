//! Editor tools - paint, fill, erase, tile type and location markers
//!
//! Each tool is a function from the current tile to an optional new tile.
//! `None` means "unchanged", so re-applying a tool that has nothing to do
//! records no history entry.

mod input;

pub use input::{EditorToolsPlugin, ViewportInputState};

use crate::commands::{CommandHistory, TileChangeAction};
use dungeon_map_core::{MarkerKind, Position, TextureLayer, Tile, TileGrid, TileType};
use serde::{Deserialize, Serialize};

/// Available editor tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EditorTool {
    Select,
    #[default]
    Paint,
    Fill,
    Erase,
    TileType,
    Location,
}

impl EditorTool {
    pub fn all() -> &'static [EditorTool] {
        &[
            EditorTool::Select,
            EditorTool::Paint,
            EditorTool::Fill,
            EditorTool::Erase,
            EditorTool::TileType,
            EditorTool::Location,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            EditorTool::Select => "Select",
            EditorTool::Paint => "Paint",
            EditorTool::Fill => "Fill",
            EditorTool::Erase => "Erase",
            EditorTool::TileType => "Tile Type",
            EditorTool::Location => "Location",
        }
    }

    /// Returns true if dragging with this tool adds tiles to the selection
    pub fn supports_multi_tile(&self) -> bool {
        matches!(
            self,
            EditorTool::Select | EditorTool::Paint | EditorTool::Erase | EditorTool::TileType
        )
    }

    /// Returns true if this tool supports Point/Rectangle modes
    pub fn supports_modes(&self) -> bool {
        matches!(
            self,
            EditorTool::Select | EditorTool::Paint | EditorTool::Erase | EditorTool::TileType
        )
    }

    /// Returns true if releasing the pointer applies the tool to the selection
    pub fn edits_tiles(&self) -> bool {
        !matches!(self, EditorTool::Select)
    }
}

/// Tool mode for drag operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToolMode {
    /// Tiles are added as the pointer visits them
    #[default]
    Point,
    /// Drag defines a rectangle
    Rectangle,
}

impl ToolMode {
    pub fn label(&self) -> &'static str {
        match self {
            ToolMode::Point => "Point",
            ToolMode::Rectangle => "Rect",
        }
    }
}

/// What the erase tool removes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EraseMode {
    /// Clear the whole active layer
    #[default]
    Block,
    /// Remove only the topmost frame of the topmost filled layer
    TopOnly,
}

impl EraseMode {
    pub fn toggled(self) -> Self {
        match self {
            EraseMode::Block => EraseMode::TopOnly,
            EraseMode::TopOnly => EraseMode::Block,
        }
    }
}

/// Per-tool settings chosen in the toolbar
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolSettings {
    /// Layer index painted and erased by the paint/fill/erase tools
    pub active_layer: usize,
    /// Layer content laid down by paint and fill
    pub brush: Option<TextureLayer>,
    pub erase_mode: EraseMode,
    /// Tile type tool writes `Floor` instead of `Wall`
    pub type_swapped: bool,
    /// Marker placed by the location tool
    pub location: MarkerKind,
    pub mode: ToolMode,
}

/// Result of applying a tool to the selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    /// No targets, no brush, or a tool that does not edit tiles
    Idle,
    /// Every target already had the requested value
    Unchanged,
    /// A tile change covering `tiles` positions was recorded
    Recorded { tiles: usize },
    /// Markers were placed directly on the grid
    MarkersChanged,
}

/// Compute the new value of a tile under a tile-editing tool.
///
/// Returns `None` if the tool would leave the tile unchanged. The location
/// and select tools never change tiles.
pub fn transform_tile(tile: &Tile, tool: EditorTool, settings: &ToolSettings, max_layers: usize) -> Option<Tile> {
    match tool {
        EditorTool::Paint | EditorTool::Fill => {
            let brush = settings.brush.as_ref()?;
            paint_layer(tile, settings.active_layer, brush, max_layers)
        }
        EditorTool::Erase => match settings.erase_mode {
            EraseMode::Block => erase_layer(tile, settings.active_layer),
            EraseMode::TopOnly => erase_top_frame(tile),
        },
        EditorTool::TileType => {
            let target = if settings.type_swapped {
                TileType::Floor
            } else {
                TileType::Wall
            };
            (tile.tile_type != target).then(|| tile.clone().with_type(target))
        }
        EditorTool::Select | EditorTool::Location => None,
    }
}

fn paint_layer(tile: &Tile, index: usize, brush: &TextureLayer, max_layers: usize) -> Option<Tile> {
    if index >= max_layers || tile.layer(index) == Some(brush) {
        return None;
    }
    let mut painted = tile.clone();
    painted.set_layer(index, brush.clone());
    Some(painted)
}

/// Clear the active layer in place. The index stays so higher layers keep their meaning.
fn erase_layer(tile: &Tile, index: usize) -> Option<Tile> {
    if tile.layer(index).is_none_or(TextureLayer::is_empty) {
        return None;
    }
    let mut erased = tile.clone();
    erased.texture_layers[index] = TextureLayer::empty();
    Some(erased)
}

fn erase_top_frame(tile: &Tile) -> Option<Tile> {
    let index = tile.topmost_filled_layer()?;
    let mut erased = tile.clone();
    let layer = &mut erased.texture_layers[index];
    layer.frames.pop();
    if layer.is_empty() {
        // Only the last entry is truncated; lower layers stay as empty slots
        if index + 1 == erased.texture_layers.len() {
            erased.texture_layers.pop();
        }
    } else if layer.current_frame >= layer.frames.len() {
        layer.current_frame = layer.frames.len() - 1;
    }
    Some(erased)
}

/// Apply `tool` to every target position.
///
/// Tile edits are batched into a single history entry; if no tile changes,
/// nothing is recorded. Location markers are written straight to the grid
/// and are not part of history.
pub fn apply_tool(
    grid: &mut TileGrid,
    history: &mut CommandHistory,
    tool: EditorTool,
    settings: &ToolSettings,
    targets: &[Position],
) -> ToolOutcome {
    if targets.is_empty() {
        return ToolOutcome::Idle;
    }

    match tool {
        EditorTool::Select => ToolOutcome::Idle,
        EditorTool::Paint | EditorTool::Fill if settings.brush.is_none() => ToolOutcome::Idle,
        EditorTool::Location => {
            let mut changed = false;
            for &pos in targets {
                changed |= grid.place_marker(settings.location, pos);
            }
            if changed {
                ToolOutcome::MarkersChanged
            } else {
                ToolOutcome::Unchanged
            }
        }
        _ => {
            let max_layers = grid.max_layers();
            let new_tiles: Vec<(Position, Tile)> = targets
                .iter()
                .filter_map(|&pos| {
                    let tile = grid.get(pos)?;
                    transform_tile(tile, tool, settings, max_layers).map(|new_tile| (pos, new_tile))
                })
                .collect();

            let description = describe(tool, settings, new_tiles.len());
            match TileChangeAction::from_grid(grid, new_tiles, description) {
                Ok(action) => {
                    let tiles = action.len();
                    history.record_and_apply(Box::new(action), grid);
                    ToolOutcome::Recorded { tiles }
                }
                Err(_) => ToolOutcome::Unchanged,
            }
        }
    }
}

fn describe(tool: EditorTool, settings: &ToolSettings, count: usize) -> String {
    let noun = if count == 1 { "tile" } else { "tiles" };
    match tool {
        EditorTool::Paint | EditorTool::Fill => {
            let texture = settings
                .brush
                .as_ref()
                .and_then(|b| b.frames.first())
                .map(|f| f.texture.as_str())
                .unwrap_or("empty");
            format!("{} {} {} with {}", tool.label(), count, noun, texture)
        }
        EditorTool::Erase => format!("Erase {} {}", count, noun),
        EditorTool::TileType => {
            let tile_type = if settings.type_swapped {
                TileType::Floor
            } else {
                TileType::Wall
            };
            format!("Set {} {} to {}", count, noun, tile_type.display_name())
        }
        EditorTool::Select | EditorTool::Location => tool.label().to_string(),
    }
}
