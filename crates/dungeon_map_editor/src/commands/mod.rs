//! Undo/redo command history and keyboard shortcuts
//!
//! Every tile edit is wrapped in an [`EditorCommand`] and pushed through
//! [`CommandHistory::record_and_apply`]. Commands carry their own before/after
//! snapshots, so replaying them never depends on the current grid contents.

mod shortcuts;

pub use shortcuts::handle_keyboard_shortcuts;

use dungeon_map_core::{Position, Tile, TileGrid};
use std::collections::VecDeque;

/// Default number of undo steps kept
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// A reversible grid edit
pub trait EditorCommand: Send + Sync {
    /// Apply the edit to the grid
    fn apply(&self, grid: &mut TileGrid);

    /// Restore the grid to its state before the edit
    fn revert(&self, grid: &mut TileGrid);

    /// Human-readable description for menus and status messages
    fn description(&self) -> &str;
}

/// Errors building commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// A tile change must cover at least one position
    EmptyBatch,
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::EmptyBatch => write!(f, "Tile change has no positions"),
        }
    }
}

impl std::error::Error for CommandError {}

/// Before/after state of a single tile
#[derive(Debug, Clone, PartialEq)]
pub struct TileChange {
    pub position: Position,
    pub before: Tile,
    pub after: Tile,
}

/// A batch of tile replacements recorded as one undo step
///
/// Holds owned copies of every tile before and after the edit. Positions that
/// are out of bounds when the command runs (after a resize, for example) are
/// skipped and the rest of the batch is still applied.
#[derive(Debug, Clone)]
pub struct TileChangeAction {
    positions: Vec<Position>,
    before: Vec<Tile>,
    after: Vec<Tile>,
    description: String,
}

impl TileChangeAction {
    pub fn new(changes: Vec<TileChange>, description: impl Into<String>) -> Result<Self, CommandError> {
        if changes.is_empty() {
            return Err(CommandError::EmptyBatch);
        }

        let mut positions = Vec::with_capacity(changes.len());
        let mut before = Vec::with_capacity(changes.len());
        let mut after = Vec::with_capacity(changes.len());
        for change in changes {
            positions.push(change.position);
            before.push(change.before);
            after.push(change.after);
        }

        Ok(Self {
            positions,
            before,
            after,
            description: description.into(),
        })
    }

    /// Build a batch from new tile values, snapshotting the current ones from `grid`.
    ///
    /// Positions outside the grid are dropped.
    pub fn from_grid(
        grid: &TileGrid,
        new_tiles: Vec<(Position, Tile)>,
        description: impl Into<String>,
    ) -> Result<Self, CommandError> {
        let changes = new_tiles
            .into_iter()
            .filter_map(|(position, after)| {
                grid.get(position).map(|current| TileChange {
                    position,
                    before: current.clone(),
                    after,
                })
            })
            .collect();
        Self::new(changes, description)
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl EditorCommand for TileChangeAction {
    fn apply(&self, grid: &mut TileGrid) {
        for (pos, tile) in self.positions.iter().zip(&self.after) {
            grid.set(*pos, tile.clone());
        }
    }

    fn revert(&self, grid: &mut TileGrid) {
        for (pos, tile) in self.positions.iter().zip(&self.before) {
            grid.set(*pos, tile.clone());
        }
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Bounded undo and redo stacks
pub struct CommandHistory {
    undo_stack: VecDeque<Box<dyn EditorCommand>>,
    redo_stack: Vec<Box<dyn EditorCommand>>,
    capacity: usize,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl std::fmt::Debug for CommandHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandHistory")
            .field("undo", &self.undo_stack.len())
            .field("redo", &self.redo_stack.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl CommandHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            undo_stack: VecDeque::with_capacity(capacity),
            redo_stack: Vec::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Apply a new command, push it for undo and invalidate redo
    pub fn record_and_apply(&mut self, command: Box<dyn EditorCommand>, grid: &mut TileGrid) {
        command.apply(grid);
        self.push_undo(command);
        self.redo_stack.clear();
    }

    /// Revert the most recent command. Returns its description, or `None` if
    /// there was nothing to undo.
    pub fn undo(&mut self, grid: &mut TileGrid) -> Option<String> {
        let command = self.undo_stack.pop_back()?;
        command.revert(grid);
        let description = command.description().to_string();
        self.redo_stack.push(command);
        Some(description)
    }

    /// Re-apply the most recently undone command. Returns its description, or
    /// `None` if there was nothing to redo.
    pub fn redo(&mut self, grid: &mut TileGrid) -> Option<String> {
        let command = self.redo_stack.pop()?;
        command.apply(grid);
        let description = command.description().to_string();
        self.push_undo(command);
        Some(description)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(|c| c.description())
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(|c| c.description())
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Drop all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    fn push_undo(&mut self, command: Box<dyn EditorCommand>) {
        self.undo_stack.push_back(command);
        while self.undo_stack.len() > self.capacity {
            self.undo_stack.pop_front();
        }
    }
}
