//! Dense tile grid with map-level markers
//!
//! Tiles are stored in a flat array indexed by `y * width + x`. Positions act
//! as indices into that array; out-of-range positions are ignored by every
//! accessor instead of being treated as errors, because editor tools routinely
//! compute speculative positions near the edges.

use crate::{MissingResource, Position, ResourceCatalog, Tile};
use serde::{Deserialize, Serialize};

/// Default number of authoring layers per tile
pub const DEFAULT_MAX_LAYERS: usize = 4;

/// Largest width or height a grid accepts; positions are `i32`
pub const MAX_DIMENSION: u32 = i32::MAX as u32;

/// Map-level marker kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MarkerKind {
    #[default]
    Start,
    Exit,
    Respawn,
    /// Additive list of dungeon entrances
    DungeonEntry,
}

impl MarkerKind {
    /// Get display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            MarkerKind::Start => "Start",
            MarkerKind::Exit => "Exit",
            MarkerKind::Respawn => "Respawn",
            MarkerKind::DungeonEntry => "Dungeon Entry",
        }
    }
}

/// Error building a grid from serialized parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// The tile array does not have `width * height` entries
    TileCountMismatch { expected: usize, found: usize },
    /// Width or height cannot be addressed by a `Position`
    DimensionTooLarge { width: u32, height: u32 },
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::TileCountMismatch { expected, found } => write!(
                f,
                "tile array has {} entries, expected {} for the map dimensions",
                found, expected
            ),
            GridError::DimensionTooLarge { width, height } => write!(
                f,
                "map size {}x{} exceeds the maximum dimension {}",
                width, height, MAX_DIMENSION
            ),
        }
    }
}

impl std::error::Error for GridError {}

/// The editable map: tiles plus start/exit/respawn/dungeon-entry markers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridData", into = "GridData")]
pub struct TileGrid {
    width: u32,
    height: u32,
    max_layers: usize,
    tiles: Vec<Tile>,
    start: Position,
    exit: Position,
    respawn: Position,
    dungeon_entries: Vec<Position>,
}

/// Serialized shape of [`TileGrid`]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GridData {
    width: u32,
    height: u32,
    #[serde(default = "default_max_layers")]
    max_layers: usize,
    tiles: Vec<Tile>,
    #[serde(default = "unset")]
    start: Position,
    #[serde(default = "unset")]
    exit: Position,
    #[serde(default = "unset")]
    respawn: Position,
    #[serde(default, rename = "dungeonEntry")]
    dungeon_entries: Vec<Position>,
}

fn default_max_layers() -> usize {
    DEFAULT_MAX_LAYERS
}

fn unset() -> Position {
    Position::UNSET
}

impl TryFrom<GridData> for TileGrid {
    type Error = GridError;

    fn try_from(data: GridData) -> Result<Self, Self::Error> {
        if data.width > MAX_DIMENSION || data.height > MAX_DIMENSION {
            return Err(GridError::DimensionTooLarge {
                width: data.width,
                height: data.height,
            });
        }
        let expected = data.width as usize * data.height as usize;
        if data.tiles.len() != expected {
            return Err(GridError::TileCountMismatch {
                expected,
                found: data.tiles.len(),
            });
        }

        let mut grid = TileGrid {
            width: data.width,
            height: data.height,
            max_layers: data.max_layers,
            tiles: data.tiles,
            start: data.start,
            exit: data.exit,
            respawn: data.respawn,
            dungeon_entries: data.dungeon_entries,
        };

        // Array order is authoritative; stored positions are only a convenience
        let width = grid.width as i32;
        for (index, tile) in grid.tiles.iter_mut().enumerate() {
            tile.position = Position::new(index as i32 % width, index as i32 / width);
            tile.texture_layers.truncate(grid.max_layers);
        }
        grid.clamp_markers();
        Ok(grid)
    }
}

impl From<TileGrid> for GridData {
    fn from(grid: TileGrid) -> Self {
        Self {
            width: grid.width,
            height: grid.height,
            max_layers: grid.max_layers,
            tiles: grid.tiles,
            start: grid.start,
            exit: grid.exit,
            respawn: grid.respawn,
            dungeon_entries: grid.dungeon_entries,
        }
    }
}

impl Default for TileGrid {
    fn default() -> Self {
        Self::new(50, 50)
    }
}

impl TileGrid {
    /// Create a grid of floor tiles with no texture layers
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_max_layers(width, height, DEFAULT_MAX_LAYERS)
    }

    /// Create a grid with a custom layer limit. Dimensions are clamped to [`MAX_DIMENSION`].
    pub fn with_max_layers(width: u32, height: u32, max_layers: usize) -> Self {
        let width = width.min(MAX_DIMENSION);
        let height = height.min(MAX_DIMENSION);
        let tiles = (0..height as i32)
            .flat_map(|y| (0..width as i32).map(move |x| Tile::new(Position::new(x, y))))
            .collect();

        Self {
            width,
            height,
            max_layers,
            tiles,
            start: Position::UNSET,
            exit: Position::UNSET,
            respawn: Position::UNSET,
            dungeon_entries: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)` in tiles
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn max_layers(&self) -> usize {
        self.max_layers
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    /// Flat array index of a position
    pub fn index_of(&self, pos: Position) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(pos.y as usize * self.width as usize + pos.x as usize)
        } else {
            None
        }
    }

    /// Get tile at position
    pub fn get(&self, pos: Position) -> Option<&Tile> {
        self.index_of(pos).and_then(|index| self.tiles.get(index))
    }

    /// Store a tile at position. Out-of-bounds positions are ignored.
    ///
    /// The stored copy is re-stamped with `pos`, and layers beyond the
    /// configured maximum are dropped.
    pub fn set(&mut self, pos: Position, mut tile: Tile) {
        let Some(index) = self.index_of(pos) else {
            return;
        };
        tile.position = pos;
        tile.texture_layers.truncate(self.max_layers);
        self.tiles[index] = tile;
    }

    /// All tiles in row-major order
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// All positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height as i32).flat_map(move |y| (0..self.width as i32).map(move |x| Position::new(x, y)))
    }

    /// Resize the grid, keeping tiles in the overlapping rectangle.
    ///
    /// New cells become bare floor tiles. Markers that fall outside the new
    /// bounds are reset. Dimensions are clamped to [`MAX_DIMENSION`].
    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        let new_width = new_width.min(MAX_DIMENSION);
        let new_height = new_height.min(MAX_DIMENSION);
        let mut old_tiles: Vec<Option<Tile>> = std::mem::take(&mut self.tiles).into_iter().map(Some).collect();
        let old_width = self.width;
        let old_height = self.height;

        let mut tiles = Vec::with_capacity(new_width as usize * new_height as usize);
        for y in 0..new_height {
            for x in 0..new_width {
                let pos = Position::new(x as i32, y as i32);
                let kept = if x < old_width && y < old_height {
                    old_tiles[(y * old_width + x) as usize].take()
                } else {
                    None
                };
                let tile = match kept {
                    Some(mut tile) => {
                        tile.position = pos;
                        tile
                    }
                    None => Tile::new(pos),
                };
                tiles.push(tile);
            }
        }

        self.tiles = tiles;
        self.width = new_width;
        self.height = new_height;
        self.clamp_markers();
    }

    /// Report every frame that names a texture missing from `catalog`
    pub fn validate(&self, catalog: &dyn ResourceCatalog) -> Vec<MissingResource> {
        let mut missing = Vec::new();
        for tile in &self.tiles {
            let first_for_tile = missing.len();
            for name in tile.texture_layers.iter().flat_map(|l| l.texture_names()) {
                if catalog.texture_exists(name) {
                    continue;
                }
                let already_reported = missing[first_for_tile..]
                    .iter()
                    .any(|m: &MissingResource| m.texture_name == name);
                if !already_reported {
                    missing.push(MissingResource {
                        position: tile.position,
                        texture_name: name.to_string(),
                    });
                }
            }
        }
        missing
    }

    /// Position of a scalar marker. Dungeon entries are a list, see [`Self::dungeon_entries`].
    pub fn marker(&self, kind: MarkerKind) -> Option<Position> {
        let pos = match kind {
            MarkerKind::Start => self.start,
            MarkerKind::Exit => self.exit,
            MarkerKind::Respawn => self.respawn,
            MarkerKind::DungeonEntry => return None,
        };
        pos.is_set().then_some(pos)
    }

    pub fn dungeon_entries(&self) -> &[Position] {
        &self.dungeon_entries
    }

    /// Place a marker. Start/exit/respawn are overwritten; dungeon entries are
    /// appended unless already present.
    ///
    /// Returns `true` if the grid changed.
    pub fn place_marker(&mut self, kind: MarkerKind, pos: Position) -> bool {
        if !self.in_bounds(pos) {
            return false;
        }
        let slot = match kind {
            MarkerKind::Start => &mut self.start,
            MarkerKind::Exit => &mut self.exit,
            MarkerKind::Respawn => &mut self.respawn,
            MarkerKind::DungeonEntry => return self.add_dungeon_entry(pos),
        };
        let changed = *slot != pos;
        *slot = pos;
        changed
    }

    /// Append a dungeon entry. Returns `false` if it was already listed or out of bounds.
    pub fn add_dungeon_entry(&mut self, pos: Position) -> bool {
        if !self.in_bounds(pos) || self.dungeon_entries.contains(&pos) {
            return false;
        }
        self.dungeon_entries.push(pos);
        true
    }

    pub fn clear_dungeon_entries(&mut self) {
        self.dungeon_entries.clear();
    }

    /// Reset markers that are outside the grid
    fn clamp_markers(&mut self) {
        let (width, height) = (self.width as i32, self.height as i32);
        let inside = |p: &Position| p.x >= 0 && p.y >= 0 && p.x < width && p.y < height;

        for slot in [&mut self.start, &mut self.exit, &mut self.respawn] {
            if !inside(&*slot) {
                *slot = Position::UNSET;
            }
        }

        let mut seen = Vec::with_capacity(self.dungeon_entries.len());
        self.dungeon_entries.retain(|p| {
            if inside(p) && !seen.contains(p) {
                seen.push(*p);
                true
            } else {
                false
            }
        });
    }
}
