//! Tile selection: point, drag, rectangle and flood-fill regions

use dungeon_map_core::{Position, TileGrid};
use std::collections::HashSet;

/// Ordered set of selected tile positions
///
/// Positions keep the order they were added in, which is the order tools
/// visit them. Duplicates are rejected by membership check.
#[derive(Debug, Clone, Default)]
pub struct TileSelection {
    positions: Vec<Position>,
    members: HashSet<Position>,
    /// Tile where the current drag started
    anchor: Option<Position>,
}

impl TileSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the selection
    pub fn clear(&mut self) {
        self.positions.clear();
        self.members.clear();
        self.anchor = None;
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Selected positions in visit order
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.members.contains(&pos)
    }

    pub fn anchor(&self) -> Option<Position> {
        self.anchor
    }

    /// Replace the selection with a single tile and make it the drag anchor
    pub fn select_point(&mut self, pos: Position) {
        self.clear();
        self.push(pos);
        self.anchor = Some(pos);
    }

    /// Append a tile visited while dragging. Returns `false` if already selected.
    pub fn extend(&mut self, pos: Position) -> bool {
        if self.anchor.is_none() {
            self.anchor = Some(pos);
        }
        self.push(pos)
    }

    /// Replace the selection with the rectangle spanned by two corners,
    /// clamped to the grid, in row-major order
    pub fn select_rectangle(&mut self, a: Position, b: Position, grid_size: (u32, u32)) {
        self.clear();
        self.anchor = Some(a);

        let (width, height) = (grid_size.0 as i32, grid_size.1 as i32);
        if width == 0 || height == 0 {
            return;
        }
        let min_x = a.x.min(b.x).max(0);
        let max_x = a.x.max(b.x).min(width - 1);
        let min_y = a.y.min(b.y).max(0);
        let max_y = a.y.max(b.y).min(height - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                self.push(Position::new(x, y));
            }
        }
    }

    /// Stretch a rectangle selection from the drag anchor to `pos`
    pub fn drag_rectangle_to(&mut self, pos: Position, grid_size: (u32, u32)) {
        let anchor = self.anchor.unwrap_or(pos);
        self.select_rectangle(anchor, pos, grid_size);
    }

    /// Replace the selection with an explicit region
    pub fn select_region(&mut self, region: impl IntoIterator<Item = Position>) {
        self.clear();
        for pos in region {
            if self.anchor.is_none() {
                self.anchor = Some(pos);
            }
            self.push(pos);
        }
    }

    /// Select every tile of the grid
    pub fn select_all(&mut self, grid_size: (u32, u32)) {
        if grid_size.0 == 0 || grid_size.1 == 0 {
            self.clear();
            return;
        }
        self.select_rectangle(
            Position::new(0, 0),
            Position::new(grid_size.0 as i32 - 1, grid_size.1 as i32 - 1),
            grid_size,
        );
    }

    fn push(&mut self, pos: Position) -> bool {
        if self.members.insert(pos) {
            self.positions.push(pos);
            true
        } else {
            false
        }
    }
}

/// Grow the 4-connected region of tiles pattern-equal to the tile at `start`
///
/// Uses an explicit stack so region size is bounded only by grid area. Each
/// matching tile appears exactly once in the result; an out-of-bounds start
/// yields an empty region.
pub fn flood_fill(grid: &TileGrid, start: Position) -> Vec<Position> {
    let Some(source) = grid.get(start) else {
        return Vec::new();
    };

    let mut region = Vec::new();
    let mut stack = vec![start];
    let mut visited = HashSet::new();
    visited.insert(start);

    while let Some(pos) = stack.pop() {
        region.push(pos);

        for neighbour in pos.neighbours() {
            if visited.contains(&neighbour) {
                continue;
            }
            let Some(tile) = grid.get(neighbour) else {
                continue;
            };
            if tile.pattern_eq(source) {
                visited.insert(neighbour);
                stack.push(neighbour);
            }
        }
    }

    region
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeon_map_core::{Frame, TextureLayer, Tile, TileType};

    fn stone_tile(pos: Position) -> Tile {
        Tile::new(pos).with_layer(0, TextureLayer::single(Frame::new("stone")))
    }

    #[test]
    fn test_point_selection() {
        let mut selection = TileSelection::new();
        selection.extend(Position::new(1, 1));
        selection.select_point(Position::new(4, 2));
        assert_eq!(selection.positions(), &[Position::new(4, 2)]);
        assert_eq!(selection.anchor(), Some(Position::new(4, 2)));
    }

    #[test]
    fn test_drag_rejects_duplicates_and_keeps_order() {
        let mut selection = TileSelection::new();
        selection.select_point(Position::new(0, 0));
        assert!(selection.extend(Position::new(1, 0)));
        assert!(selection.extend(Position::new(2, 0)));
        assert!(!selection.extend(Position::new(1, 0)));
        assert!(selection.extend(Position::new(2, 1)));

        assert_eq!(
            selection.positions(),
            &[
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(2, 0),
                Position::new(2, 1)
            ]
        );
    }

    #[test]
    fn test_rectangle_is_clamped_and_row_major() {
        let mut selection = TileSelection::new();
        selection.select_rectangle(Position::new(3, 2), Position::new(-2, 1), (3, 3));
        assert_eq!(
            selection.positions(),
            &[
                Position::new(0, 1),
                Position::new(1, 1),
                Position::new(2, 1),
                Position::new(0, 2),
                Position::new(1, 2),
                Position::new(2, 2)
            ]
        );

        selection.drag_rectangle_to(Position::new(1, 2), (3, 3));
        assert_eq!(selection.positions(), &[Position::new(1, 2), Position::new(2, 2)]);
        assert_eq!(selection.anchor(), Some(Position::new(3, 2)));
    }

    #[test]
    fn test_select_all() {
        let mut selection = TileSelection::new();
        selection.select_all((4, 3));
        assert_eq!(selection.len(), 12);
        selection.select_all((0, 3));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_flood_fill_3x3_block() {
        let mut grid = TileGrid::new(7, 7);
        for y in 2..=4 {
            for x in 2..=4 {
                grid.set(Position::new(x, y), stone_tile(Position::new(x, y)));
            }
        }

        let region = flood_fill(&grid, Position::new(3, 3));
        assert_eq!(region.len(), 9);
        let unique: HashSet<_> = region.iter().copied().collect();
        assert_eq!(unique.len(), 9);
        for y in 2..=4 {
            for x in 2..=4 {
                assert!(unique.contains(&Position::new(x, y)));
            }
        }
    }

    #[test]
    fn test_flood_fill_is_four_connected() {
        let mut grid = TileGrid::new(3, 3);
        // Diagonal stones must not connect
        grid.set(Position::new(0, 0), stone_tile(Position::new(0, 0)));
        grid.set(Position::new(1, 1), stone_tile(Position::new(1, 1)));

        assert_eq!(flood_fill(&grid, Position::new(0, 0)), vec![Position::new(0, 0)]);
    }

    #[test]
    fn test_flood_fill_whole_uniform_grid() {
        let grid = TileGrid::new(20, 15);
        let region = flood_fill(&grid, Position::new(19, 14));
        assert_eq!(region.len(), 300);
        assert_eq!(region.iter().collect::<HashSet<_>>().len(), 300);
    }

    #[test]
    fn test_flood_fill_distinguishes_type_and_layers() {
        let mut grid = TileGrid::new(3, 1);
        grid.set(Position::new(1, 0), Tile::new(Position::new(1, 0)).with_type(TileType::Wall));
        assert_eq!(flood_fill(&grid, Position::new(0, 0)), vec![Position::new(0, 0)]);

        // Same texture, but an extra empty layer changes the layer count
        let mut grid = TileGrid::new(2, 1);
        grid.set(Position::new(0, 0), stone_tile(Position::new(0, 0)));
        grid.set(
            Position::new(1, 0),
            stone_tile(Position::new(1, 0)).with_layer(1, TextureLayer::empty()),
        );
        assert_eq!(flood_fill(&grid, Position::new(0, 0)).len(), 1);
    }

    #[test]
    fn test_flood_fill_out_of_bounds() {
        let grid = TileGrid::new(3, 3);
        assert!(flood_fill(&grid, Position::new(3, 0)).is_empty());
        assert!(flood_fill(&grid, Position::UNSET).is_empty());
    }
}
