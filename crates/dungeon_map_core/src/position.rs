//! Integer tile coordinates

use serde::{Deserialize, Serialize};

/// An integer tile coordinate on the map grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Sentinel for markers that have not been placed yet
    pub const UNSET: Position = Position { x: -1, y: -1 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Whether this is a real coordinate rather than [`Position::UNSET`]
    pub fn is_set(&self) -> bool {
        *self != Self::UNSET
    }

    /// Offset by a delta, returning a new position
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// The four orthogonal neighbours (left, right, up, down)
    pub fn neighbours(&self) -> [Position; 4] {
        [
            self.offset(-1, 0),
            self.offset(1, 0),
            self.offset(0, -1),
            self.offset(0, 1),
        ]
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_sentinel() {
        assert!(!Position::UNSET.is_set());
        assert!(Position::new(0, 0).is_set());
        assert!(Position::new(-1, 0).is_set());
    }

    #[test]
    fn test_neighbours() {
        let n = Position::new(3, 4).neighbours();
        assert!(n.contains(&Position::new(2, 4)));
        assert!(n.contains(&Position::new(4, 4)));
        assert!(n.contains(&Position::new(3, 3)));
        assert!(n.contains(&Position::new(3, 5)));
    }
}
