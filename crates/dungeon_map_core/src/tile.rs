//! Tile cells of the map grid

use crate::{Position, TextureLayer};
use serde::{Deserialize, Serialize};

/// Gameplay type of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileType {
    Wall,
    #[default]
    Floor,
    Chest,
    Door,
}

impl TileType {
    /// Get display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            TileType::Wall => "Wall",
            TileType::Floor => "Floor",
            TileType::Chest => "Chest",
            TileType::Door => "Door",
        }
    }

    /// Returns all tile types for UI enumeration
    pub fn all() -> &'static [TileType] {
        &[TileType::Wall, TileType::Floor, TileType::Chest, TileType::Door]
    }
}

/// One cell of the map
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    #[serde(rename = "type")]
    pub tile_type: TileType,
    pub position: Position,
    #[serde(default)]
    pub texture_layers: Vec<TextureLayer>,
}

impl Tile {
    /// A floor tile with no texture layers
    pub fn new(position: Position) -> Self {
        Self {
            tile_type: TileType::Floor,
            position,
            texture_layers: Vec::new(),
        }
    }

    pub fn with_type(mut self, tile_type: TileType) -> Self {
        self.tile_type = tile_type;
        self
    }

    /// Place `layer` at `index`, padding any gap with empty layers
    pub fn with_layer(mut self, index: usize, layer: TextureLayer) -> Self {
        self.set_layer(index, layer);
        self
    }

    /// Get layer by index
    pub fn layer(&self, index: usize) -> Option<&TextureLayer> {
        self.texture_layers.get(index)
    }

    /// Replace the layer at `index`, padding with empty layers as needed
    pub fn set_layer(&mut self, index: usize, layer: TextureLayer) {
        if self.texture_layers.len() <= index {
            self.texture_layers.resize_with(index + 1, TextureLayer::empty);
        }
        self.texture_layers[index] = layer;
    }

    /// Index of the highest layer that has at least one frame
    pub fn topmost_filled_layer(&self) -> Option<usize> {
        self.texture_layers.iter().rposition(|l| !l.is_empty())
    }

    /// Whether the tile has no visible texture content
    pub fn is_bare(&self) -> bool {
        self.texture_layers.iter().all(|l| l.is_empty())
    }

    /// Structural equality of type and authored texture content.
    ///
    /// Position is ignored so tiles at different cells can match.
    pub fn pattern_eq(&self, other: &Tile) -> bool {
        self.tile_type == other.tile_type
            && self.texture_layers.len() == other.texture_layers.len()
            && self
                .texture_layers
                .iter()
                .zip(&other.texture_layers)
                .all(|(a, b)| a.pattern_eq(b))
    }
}
