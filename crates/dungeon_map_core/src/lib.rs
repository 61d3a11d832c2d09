//! Core data structures for the dungeon map editor
//!
//! This crate provides the data types the editor mutates and the game reads:
//! - `TileGrid` - Dense tile array plus start/exit/respawn/dungeon-entry markers
//! - `Tile` - One cell with a type and ordered texture layers
//! - `TextureLayer` / `Frame` - Static or animated texture content of a layer
//! - `ResourceCatalog` - Texture existence lookup used for validation
//! - `MapDocument` - The saved JSON form of a map

mod document;
mod grid;
mod layer;
mod position;
mod resource;
mod tile;

pub use document::{MapDocument, DOCUMENT_VERSION};
pub use grid::{GridError, MarkerKind, TileGrid, DEFAULT_MAX_LAYERS, MAX_DIMENSION};
pub use layer::{Frame, TextureLayer, DEFAULT_FRAME_TIME};
pub use position::Position;
pub use resource::{MissingResource, ResourceCatalog, TextureCatalog, TextureRegion};
pub use tile::{Tile, TileType};
