//! Texture resource catalog interface
//!
//! Texture loading and GPU binding live outside the editor core. The core only
//! needs to know whether a texture name exists and, for renderers, which region
//! of which image it maps to.

use crate::Position;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where a named texture lives inside a loaded image
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextureRegion {
    /// Opaque handle of the source image, assigned by the asset loader
    pub image: u32,
    /// `[x, y, width, height]` in image pixels
    pub rect: [f32; 4],
}

/// Lookup of textures by name
pub trait ResourceCatalog {
    fn texture_exists(&self, name: &str) -> bool;

    fn texture_region(&self, name: &str) -> Option<TextureRegion>;
}

/// A tile frame that references a texture the catalog does not know
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MissingResource {
    pub position: Position,
    pub texture_name: String,
}

/// In-memory catalog saved alongside the map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextureCatalog {
    #[serde(default)]
    textures: BTreeMap<String, TextureRegion>,
}

impl TextureCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a texture. Returns the previous region if any.
    pub fn insert(&mut self, name: impl Into<String>, region: TextureRegion) -> Option<TextureRegion> {
        self.textures.insert(name.into(), region)
    }

    pub fn remove(&mut self, name: &str) -> Option<TextureRegion> {
        self.textures.remove(name)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Texture names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.textures.keys().map(String::as_str)
    }
}

impl ResourceCatalog for TextureCatalog {
    fn texture_exists(&self, name: &str) -> bool {
        self.textures.contains_key(name)
    }

    fn texture_region(&self, name: &str) -> Option<TextureRegion> {
        self.textures.get(name).copied()
    }
}
