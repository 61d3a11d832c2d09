//! Map document - the saved form of a map and its resources
//!
//! The document is the JSON file the game engine reads. Grid fields are
//! flattened to the top level so the file carries `width`, `height`, `tiles`,
//! `start`, `exit`, `respawn` and `dungeonEntry` directly.

use crate::{TextureCatalog, TileGrid};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current document format version
pub const DOCUMENT_VERSION: u32 = 1;

/// A saved map: grid, markers and texture catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDocument {
    /// Format version
    #[serde(default = "default_version")]
    pub version: u32,
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub grid: TileGrid,
    #[serde(default)]
    pub resources: TextureCatalog,
}

fn default_version() -> u32 {
    DOCUMENT_VERSION
}

impl MapDocument {
    /// Create a new document wrapping a grid
    pub fn new(name: impl Into<String>, grid: TileGrid, resources: TextureCatalog) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            id: Uuid::new_v4(),
            name: name.into(),
            grid,
            resources,
        }
    }

    /// Parse a document from JSON text
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
