//! Project management for the map editor
//!
//! A project is one map document on disk plus the editor's bookkeeping about
//! it: where it lives, whether it has unsaved changes.

mod file;

pub use file::*;

use std::path::PathBuf;
use uuid::Uuid;

/// Default name for maps that have never been saved
pub const UNTITLED: &str = "Untitled";

/// The map currently open in the editor
#[derive(Debug, Clone)]
pub struct Project {
    pub path: Option<PathBuf>,
    pub name: String,
    /// Document id, kept stable across saves
    pub id: Uuid,
    dirty: bool,
}

impl Default for Project {
    fn default() -> Self {
        Self::new(UNTITLED)
    }
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            path: None,
            name: name.into(),
            id: Uuid::new_v4(),
            dirty: false,
        }
    }

    /// Mark project as modified
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Check if project has unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Name shown in the title bar: file stem if saved, otherwise the map name
    pub fn display_name(&self) -> String {
        self.path
            .as_ref()
            .and_then(|p| p.file_stem())
            .and_then(|s| s.to_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| self.name.clone())
    }
}
