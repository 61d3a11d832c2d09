//! User preferences persisted between editor sessions

mod file;

pub use file::*;

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Editor preferences stored in the platform config directory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Resource)]
#[serde(rename_all = "camelCase")]
pub struct EditorPreferences {
    /// Map reopened at startup
    #[serde(default)]
    pub last_opened_file: Option<PathBuf>,
}

impl EditorPreferences {
    pub fn set_last_opened_file(&mut self, path: &Path) {
        self.last_opened_file = Some(path.to_path_buf());
    }

    pub fn clear_last_opened_file(&mut self) {
        self.last_opened_file = None;
    }
}
