//! Preferences file save/load operations

use super::EditorPreferences;
use bevy::prelude::Resource;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

const PREFERENCES_FILE: &str = "preferences.json";

#[derive(Debug)]
pub enum PreferencesError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    NoConfigDir,
}

impl std::fmt::Display for PreferencesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreferencesError::IoError(e) => write!(f, "IO error: {}", e),
            PreferencesError::ParseError(e) => write!(f, "Parse error: {}", e),
            PreferencesError::SerializeError(e) => write!(f, "Serialize error: {}", e),
            PreferencesError::NoConfigDir => write!(f, "Could not determine config directory"),
        }
    }
}

impl std::error::Error for PreferencesError {}

impl EditorPreferences {
    /// Get the config directory path for the editor
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "dungeon_map_editor", "dungeon_map_editor")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the preferences file path
    pub fn preferences_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join(PREFERENCES_FILE))
    }


    /// Load preferences from a file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, PreferencesError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content =
            std::fs::read_to_string(path).map_err(|e| PreferencesError::IoError(e.to_string()))?;

        serde_json::from_str(&content).map_err(|e| PreferencesError::ParseError(e.to_string()))
    }

    /// Save preferences to a file, creating its directory if needed
    pub fn save_to(&self, path: &Path) -> Result<(), PreferencesError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| PreferencesError::IoError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| PreferencesError::SerializeError(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| PreferencesError::IoError(e.to_string()))?;

        bevy::log::info!("Saved preferences to {:?}", path);
        Ok(())
    }
}

/// Where preferences are read from and written to
#[derive(Debug, Clone, PartialEq, Eq, Resource)]
pub struct PreferencesStore {
    /// `None` when the platform has no config directory
    pub path: Option<PathBuf>,
}

impl Default for PreferencesStore {
    fn default() -> Self {
        Self {
            path: EditorPreferences::preferences_path(),
        }
    }
}

impl PreferencesStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Load preferences, returning defaults on any failure
    pub fn load(&self) -> EditorPreferences {
        let loaded = self
            .path
            .as_deref()
            .ok_or(PreferencesError::NoConfigDir)
            .and_then(EditorPreferences::load_from);

        match loaded {
            Ok(prefs) => prefs,
            Err(e) => {
                bevy::log::warn!("Could not load preferences: {}. Using defaults.", e);
                EditorPreferences::default()
            }
        }
    }

    pub fn save(&self, preferences: &EditorPreferences) -> Result<(), PreferencesError> {
        let path = self.path.as_deref().ok_or(PreferencesError::NoConfigDir)?;
        preferences.save_to(path)
    }
}
