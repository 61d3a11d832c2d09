//! Map file save/load operations

use super::Project;
use dungeon_map_core::MapDocument;
use std::path::Path;

#[derive(Debug)]
pub enum ProjectError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    NoPath,
}

impl std::fmt::Display for ProjectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectError::IoError(e) => write!(f, "IO error: {}", e),
            ProjectError::ParseError(e) => write!(f, "Parse error: {}", e),
            ProjectError::SerializeError(e) => write!(f, "Serialize error: {}", e),
            ProjectError::NoPath => write!(f, "No file path set"),
        }
    }
}

impl std::error::Error for ProjectError {}

impl Project {
    /// Load a map document from file.
    ///
    /// The document's grid is validated while parsing: a tile array that does
    /// not match the stated dimensions is a parse error.
    pub fn load(path: &Path) -> Result<(Self, MapDocument), ProjectError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ProjectError::IoError(e.to_string()))?;

        let document =
            MapDocument::from_json(&content).map_err(|e| ProjectError::ParseError(e.to_string()))?;

        let project = Project {
            path: Some(path.to_path_buf()),
            name: document.name.clone(),
            id: document.id,
            dirty: false,
        };

        Ok((project, document))
    }

    /// Save a document to file and make `path` the current path
    pub fn save(&mut self, document: &MapDocument, path: &Path) -> Result<(), ProjectError> {
        let content = document
            .to_json()
            .map_err(|e| ProjectError::SerializeError(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ProjectError::IoError(e.to_string()))?;

        self.path = Some(path.to_path_buf());
        self.dirty = false;

        Ok(())
    }

    /// Save to current path if set
    pub fn save_current(&mut self, document: &MapDocument) -> Result<(), ProjectError> {
        if let Some(path) = self.path.clone() {
            self.save(document, &path)
        } else {
            Err(ProjectError::NoPath)
        }
    }
}
