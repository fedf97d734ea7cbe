use crate::error::{OptimizeError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// One remote image and the largest size it is displayed at.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageDescriptor {
    pub path: String,
    pub width: u32,
    pub height: u32,
}

impl ImageDescriptor {
    pub fn new(path: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            width,
            height,
        }
    }

    /// Final path segment, used for progress output.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Reads the JSON manifest: an array of `{path, width, height}` records.
pub fn load_descriptors(path: &Path) -> Result<Vec<ImageDescriptor>> {
    let contents = fs::read_to_string(path).map_err(|source| OptimizeError::ManifestRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_descriptors(&contents).map_err(|source| OptimizeError::ManifestParse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse_descriptors(json: &str) -> serde_json::Result<Vec<ImageDescriptor>> {
    serde_json::from_str(json)
}
