//! Loading the document list produced by the preprocessing step.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One source document to push into the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub url: String,

    #[serde(default)]
    pub title: String,

    /// Extracted page text. The index fetches from `url`, so this is only
    /// carried along.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Document {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            content: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum DocumentLoadError {
    #[error("Documents file not found: {}. Run the preprocessing step first to produce it.", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Read a JSON array of `{url, title?, content?}` objects.
pub fn load_documents(path: &Path) -> Result<Vec<Document>, DocumentLoadError> {
    if !path.exists() {
        return Err(DocumentLoadError::NotFound(path.to_path_buf()));
    }

    let raw = std::fs::read_to_string(path).map_err(|source| DocumentLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|source| DocumentLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
