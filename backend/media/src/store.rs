//! Local image store: uploaded card photos and generated illustrations
//! live as flat files in one directory.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use cardforge_core::CardError;

/// Flat-directory image store.
#[derive(Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    /// Create the store, making the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, CardError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| CardError::Storage(e.to_string()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    /// Persist image bytes under the given filename, returning the
    /// filename as stored.
    pub async fn save(&self, filename: &str, bytes: &[u8]) -> Result<String, CardError> {
        let path = self.path_for(filename);
        fs::write(&path, bytes)
            .await
            .map_err(|e| CardError::Storage(e.to_string()))?;
        debug!(path = %path.display(), bytes = bytes.len(), "Saved image");
        Ok(filename.to_string())
    }
}
