//! Index catalog backed by a JSON file.
//!
//! The file holds a JSON array of index configurations:
//!
//! ```json
//! [
//!   {"name": "products", "target_type": "Product", "worker": "es"},
//!   {"name": "products_preview", "target_type": "Product", "worker": "sql",
//!    "tracks_version_events": true}
//! ]
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::errors::CatalogError;
use crate::interfaces::IndexCatalog;
use index_updater_shared::Index;

/// Catalog that re-reads its JSON file on every `find_all`.
///
/// Each read returns the file's current contents, so administrative edits
/// take effect on the next dispatch without a restart.
#[derive(Debug, Clone)]
pub struct JsonFileIndexCatalog {
    path: PathBuf,
}

impl JsonFileIndexCatalog {
    /// Create a catalog reading from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl IndexCatalog for JsonFileIndexCatalog {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn find_all(&self) -> Result<Vec<Index>, CatalogError> {
        let raw = tokio::fs::read(&self.path)
            .await
            .map_err(|e| CatalogError::read(format!("{}: {}", self.path.display(), e)))?;

        let indices: Vec<Index> = serde_json::from_slice(&raw)
            .map_err(|e| CatalogError::parse(format!("{}: {}", self.path.display(), e)))?;

        debug!(count = indices.len(), "Loaded index catalog");
        Ok(indices)
    }
}
