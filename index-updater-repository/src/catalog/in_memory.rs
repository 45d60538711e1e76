//! In-memory index catalog.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use crate::errors::CatalogError;
use crate::interfaces::IndexCatalog;
use index_updater_shared::Index;

/// Index catalog held in memory.
///
/// Readers get a cloned snapshot, so a concurrent [`replace`](Self::replace)
/// never changes the set of indices seen by a dispatch already in flight.
#[derive(Debug, Default)]
pub struct InMemoryIndexCatalog {
    indices: RwLock<Vec<Index>>,
}

impl InMemoryIndexCatalog {
    /// Create a catalog holding `indices` in the given order.
    pub fn new(indices: Vec<Index>) -> Self {
        Self {
            indices: RwLock::new(indices),
        }
    }

    /// Replace the whole catalog, e.g. after an administrative edit.
    pub async fn replace(&self, indices: Vec<Index>) {
        let count = indices.len();
        *self.indices.write().await = indices;
        info!(count = count, "Replaced index catalog");
    }
}

#[async_trait]
impl IndexCatalog for InMemoryIndexCatalog {
    async fn find_all(&self) -> Result<Vec<Index>, CatalogError> {
        Ok(self.indices.read().await.clone())
    }
}
