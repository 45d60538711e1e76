//! Index catalog trait definition.

use async_trait::async_trait;

use crate::errors::CatalogError;
use index_updater_shared::Index;

/// Read-only accessor over all configured indices.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the dispatcher reads the catalog
/// concurrently from many tasks and never mutates it.
#[async_trait]
pub trait IndexCatalog: Send + Sync {
    /// Return every configured index.
    ///
    /// The result is a finite snapshot in a stable order. The dispatcher
    /// visits indices in exactly this order.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Index>)` - The configured indices
    /// * `Err(CatalogError)` - If the catalog could not be read
    async fn find_all(&self) -> Result<Vec<Index>, CatalogError>;
}
