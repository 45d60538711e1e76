//! Indexing worker trait definition.
//!
//! A worker knows how to write and delete documents in one specific
//! indexing technology (a full-text engine, a relational shadow table, ...).

use async_trait::async_trait;

use crate::errors::WorkerError;
use index_updater_shared::{Index, Indexable};

/// Pluggable indexing backend, registered by name in the `WorkerRegistry`.
///
/// The dispatcher does not serialize calls for the same subject, so two
/// overlapping dispatches may reach a worker in either order. Implementations
/// should make `update_index` an idempotent upsert.
#[async_trait]
pub trait IndexWorker: Send + Sync {
    /// Insert or refresh the subject's document in the given index.
    ///
    /// # Arguments
    ///
    /// * `index` - The index configuration being serviced
    /// * `subject` - The changed subject
    async fn update_index(&self, index: &Index, subject: &dyn Indexable) -> Result<(), WorkerError>;

    /// Remove the subject's document from the given index.
    ///
    /// Deleting a document that does not exist should succeed.
    async fn delete_from_index(
        &self,
        index: &Index,
        subject: &dyn Indexable,
    ) -> Result<(), WorkerError>;
}
