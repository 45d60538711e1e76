//! Error types for index dispatch.

use index_updater_repository::{CatalogError, WorkerError};
use thiserror::Error;

/// Errors that can occur while dispatching a change to the indices.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// An eligible index names a worker that is not registered.
    #[error("{worker} Worker not found (index {index})")]
    WorkerNotFound {
        /// The unregistered worker name.
        worker: String,
        /// Name of the index referencing it.
        index: String,
    },

    /// A worker failed to update or delete; passed through unchanged.
    #[error(transparent)]
    Worker(#[from] WorkerError),

    /// The index catalog could not be read.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl DispatchError {
    /// Create a worker not found error.
    pub fn worker_not_found(worker: impl Into<String>, index: impl Into<String>) -> Self {
        Self::WorkerNotFound {
            worker: worker.into(),
            index: index.into(),
        }
    }
}
