//! Worker registry error types.

use thiserror::Error;

/// Errors raised by the worker registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No worker is registered under the requested name.
    #[error("{0} Worker not found")]
    WorkerNotFound(String),

    /// A worker was registered twice under the same name.
    #[error("Worker {0} is already registered")]
    DuplicateWorker(String),
}
