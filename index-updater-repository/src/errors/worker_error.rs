//! Worker error types.
//!
//! Workers report their own failures with these variants; the dispatcher
//! hands them to its caller unchanged.

use thiserror::Error;

/// Errors that can occur while a worker writes to or deletes from an index.
#[derive(Debug, Clone, Error)]
pub enum WorkerError {
    /// The indexing backend could not be reached.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The subject could not be turned into a valid document.
    #[error("Document error: {0}")]
    DocumentError(String),

    /// The backend rejected or failed the operation.
    #[error("Backend error: {0}")]
    BackendError(String),
}

impl WorkerError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a document error.
    pub fn document(msg: impl Into<String>) -> Self {
        Self::DocumentError(msg.into())
    }

    /// Create a backend error.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::BackendError(msg.into())
    }
}
