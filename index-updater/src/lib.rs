//! # Index Updater
//!
//! Wiring layer and change feed for the index updater. Builds the catalog,
//! worker registry and dispatcher from the environment, then feeds change
//! events through the dispatcher.

pub mod config;
pub mod feed;

pub use config::{AppConfig, Dependencies, LogFormat};
pub use feed::{ChangeFeed, FeedSummary};

use thiserror::Error;

/// Errors that can occur during updater initialization or execution.
#[derive(Error, Debug)]
pub enum IndexerError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Catalog error.
    #[error("Catalog error: {0}")]
    CatalogError(#[from] index_updater_repository::CatalogError),

    /// Worker registry error.
    #[error("Registry error: {0}")]
    RegistryError(#[from] index_updater_repository::RegistryError),

    /// Dispatch error.
    #[error("Dispatch error: {0}")]
    DispatchError(#[from] index_updater_service::DispatchError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl IndexerError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use index_updater_service::DispatchError;

    #[test]
    fn test_dispatch_error_conversion() {
        let err: IndexerError = DispatchError::worker_not_found("es", "products").into();

        assert!(matches!(
            &err,
            IndexerError::DispatchError(DispatchError::WorkerNotFound { worker, .. }) if worker == "es"
        ));
        assert_eq!(
            err.to_string(),
            "Dispatch error: es Worker not found (index products)"
        );
    }
}
