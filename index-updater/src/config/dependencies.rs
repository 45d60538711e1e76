//! Dependency initialization and wiring for the index updater.

use std::sync::Arc;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::feed::ChangeFeed;
use crate::IndexerError;
use index_updater_repository::{
    IndexCatalog, JsonFileIndexCatalog, LoggingWorker, WorkerRegistry,
};
use index_updater_service::{DispatcherConfig, IndexDispatcher, SubjectSerializer};

/// Name the built-in logging worker is registered under.
pub const LOGGING_WORKER: &str = "log";

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// Serialized dispatcher shared by every change source.
    pub serializer: Arc<SubjectSerializer>,
    /// The change feed ready to run.
    pub feed: ChangeFeed,
}

impl Dependencies {
    /// Initialize all dependencies with the built-in workers.
    pub async fn new(config: &AppConfig) -> Result<Self, IndexerError> {
        let registry = WorkerRegistry::builder()
            .register(LOGGING_WORKER, Arc::new(LoggingWorker::new()))?
            .build();

        Self::with_registry(config, registry).await
    }

    /// Initialize all dependencies with a caller-supplied worker registry.
    ///
    /// The catalog is read once up front so a broken catalog fails startup,
    /// and every index naming an unregistered worker is reported.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexerError)` - If the catalog cannot be read
    pub async fn with_registry(
        config: &AppConfig,
        registry: WorkerRegistry,
    ) -> Result<Self, IndexerError> {
        info!(
            catalog_path = %config.catalog_path.display(),
            failure_policy = %config.failure_policy,
            workers = ?registry.names(),
            "Initializing dependencies"
        );

        let catalog = JsonFileIndexCatalog::new(&config.catalog_path);
        let indices = catalog.find_all().await?;

        let mut unresolved = 0;
        for index in &indices {
            if !registry.has(&index.worker) {
                warn!(
                    index = %index.name,
                    worker = %index.worker,
                    "Index references an unregistered worker"
                );
                unresolved += 1;
            }
        }

        info!(
            indices = indices.len(),
            unresolved = unresolved,
            "Index catalog verified"
        );

        let dispatcher = IndexDispatcher::with_config(
            Arc::new(catalog),
            Arc::new(registry),
            DispatcherConfig {
                policy: config.failure_policy,
            },
        );
        let serializer = Arc::new(SubjectSerializer::new(dispatcher));
        let feed = ChangeFeed::new(serializer.clone());

        Ok(Self { serializer, feed })
    }
}
