//! Dry-run worker that logs instead of writing to a backend.

use async_trait::async_trait;
use tracing::info;

use crate::errors::WorkerError;
use crate::interfaces::IndexWorker;
use index_updater_shared::{Index, Indexable, Subject};

/// Worker that emits one structured log event per operation.
///
/// Useful for validating an index configuration against a live change feed
/// before a real backend is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingWorker;

impl LoggingWorker {
    /// Create a new logging worker.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl IndexWorker for LoggingWorker {
    async fn update_index(&self, index: &Index, subject: &dyn Indexable) -> Result<(), WorkerError> {
        info!(
            index = %index.name,
            subject_type = %subject.type_identifier(),
            subject_id = %subject.subject_id(),
            document = %subject.document(),
            "Index update"
        );
        Ok(())
    }

    async fn delete_from_index(
        &self,
        index: &Index,
        subject: &dyn Indexable,
    ) -> Result<(), WorkerError> {
        info!(
            index = %index.name,
            subject_type = %subject.type_identifier(),
            subject_id = %subject.subject_id(),
            "Index delete"
        );
        Ok(())
    }
}
