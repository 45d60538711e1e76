//! Newline-delimited JSON change feed.
//!
//! Each line holds one [`ChangeEvent`]. Events are dispatched one after the
//! other through the shared [`SubjectSerializer`]. Dispatch failures and
//! malformed lines are logged and the feed moves on; the surrounding system
//! decides whether to replay a failed subject.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::broadcast;
use tracing::{debug, error, info, instrument, warn};

use crate::IndexerError;
use index_updater_service::SubjectSerializer;
use index_updater_shared::{ChangeEvent, Operation};

/// Counters collected while running the feed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FeedSummary {
    /// Non-blank lines read.
    pub events: usize,
    /// Events whose dispatch completed.
    pub dispatched: usize,
    /// Events whose dispatch failed.
    pub failed: usize,
    /// Lines that were not valid change events.
    pub malformed: usize,
}

/// Reads change events and hands them to the dispatcher.
pub struct ChangeFeed {
    serializer: Arc<SubjectSerializer>,
    shutdown_tx: broadcast::Sender<()>,
}

impl ChangeFeed {
    /// Create a feed dispatching through `serializer`.
    pub fn new(serializer: Arc<SubjectSerializer>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            serializer,
            shutdown_tx,
        }
    }

    /// Run until `reader` is exhausted or a shutdown is triggered.
    #[instrument(skip(self, reader))]
    pub async fn run<R>(&self, mut reader: R) -> Result<FeedSummary, IndexerError>
    where
        R: AsyncBufRead + Unpin,
    {
        info!("Starting change feed");

        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let mut summary = FeedSummary::default();
        let mut line = Vec::new();

        loop {
            tokio::select! {
                read = reader.read_until(b'\n', &mut line) => {
                    if read? == 0 {
                        info!("Change feed ended");
                        break;
                    }
                    self.process_line(&line, &mut summary).await;
                    line.clear();
                }
                _ = shutdown_rx.recv() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        info!(
            events = summary.events,
            dispatched = summary.dispatched,
            failed = summary.failed,
            malformed = summary.malformed,
            "Change feed shutdown complete"
        );
        Ok(summary)
    }

    /// Trigger a graceful shutdown.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    async fn process_line(&self, raw: &[u8], summary: &mut FeedSummary) {
        let line = match std::str::from_utf8(raw) {
            Ok(line) => line.trim(),
            Err(e) => {
                summary.events += 1;
                warn!(error = %e, "Skipping change event that is not valid UTF-8");
                summary.malformed += 1;
                return;
            }
        };
        if line.is_empty() {
            return;
        }
        summary.events += 1;

        let event: ChangeEvent = match serde_json::from_str(line) {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "Skipping malformed change event");
                summary.malformed += 1;
                return;
            }
        };

        if event.operation == Operation::Remove && event.version_event {
            debug!(subject_id = %event.subject.id, "Ignoring version flag on removal");
        }

        match self
            .serializer
            .dispatch(&event.subject, event.operation, event.version_event)
            .await
        {
            Ok(report) if report.is_success() => summary.dispatched += 1,
            Ok(report) => {
                for outcome in report.failures() {
                    if let Err(e) = &outcome.result {
                        error!(
                            subject_id = %event.subject.id,
                            index = %outcome.index,
                            worker = %outcome.worker,
                            error = %e,
                            "Index update failed"
                        );
                    }
                }
                summary.failed += 1;
            }
            Err(e) => {
                error!(
                    subject_id = %event.subject.id,
                    operation = %event.operation,
                    error = %e,
                    "Failed to dispatch change event"
                );
                summary.failed += 1;
            }
        }
    }
}
