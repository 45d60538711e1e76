//! Per-subject serialization of dispatches.
//!
//! The dispatcher gives no ordering guarantee between overlapping calls for
//! the same subject. `SubjectSerializer` holds one async lock per subject
//! identity for the duration of a dispatch, so a rapid double save reaches
//! the workers as two ordered passes. Dispatches for different subjects
//! still run in parallel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};

use tokio::sync::Mutex;
use tracing::trace;

use crate::dispatcher::{DispatchReport, IndexDispatcher};
use crate::errors::DispatchError;
use index_updater_shared::{Operation, Subject};

type SubjectLocks = HashMap<String, Arc<Mutex<()>>>;

/// Wraps an [`IndexDispatcher`], running dispatches for the same subject
/// one at a time.
pub struct SubjectSerializer {
    dispatcher: IndexDispatcher,
    locks: StdMutex<SubjectLocks>,
}

impl SubjectSerializer {
    /// Wrap `dispatcher`.
    pub fn new(dispatcher: IndexDispatcher) -> Self {
        Self {
            dispatcher,
            locks: StdMutex::new(HashMap::new()),
        }
    }

    /// The wrapped dispatcher.
    pub fn dispatcher(&self) -> &IndexDispatcher {
        &self.dispatcher
    }

    /// Serialized [`IndexDispatcher::update_all`].
    pub async fn update_all(
        &self,
        subject: &dyn Subject,
        is_version_event: bool,
    ) -> Result<DispatchReport, DispatchError> {
        self.dispatch(subject, Operation::Update, is_version_event)
            .await
    }

    /// Serialized [`IndexDispatcher::remove_all`].
    pub async fn remove_all(&self, subject: &dyn Subject) -> Result<DispatchReport, DispatchError> {
        self.dispatch(subject, Operation::Remove, false).await
    }

    /// Serialized [`IndexDispatcher::dispatch`].
    pub async fn dispatch(
        &self,
        subject: &dyn Subject,
        operation: Operation,
        is_version_event: bool,
    ) -> Result<DispatchReport, DispatchError> {
        let lease = self.lease(subject.subject_id());
        let _guard = lease.lock.lock().await;

        self.dispatcher
            .dispatch(subject, operation, is_version_event)
            .await
    }

    /// Number of subjects with a dispatch running or waiting.
    pub fn active_subjects(&self) -> usize {
        self.locks().len()
    }

    fn lease(&self, subject_id: &str) -> SubjectLease<'_> {
        let lock = self
            .locks()
            .entry(subject_id.to_string())
            .or_default()
            .clone();

        SubjectLease {
            serializer: self,
            subject_id: subject_id.to_string(),
            lock,
        }
    }

    fn locks(&self) -> MutexGuard<'_, SubjectLocks> {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Holds a subject's lock entry alive; evicts it on drop when unused.
struct SubjectLease<'a> {
    serializer: &'a SubjectSerializer,
    subject_id: String,
    lock: Arc<Mutex<()>>,
}

impl Drop for SubjectLease<'_> {
    fn drop(&mut self) {
        let mut locks = self.serializer.locks();
        // One reference in the map, one here: nobody else is waiting.
        if Arc::strong_count(&self.lock) == 2 {
            locks.remove(&self.subject_id);
            trace!(subject_id = %self.subject_id, "Released subject lock");
        }
    }
}
