//! Index dispatcher.
//!
//! Routes a changed subject to every eligible index in catalog order and
//! invokes the configured worker's update or delete operation for each.

mod report;

pub use report::{DispatchReport, IndexOutcome};

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, info, instrument, trace, warn};

use crate::eligibility::Eligibility;
use crate::errors::DispatchError;
use index_updater_repository::{IndexCatalog, WorkerRegistry};
use index_updater_shared::{Index, Indexable, Operation, Subject};

/// What the dispatcher does when servicing an eligible index fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Abort the pass on the first failure and return it to the caller.
    #[default]
    FailFast,
    /// Record the failure in the report and continue with the next index.
    Isolate,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail-fast" | "fail_fast" => Ok(Self::FailFast),
            "isolate" => Ok(Self::Isolate),
            other => Err(format!(
                "unknown failure policy '{}', expected 'fail-fast' or 'isolate'",
                other
            )),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FailFast => f.write_str("fail-fast"),
            Self::Isolate => f.write_str("isolate"),
        }
    }
}

/// Configuration for the dispatcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatcherConfig {
    /// Failure handling policy.
    pub policy: FailurePolicy,
}

impl DispatcherConfig {
    /// Abort on the first failure.
    pub fn fail_fast() -> Self {
        Self {
            policy: FailurePolicy::FailFast,
        }
    }

    /// Keep servicing the remaining indices after a failure.
    pub fn isolate() -> Self {
        Self {
            policy: FailurePolicy::Isolate,
        }
    }
}

/// Routes subject changes to the workers of eligible indices.
///
/// The dispatcher holds no state across calls and never mutates the catalog
/// or registry, so one instance can serve any number of concurrent callers.
/// It neither serializes nor deduplicates calls for the same subject; wrap it
/// in a [`SubjectSerializer`](crate::SubjectSerializer) when ordering matters.
pub struct IndexDispatcher {
    catalog: Arc<dyn IndexCatalog>,
    registry: Arc<WorkerRegistry>,
    config: DispatcherConfig,
}

impl IndexDispatcher {
    /// Create a fail-fast dispatcher.
    pub fn new(catalog: Arc<dyn IndexCatalog>, registry: Arc<WorkerRegistry>) -> Self {
        Self::with_config(catalog, registry, DispatcherConfig::default())
    }

    /// Create a dispatcher with custom configuration.
    pub fn with_config(
        catalog: Arc<dyn IndexCatalog>,
        registry: Arc<WorkerRegistry>,
        config: DispatcherConfig,
    ) -> Self {
        Self {
            catalog,
            registry,
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// The worker registry used for resolution.
    pub fn registry(&self) -> &WorkerRegistry {
        &self.registry
    }

    /// Send `subject` to every eligible index as an upsert.
    ///
    /// With `is_version_event` set, indices that do not track version events
    /// are skipped.
    pub async fn update_all(
        &self,
        subject: &dyn Subject,
        is_version_event: bool,
    ) -> Result<DispatchReport, DispatchError> {
        self.route(subject, Operation::Update, is_version_event).await
    }

    /// Remove `subject` from every eligible index.
    ///
    /// A removal is always a committed change.
    pub async fn remove_all(&self, subject: &dyn Subject) -> Result<DispatchReport, DispatchError> {
        self.route(subject, Operation::Remove, false).await
    }

    /// Apply `operation` to `subject`. The version flag only affects updates.
    pub async fn dispatch(
        &self,
        subject: &dyn Subject,
        operation: Operation,
        is_version_event: bool,
    ) -> Result<DispatchReport, DispatchError> {
        match operation {
            Operation::Update => self.update_all(subject, is_version_event).await,
            Operation::Remove => self.remove_all(subject).await,
        }
    }

    #[instrument(
        skip(self, subject),
        fields(subject_id = %subject.subject_id(), policy = %self.config.policy)
    )]
    async fn route(
        &self,
        subject: &dyn Subject,
        operation: Operation,
        is_version_event: bool,
    ) -> Result<DispatchReport, DispatchError> {
        let indices = self.catalog.find_all().await?;
        let mut report = DispatchReport::new(operation, indices.len());

        for index in &indices {
            let eligibility = Eligibility::check(index, subject, is_version_event);
            let Some(indexable) = eligibility.indexable() else {
                trace!(index = %index.name, reason = eligibility.reason(), "Index not eligible");
                report.skipped += 1;
                continue;
            };

            let result = self.service(index, indexable, operation).await;

            if let Err(e) = &result {
                match self.config.policy {
                    FailurePolicy::FailFast => {
                        debug!(index = %index.name, worker = %index.worker, error = %e, "Dispatch aborted");
                        return result.map(|()| report);
                    }
                    FailurePolicy::Isolate => {
                        warn!(index = %index.name, worker = %index.worker, error = %e, "Index update failed, continuing");
                    }
                }
            }

            report.outcomes.push(IndexOutcome {
                index: index.name.clone(),
                worker: index.worker.clone(),
                result,
            });
        }

        info!(
            total = report.total,
            skipped = report.skipped,
            succeeded = report.succeeded(),
            failed = report.failed(),
            "Dispatch completed"
        );

        Ok(report)
    }

    /// Resolve the index's worker and invoke the operation once.
    async fn service(
        &self,
        index: &Index,
        subject: &dyn Indexable,
        operation: Operation,
    ) -> Result<(), DispatchError> {
        if !self.registry.has(&index.worker) {
            return Err(DispatchError::worker_not_found(&index.worker, &index.name));
        }
        let worker = self
            .registry
            .resolve(&index.worker)
            .map_err(|_| DispatchError::worker_not_found(&index.worker, &index.name))?;

        debug!(index = %index.name, worker = %index.worker, "Dispatching to worker");

        match operation {
            Operation::Update => worker.update_index(index, subject).await?,
            Operation::Remove => worker.delete_from_index(index, subject).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use index_updater_repository::{
        CatalogError, InMemoryIndexCatalog, IndexWorker, WorkerError,
    };
    use index_updater_shared::ChangedObject;
    use tokio::sync::Mutex;

    /// A worker call observed by the test log.
    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Call {
        worker: String,
        index: String,
        operation: Operation,
        subject_id: String,
    }

    type CallLog = Arc<Mutex<Vec<Call>>>;

    /// Mock worker recording every call into a log shared across workers.
    struct RecordingWorker {
        name: String,
        log: CallLog,
        failure: Option<WorkerError>,
    }

    impl RecordingWorker {
        fn new(name: &str, log: &CallLog) -> Self {
            Self {
                name: name.to_string(),
                log: log.clone(),
                failure: None,
            }
        }

        fn failing(name: &str, log: &CallLog, failure: WorkerError) -> Self {
            Self {
                failure: Some(failure),
                ..Self::new(name, log)
            }
        }

        async fn record(
            &self,
            index: &Index,
            subject: &dyn Indexable,
            operation: Operation,
        ) -> Result<(), WorkerError> {
            self.log.lock().await.push(Call {
                worker: self.name.clone(),
                index: index.name.clone(),
                operation,
                subject_id: subject.subject_id().to_string(),
            });
            match &self.failure {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl IndexWorker for RecordingWorker {
        async fn update_index(&self, index: &Index, subject: &dyn Indexable) -> Result<(), WorkerError> {
            self.record(index, subject, Operation::Update).await
        }

        async fn delete_from_index(
            &self,
            index: &Index,
            subject: &dyn Indexable,
        ) -> Result<(), WorkerError> {
            self.record(index, subject, Operation::Remove).await
        }
    }

    struct FailingCatalog;

    #[async_trait]
    impl IndexCatalog for FailingCatalog {
        async fn find_all(&self) -> Result<Vec<Index>, CatalogError> {
            Err(CatalogError::unavailable("Mock failure"))
        }
    }

    fn call(worker: &str, index: &str, operation: Operation) -> Call {
        Call {
            worker: worker.to_string(),
            index: index.to_string(),
            operation,
            subject_id: "p-1".to_string(),
        }
    }

    fn registry(log: &CallLog) -> Arc<WorkerRegistry> {
        Arc::new(
            WorkerRegistry::builder()
                .register("es", Arc::new(RecordingWorker::new("es", log)))
                .unwrap()
                .register("sql", Arc::new(RecordingWorker::new("sql", log)))
                .unwrap()
                .build(),
        )
    }

    fn dispatcher(indices: Vec<Index>, log: &CallLog) -> IndexDispatcher {
        IndexDispatcher::new(Arc::new(InMemoryIndexCatalog::new(indices)), registry(log))
    }

    fn isolating_dispatcher(indices: Vec<Index>, log: &CallLog) -> IndexDispatcher {
        IndexDispatcher::with_config(
            Arc::new(InMemoryIndexCatalog::new(indices)),
            registry(log),
            DispatcherConfig::isolate(),
        )
    }

    fn index_a() -> Index {
        Index::new("A", "Product", "es")
    }

    fn index_b() -> Index {
        Index::new("B", "Product", "sql").with_version_events(true)
    }

    fn index_c() -> Index {
        Index::new("C", "Product", "missing")
    }

    fn product() -> ChangedObject {
        ChangedObject::new("p-1", "Product").with_field("name", "Chair")
    }

    #[tokio::test]
    async fn test_committed_update_reaches_matching_index() {
        let log = CallLog::default();
        let dispatcher = dispatcher(vec![index_a()], &log);

        let report = dispatcher.update_all(&product(), false).await.unwrap();

        assert_eq!(*log.lock().await, vec![call("es", "A", Operation::Update)]);
        assert_eq!(report.operation, Operation::Update);
        assert_eq!(report.serviced_indices(), vec!["A"]);
    }

    #[tokio::test]
    async fn test_version_event_suppressed_for_committed_only_index() {
        let log = CallLog::default();
        let dispatcher = dispatcher(vec![index_a()], &log);

        let report = dispatcher.update_all(&product(), true).await.unwrap();

        assert!(log.lock().await.is_empty());
        assert_eq!(report.skipped, 1);
        assert!(report.outcomes.is_empty());
    }

    #[tokio::test]
    async fn test_version_tracking_index_receives_version_event() {
        let log = CallLog::default();
        let dispatcher = dispatcher(vec![index_b()], &log);

        dispatcher.update_all(&product(), true).await.unwrap();

        assert_eq!(*log.lock().await, vec![call("sql", "B", Operation::Update)]);
    }

    #[tokio::test]
    async fn test_version_tracking_index_receives_both_kinds_once() {
        let log = CallLog::default();
        let dispatcher = dispatcher(vec![index_b()], &log);

        dispatcher.update_all(&product(), true).await.unwrap();
        dispatcher.update_all(&product(), false).await.unwrap();

        assert_eq!(
            *log.lock().await,
            vec![
                call("sql", "B", Operation::Update),
                call("sql", "B", Operation::Update),
            ]
        );
    }

    #[tokio::test]
    async fn test_type_mismatch_never_routed() {
        let log = CallLog::default();
        let dispatcher = dispatcher(vec![index_a(), index_b()], &log);
        let customer = ChangedObject::new("c-1", "Customer");

        for is_version_event in [false, true] {
            let report = dispatcher.update_all(&customer, is_version_event).await.unwrap();
            assert_eq!(report.skipped, 2);
        }
        dispatcher.remove_all(&customer).await.unwrap();

        assert!(log.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_non_indexable_subject_routes_nowhere() {
        let log = CallLog::default();
        let dispatcher = dispatcher(vec![index_a(), index_b(), index_c()], &log);
        let subject = ChangedObject::opaque("p-1");

        for is_version_event in [false, true] {
            dispatcher.update_all(&subject, is_version_event).await.unwrap();
        }
        let report = dispatcher.remove_all(&subject).await.unwrap();

        assert!(log.lock().await.is_empty());
        assert_eq!(report.total, 3);
        assert_eq!(report.skipped, 3);
    }

    #[tokio::test]
    async fn test_missing_worker_aborts_pass() {
        let log = CallLog::default();
        let dispatcher = dispatcher(vec![index_a(), index_c(), index_b()], &log);

        let err = dispatcher.update_all(&product(), false).await.unwrap_err();

        assert!(matches!(
            &err,
            DispatchError::WorkerNotFound { worker, index } if worker == "missing" && index == "C"
        ));
        assert_eq!(err.to_string(), "missing Worker not found (index C)");
        // A was serviced before C; B comes after C and must not be.
        assert_eq!(*log.lock().await, vec![call("es", "A", Operation::Update)]);
    }

    #[tokio::test]
    async fn test_missing_worker_on_ineligible_index_is_ignored() {
        let log = CallLog::default();
        let dispatcher = dispatcher(
            vec![Index::new("C", "Customer", "missing"), index_a()],
            &log,
        );

        dispatcher.update_all(&product(), false).await.unwrap();

        assert_eq!(*log.lock().await, vec![call("es", "A", Operation::Update)]);
    }

    #[tokio::test]
    async fn test_remove_ignores_version_flag() {
        let log = CallLog::default();
        let dispatcher = dispatcher(vec![index_a(), index_b()], &log);

        let report = dispatcher.remove_all(&product()).await.unwrap();

        assert_eq!(
            *log.lock().await,
            vec![
                call("es", "A", Operation::Remove),
                call("sql", "B", Operation::Remove),
            ]
        );
        assert_eq!(report.operation, Operation::Remove);

        // The version flag passed through `dispatch` has no effect on removals.
        log.lock().await.clear();
        dispatcher.dispatch(&product(), Operation::Remove, true).await.unwrap();
        assert_eq!(log.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn test_catalog_order_preserved() {
        let log = CallLog::default();
        let indices = vec![
            Index::new("z", "Product", "sql"),
            Index::new("a", "Product", "es"),
            Index::new("m", "Product", "sql"),
        ];
        let dispatcher = dispatcher(indices, &log);

        let report = dispatcher.update_all(&product(), false).await.unwrap();

        let visited: Vec<String> = log.lock().await.iter().map(|c| c.index.clone()).collect();
        assert_eq!(visited, vec!["z", "a", "m"]);
        assert_eq!(report.serviced_indices(), vec!["z", "a", "m"]);
    }

    #[tokio::test]
    async fn test_routing_is_idempotent() {
        let log = CallLog::default();
        let dispatcher = dispatcher(
            vec![index_a(), index_b(), Index::new("customers", "Customer", "es")],
            &log,
        );

        dispatcher.update_all(&product(), false).await.unwrap();
        let first: Vec<Call> = log.lock().await.drain(..).collect();
        dispatcher.update_all(&product(), false).await.unwrap();
        let second: Vec<Call> = log.lock().await.drain(..).collect();

        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[tokio::test]
    async fn test_worker_failure_propagates_unchanged() {
        let log = CallLog::default();
        let registry = Arc::new(
            WorkerRegistry::builder()
                .register(
                    "es",
                    Arc::new(RecordingWorker::failing(
                        "es",
                        &log,
                        WorkerError::backend("mapping rejected"),
                    )),
                )
                .unwrap()
                .register("sql", Arc::new(RecordingWorker::new("sql", &log)))
                .unwrap()
                .build(),
        );
        let catalog = Arc::new(InMemoryIndexCatalog::new(vec![index_a(), index_b()]));
        let dispatcher = IndexDispatcher::new(catalog, registry);

        let err = dispatcher.update_all(&product(), false).await.unwrap_err();

        assert!(matches!(
            &err,
            DispatchError::Worker(WorkerError::BackendError(msg)) if msg == "mapping rejected"
        ));
        assert_eq!(err.to_string(), "Backend error: mapping rejected");
        assert_eq!(log.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_isolate_policy_continues_after_failure() {
        let log = CallLog::default();
        let dispatcher = isolating_dispatcher(vec![index_a(), index_c(), index_b()], &log);

        let report = dispatcher.update_all(&product(), false).await.unwrap();

        assert_eq!(
            *log.lock().await,
            vec![
                call("es", "A", Operation::Update),
                call("sql", "B", Operation::Update),
            ]
        );
        assert!(!report.is_success());
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.serviced_indices(), vec!["A", "B"]);

        let failures: Vec<&IndexOutcome> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].index, "C");
        assert_eq!(failures[0].worker, "missing");
        assert!(matches!(
            failures[0].result,
            Err(DispatchError::WorkerNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_isolate_policy_records_worker_failures() {
        let log = CallLog::default();
        let registry = Arc::new(
            WorkerRegistry::builder()
                .register(
                    "es",
                    Arc::new(RecordingWorker::failing(
                        "es",
                        &log,
                        WorkerError::connection("cluster unreachable"),
                    )),
                )
                .unwrap()
                .register(
                    "sql",
                    Arc::new(RecordingWorker::failing(
                        "sql",
                        &log,
                        WorkerError::document("missing primary key"),
                    )),
                )
                .unwrap()
                .build(),
        );
        let dispatcher = IndexDispatcher::with_config(
            Arc::new(InMemoryIndexCatalog::new(vec![index_a(), index_b()])),
            registry,
            DispatcherConfig::isolate(),
        );

        let report = dispatcher.update_all(&product(), false).await.unwrap();

        assert_eq!(log.lock().await.len(), 2);
        assert_eq!(report.succeeded(), 0);
        assert_eq!(report.failed(), 2);

        let errors: Vec<String> = report
            .failures()
            .map(|outcome| outcome.result.as_ref().unwrap_err().to_string())
            .collect();
        assert_eq!(
            errors,
            vec![
                "Connection error: cluster unreachable",
                "Document error: missing primary key",
            ]
        );
    }

    #[tokio::test]
    async fn test_catalog_failure_is_fatal() {
        let log = CallLog::default();

        for config in [DispatcherConfig::fail_fast(), DispatcherConfig::isolate()] {
            let dispatcher =
                IndexDispatcher::with_config(Arc::new(FailingCatalog), registry(&log), config);

            let err = dispatcher.update_all(&product(), false).await.unwrap_err();
            assert!(matches!(err, DispatchError::Catalog(CatalogError::Unavailable(_))));
        }
        assert!(log.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_catalog() {
        let log = CallLog::default();
        let dispatcher = dispatcher(vec![], &log);

        let report = dispatcher.update_all(&product(), false).await.unwrap();

        assert_eq!(report.total, 0);
        assert!(report.is_success());
        assert!(log.lock().await.is_empty());
    }

    #[test]
    fn test_failure_policy_parsing() {
        assert_eq!("fail-fast".parse::<FailurePolicy>().unwrap(), FailurePolicy::FailFast);
        assert_eq!("FAIL_FAST".parse::<FailurePolicy>().unwrap(), FailurePolicy::FailFast);
        assert_eq!(" isolate ".parse::<FailurePolicy>().unwrap(), FailurePolicy::Isolate);
        assert!("skip".parse::<FailurePolicy>().is_err());
        assert_eq!(FailurePolicy::default(), FailurePolicy::FailFast);
        assert_eq!(FailurePolicy::Isolate.to_string(), "isolate");
    }
}
