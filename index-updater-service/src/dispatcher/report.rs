//! Per-dispatch outcome reporting.

use index_updater_shared::Operation;

use crate::errors::DispatchError;

/// Outcome of servicing one eligible index.
#[derive(Debug)]
pub struct IndexOutcome {
    /// Name of the serviced index.
    pub index: String,
    /// Name of the worker the index is configured with.
    pub worker: String,
    /// Whether the worker call succeeded.
    pub result: Result<(), DispatchError>,
}

impl IndexOutcome {
    /// Whether the index was serviced successfully.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Summary of one dispatch pass.
///
/// Under the fail-fast policy a returned report never contains failures;
/// under the isolate policy every eligible index has an outcome, in catalog
/// order.
#[derive(Debug)]
pub struct DispatchReport {
    /// The operation applied.
    pub operation: Operation,
    /// Number of indices in the catalog snapshot.
    pub total: usize,
    /// Number of indices skipped as ineligible.
    pub skipped: usize,
    /// Outcome per eligible index, in catalog order.
    pub outcomes: Vec<IndexOutcome>,
}

impl DispatchReport {
    pub(crate) fn new(operation: Operation, total: usize) -> Self {
        Self {
            operation,
            total,
            skipped: 0,
            outcomes: Vec::new(),
        }
    }

    /// Number of indices serviced successfully.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of eligible indices whose servicing failed.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Whether every eligible index was serviced.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(IndexOutcome::is_success)
    }

    /// Names of the successfully serviced indices, in catalog order.
    pub fn serviced_indices(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.is_success())
            .map(|o| o.index.as_str())
            .collect()
    }

    /// Failed outcomes, in catalog order.
    pub fn failures(&self) -> impl Iterator<Item = &IndexOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }
}
