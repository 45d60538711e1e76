//! # Index Updater Service
//!
//! This crate decides which configured indices are interested in a changed
//! subject and routes the change to the worker servicing each of them.
//!
//! ## Architecture
//!
//! 1. **Eligibility**: pure check of one index against one subject
//! 2. **Dispatcher**: walks the catalog, filters, resolves workers, and
//!    invokes the update or delete operation
//! 3. **Serializer**: optional layer running dispatches for the same subject
//!    one at a time

pub mod dispatcher;
pub mod eligibility;
pub mod errors;
pub mod serializer;

pub use dispatcher::{DispatchReport, DispatcherConfig, FailurePolicy, IndexDispatcher, IndexOutcome};
pub use eligibility::{is_eligible, Eligibility};
pub use errors::DispatchError;
pub use serializer::SubjectSerializer;
