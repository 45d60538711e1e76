//! # Index Updater Repository
//!
//! This crate provides the seams the index dispatcher consumes: the
//! `IndexCatalog` and `IndexWorker` traits, the name-keyed
//! `WorkerRegistry`, and concrete catalog and worker adapters.

pub mod catalog;
pub mod errors;
pub mod interfaces;
pub mod registry;
pub mod workers;

pub use catalog::{InMemoryIndexCatalog, JsonFileIndexCatalog};
pub use errors::{CatalogError, RegistryError, WorkerError};
pub use interfaces::{IndexCatalog, IndexWorker};
pub use registry::{WorkerRegistry, WorkerRegistryBuilder};
pub use workers::LoggingWorker;
