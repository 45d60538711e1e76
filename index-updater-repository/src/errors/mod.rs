//! Error types for the index updater repository.

mod catalog_error;
mod registry_error;
mod worker_error;

pub use catalog_error::CatalogError;
pub use registry_error::RegistryError;
pub use worker_error::WorkerError;
