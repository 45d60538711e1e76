//! Interface definitions for index catalogs and indexing workers.
//!
//! Both traits allow dependency injection of swappable implementations,
//! so the dispatcher can be driven by real backends or by test doubles.

mod index_catalog;
mod index_worker;

pub use index_catalog::IndexCatalog;
pub use index_worker::IndexWorker;
