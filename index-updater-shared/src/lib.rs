//! # Index Updater Shared
//!
//! Data model shared by every index updater crate: index configurations,
//! the dispatch operation, and the capabilities a changed domain object
//! exposes to the dispatcher and to workers.

mod event;
mod index;
mod subject;

pub use event::ChangeEvent;
pub use index::{Index, Operation};
pub use subject::{ChangedObject, Indexable, Subject};
