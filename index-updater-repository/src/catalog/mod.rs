//! Index catalog adapters.

mod in_memory;
mod json_file;

pub use in_memory::InMemoryIndexCatalog;
pub use json_file::JsonFileIndexCatalog;
