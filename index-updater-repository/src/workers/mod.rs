//! Built-in index workers.

mod logging;

pub use logging::LoggingWorker;
