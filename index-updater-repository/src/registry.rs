//! Name-keyed worker registry.
//!
//! Workers are registered once while the service is wired together. The
//! built registry is immutable, so it can be shared behind an `Arc` and
//! read concurrently without locking.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::errors::RegistryError;
use crate::interfaces::IndexWorker;

/// Immutable mapping from worker name to worker implementation.
///
/// Lookups are by exact name. There is no default or fallback worker.
pub struct WorkerRegistry {
    workers: HashMap<String, Arc<dyn IndexWorker>>,
}

impl WorkerRegistry {
    /// Start building a registry.
    pub fn builder() -> WorkerRegistryBuilder {
        WorkerRegistryBuilder::default()
    }

    /// Check whether a worker is registered under `name`.
    pub fn has(&self, name: &str) -> bool {
        self.workers.contains_key(name)
    }

    /// Look up the worker registered under `name`.
    ///
    /// # Returns
    ///
    /// * `Ok(Arc<dyn IndexWorker>)` - The registered worker
    /// * `Err(RegistryError::WorkerNotFound)` - If `name` is unregistered
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn IndexWorker>, RegistryError> {
        self.workers
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::WorkerNotFound(name.to_string()))
    }

    /// Names of all registered workers, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.workers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered workers.
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    /// Whether no worker is registered.
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }
}

impl fmt::Debug for WorkerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerRegistry")
            .field("workers", &self.names())
            .finish()
    }
}

/// Builder collecting worker registrations before the registry is frozen.
#[derive(Default)]
pub struct WorkerRegistryBuilder {
    workers: HashMap<String, Arc<dyn IndexWorker>>,
}

impl WorkerRegistryBuilder {
    /// Register `worker` under `name`.
    ///
    /// # Returns
    ///
    /// * `Err(RegistryError::DuplicateWorker)` - If `name` is already taken
    pub fn register(
        mut self,
        name: impl Into<String>,
        worker: Arc<dyn IndexWorker>,
    ) -> Result<Self, RegistryError> {
        let name = name.into();
        if self.workers.contains_key(&name) {
            return Err(RegistryError::DuplicateWorker(name));
        }

        debug!(worker = %name, "Registered index worker");
        self.workers.insert(name, worker);
        Ok(self)
    }

    /// Freeze the registrations into an immutable registry.
    pub fn build(self) -> WorkerRegistry {
        WorkerRegistry {
            workers: self.workers,
        }
    }
}
