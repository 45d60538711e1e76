//! Index configuration and dispatch operation types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A configured indexing target.
///
/// Indices are created and edited by an administrator and are read-only
/// to the dispatcher. An index accepts subjects of exactly one type and is
/// serviced by the worker registered under `worker`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    /// Unique index name, used as its identifier in logs and errors.
    pub name: String,
    /// Type identifier of the subjects this index accepts.
    pub target_type: String,
    /// Name of the worker servicing this index.
    pub worker: String,
    /// Whether changes originating from a version-only save (e.g. a draft)
    /// should reach this index.
    #[serde(default)]
    pub tracks_version_events: bool,
}

impl Index {
    /// Create a new index that ignores version events.
    pub fn new(
        name: impl Into<String>,
        target_type: impl Into<String>,
        worker: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            target_type: target_type.into(),
            worker: worker.into(),
            tracks_version_events: false,
        }
    }

    /// Set whether this index receives version events.
    pub fn with_version_events(mut self, tracks_version_events: bool) -> Self {
        self.tracks_version_events = tracks_version_events;
        self
    }
}

/// The operation a dispatch applies to every eligible index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Insert or refresh the subject's document.
    Update,
    /// Remove the subject's document.
    Remove,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Update => f.write_str("update"),
            Operation::Remove => f.write_str("remove"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_deserialize_defaults_version_flag() {
        let index: Index = serde_json::from_str(
            r#"{"name": "products", "target_type": "Product", "worker": "es"}"#,
        )
        .unwrap();

        assert_eq!(index, Index::new("products", "Product", "es"));
        assert!(!index.tracks_version_events);
    }

    #[test]
    fn test_operation_serde_names() {
        assert_eq!(serde_json::to_string(&Operation::Update).unwrap(), "\"update\"");
        let op: Operation = serde_json::from_str("\"remove\"").unwrap();
        assert_eq!(op, Operation::Remove);
        assert_eq!(Operation::Remove.to_string(), "remove");
    }
}
