//! Subject capabilities.
//!
//! A subject is any changed domain object handed to the dispatcher. Only
//! subjects exposing the [`Indexable`] capability can reach an index;
//! everything else is ineligible for every index.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A changed domain object.
pub trait Subject: Send + Sync {
    /// Opaque, stable identity of the object.
    fn subject_id(&self) -> &str;

    /// The indexable view of this object, if it has one.
    fn as_indexable(&self) -> Option<&dyn Indexable>;
}

/// Capability of a subject that can be written to an index.
pub trait Indexable: Subject {
    /// Stable type identifier matched against [`crate::Index::target_type`].
    fn type_identifier(&self) -> &str;

    /// Fields workers use to build their document.
    fn document(&self) -> Value;
}

/// A generic changed object as delivered by a change feed.
///
/// Objects without a `class` carry no type identifier and are therefore
/// not indexable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangedObject {
    /// Object identity.
    pub id: String,
    /// Type identifier, when the object is indexable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    /// Document fields.
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl ChangedObject {
    /// Create an indexable object of the given class.
    pub fn new(id: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            class: Some(class.into()),
            fields: Map::new(),
        }
    }

    /// Create an object with no type identifier.
    pub fn opaque(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            class: None,
            fields: Map::new(),
        }
    }

    /// Add a document field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

impl Subject for ChangedObject {
    fn subject_id(&self) -> &str {
        &self.id
    }

    fn as_indexable(&self) -> Option<&dyn Indexable> {
        match self.class {
            Some(_) => Some(self as &dyn Indexable),
            None => None,
        }
    }
}

impl Indexable for ChangedObject {
    fn type_identifier(&self) -> &str {
        self.class.as_deref().unwrap_or_default()
    }

    fn document(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}
