//! Change notifications consumed by the index updater.

use serde::{Deserialize, Serialize};

use crate::{ChangedObject, Operation};

/// A single change notification for one domain object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Whether the object was saved or deleted.
    pub operation: Operation,
    /// Set when the change comes from a version-only save rather than a
    /// committed change. Meaningless for removals.
    #[serde(default)]
    pub version_event: bool,
    /// The changed object.
    pub subject: ChangedObject,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_change_event() {
        let event: ChangeEvent = serde_json::from_str(
            r#"{"operation": "update", "version_event": true,
                "subject": {"id": "1", "class": "Product", "fields": {"sku": "A-1"}}}"#,
        )
        .unwrap();

        assert_eq!(event.operation, Operation::Update);
        assert!(event.version_event);
        assert_eq!(event.subject.class.as_deref(), Some("Product"));
        assert_eq!(event.subject.fields["sku"], "A-1");
    }

    #[test]
    fn test_version_event_defaults_to_false() {
        let event: ChangeEvent =
            serde_json::from_str(r#"{"operation": "remove", "subject": {"id": "1"}}"#).unwrap();

        assert_eq!(event.operation, Operation::Remove);
        assert!(!event.version_event);
    }
}
