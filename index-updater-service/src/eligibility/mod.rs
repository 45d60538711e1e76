//! Eligibility of an index for a subject.
//!
//! An index applies to a subject when all of the following hold:
//!
//! 1. the subject exposes the [`Indexable`] capability;
//! 2. its type identifier equals the index's `target_type` exactly;
//! 3. the change is not a version event, or the index tracks version events.

use index_updater_shared::{Index, Indexable, Subject};

/// Outcome of checking one index against one subject.
#[derive(Clone, Copy)]
pub enum Eligibility<'a> {
    /// The index applies; carries the subject's indexable view.
    Eligible(&'a dyn Indexable),
    /// The subject is not indexable.
    NotIndexable,
    /// The subject's type differs from the index's target type.
    TypeMismatch,
    /// Version event for an index that only takes committed changes.
    VersionEventSuppressed,
}

impl<'a> Eligibility<'a> {
    /// Check `index` against `subject`. Never fails.
    pub fn check(index: &Index, subject: &'a dyn Subject, is_version_event: bool) -> Self {
        let Some(indexable) = subject.as_indexable() else {
            return Self::NotIndexable;
        };

        if indexable.type_identifier() != index.target_type {
            return Self::TypeMismatch;
        }

        if is_version_event && !index.tracks_version_events {
            return Self::VersionEventSuppressed;
        }

        Self::Eligible(indexable)
    }

    /// The indexable view, if eligible.
    pub fn indexable(&self) -> Option<&'a dyn Indexable> {
        match self {
            Self::Eligible(indexable) => Some(*indexable),
            _ => None,
        }
    }

    /// Short reason label for logging.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Eligible(_) => "eligible",
            Self::NotIndexable => "not_indexable",
            Self::TypeMismatch => "type_mismatch",
            Self::VersionEventSuppressed => "version_event_suppressed",
        }
    }
}

/// Whether `index` should receive the change of `subject`.
pub fn is_eligible(index: &Index, subject: &dyn Subject, is_version_event: bool) -> bool {
    Eligibility::check(index, subject, is_version_event)
        .indexable()
        .is_some()
}
