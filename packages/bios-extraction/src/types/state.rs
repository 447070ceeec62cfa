//! Persisted tracking state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::release::ReleaseRecord;

/// Last known latest release per model identity.
///
/// Serialized as a plain JSON object: `{"msi/z790 tomahawk": {"version": ...}}`.
/// A `null` value means the model was tracked but no release was ever found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateSnapshot {
    entries: BTreeMap<String, Option<ReleaseRecord>>,
}

impl StateSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry for a model identity. The outer `None` means "never seen".
    pub fn get(&self, identity: &str) -> Option<&Option<ReleaseRecord>> {
        self.entries.get(identity)
    }

    /// Last known latest release, if any.
    pub fn latest(&self, identity: &str) -> Option<&ReleaseRecord> {
        self.entries.get(identity).and_then(Option::as_ref)
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.entries.contains_key(identity)
    }

    /// Set the entry for a model, returning the previous one.
    pub fn insert(
        &mut self,
        identity: impl Into<String>,
        record: Option<ReleaseRecord>,
    ) -> Option<Option<ReleaseRecord>> {
        self.entries.insert(identity.into(), record)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in identity order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&ReleaseRecord>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }
}
