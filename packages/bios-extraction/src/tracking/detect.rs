//! Change detection.

use chrono::NaiveDate;
use serde::Serialize;

use crate::types::model::TrackedModel;
use crate::types::release::ReleaseRecord;

/// A model's latest release differs from what was stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeEvent {
    pub model: TrackedModel,
    pub old: Option<ReleaseRecord>,
    pub new: ReleaseRecord,
}

impl ChangeEvent {
    /// No release was known for this model before.
    pub fn is_first_seen(&self) -> bool {
        self.old.is_none()
    }

    /// Flattened form handed to notifiers.
    pub fn notification(&self) -> ChangeNotification {
        ChangeNotification {
            model_identity: self.model.identity(),
            old_version: self.old.as_ref().map(|r| r.version.clone()),
            new_version: self.new.version.clone(),
            new_date: self.new.date,
        }
    }
}

/// What a notifier needs to announce a change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeNotification {
    pub model_identity: String,
    pub old_version: Option<String>,
    pub new_version: String,
    pub new_date: Option<NaiveDate>,
}

/// Compares a fresh latest release against stored state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeDetector;

impl ChangeDetector {
    pub fn new() -> Self {
        Self
    }

    /// A change fires when `new_latest` is present and either nothing was
    /// stored or the stored version differs. Dates are not compared.
    pub fn detect(
        &self,
        model: &TrackedModel,
        stored: Option<&ReleaseRecord>,
        new_latest: Option<&ReleaseRecord>,
    ) -> Option<ChangeEvent> {
        let new = new_latest?;
        if stored == Some(new) {
            return None;
        }
        Some(ChangeEvent {
            model: model.clone(),
            old: stored.cloned(),
            new: new.clone(),
        })
    }
}
