//! Release records: the unit persisted and compared across runs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A confirmed (version, date) pair selected as latest or previous.
///
/// Equality and hashing only consider the normalized version string. A vendor
/// correcting a release date without bumping the version must not look like a
/// new release.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseRecord {
    /// Version as displayed (e.g. "F10a", "1.20 (Beta)")
    pub version: String,

    /// Release date, serialized as ISO-8601 `YYYY-MM-DD`
    pub date: Option<NaiveDate>,
}

impl ReleaseRecord {
    /// Create a record without a date.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            date: None,
        }
    }

    /// Set the release date.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Set an optional release date.
    pub fn with_date_opt(mut self, date: Option<NaiveDate>) -> Self {
        self.date = date;
        self
    }

    /// Normalized comparison key for the version.
    pub fn version_key(&self) -> String {
        normalize_version(&self.version)
    }

    /// ISO-8601 date string if known.
    pub fn date_string(&self) -> Option<String> {
        self.date.map(|d| d.format("%Y-%m-%d").to_string())
    }

    /// Released within `days` days before `today` (inclusive).
    pub fn is_fresh(&self, today: NaiveDate, days: i64) -> bool {
        match self.date {
            Some(date) => {
                let age = (today - date).num_days();
                (0..=days).contains(&age)
            }
            None => false,
        }
    }
}

impl PartialEq for ReleaseRecord {
    fn eq(&self, other: &Self) -> bool {
        self.version_key() == other.version_key()
    }
}

impl Eq for ReleaseRecord {}

impl Hash for ReleaseRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.version_key().hash(state);
    }
}

/// Normalize a version string for comparison.
///
/// Trims, collapses internal whitespace, drops a leading `v` that precedes a
/// digit and case-folds.
pub fn normalize_version(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let stripped = match collapsed.strip_prefix(['v', 'V']) {
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_digit()) => rest,
        _ => collapsed.as_str(),
    };
    stripped.to_lowercase()
}
