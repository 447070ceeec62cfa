//! Per-model results and the exported report shape.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::model::TrackedModel;
use super::release::ReleaseRecord;

/// Non-fatal observations made while extracting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractionWarning {
    /// A numeric date's day/month order was assumed.
    AmbiguousDate { raw: String, assumed: NaiveDate },

    /// The vendor heuristic found nothing; the generic path was used.
    VendorFallback { vendor: String },
}

/// Outcome of one extraction run for one model.
///
/// Failures are encoded in `error`, never raised past the model boundary.
/// If `latest` is absent, `previous` is absent too.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrapeResult {
    model: TrackedModel,
    latest: Option<ReleaseRecord>,
    previous: Option<ReleaseRecord>,
    error: Option<String>,
    warnings: Vec<ExtractionWarning>,
}

impl ScrapeResult {
    /// A result with at least a latest release.
    pub fn found(
        model: TrackedModel,
        latest: ReleaseRecord,
        previous: Option<ReleaseRecord>,
    ) -> Self {
        Self {
            model,
            latest: Some(latest),
            previous,
            error: None,
            warnings: Vec::new(),
        }
    }

    /// A failed result; carries no releases.
    pub fn failed(model: TrackedModel, error: impl ToString) -> Self {
        Self {
            model,
            latest: None,
            previous: None,
            error: Some(error.to_string()),
            warnings: Vec::new(),
        }
    }

    /// Attach warnings.
    pub fn with_warnings(mut self, warnings: Vec<ExtractionWarning>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn model(&self) -> &TrackedModel {
        &self.model
    }

    pub fn latest(&self) -> Option<&ReleaseRecord> {
        self.latest.as_ref()
    }

    pub fn previous(&self) -> Option<&ReleaseRecord> {
        self.previous.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn warnings(&self) -> &[ExtractionWarning] {
        &self.warnings
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// The persisted/exported record for one tracked model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseReport {
    pub board: String,
    pub vendor: String,
    pub latest: Option<ReleaseRecord>,
    pub previous: Option<ReleaseRecord>,
    pub download_page: String,
    pub error: Option<String>,
}

impl From<&ScrapeResult> for ReleaseReport {
    fn from(result: &ScrapeResult) -> Self {
        Self {
            board: result.model.name.clone(),
            vendor: result.model.vendor.clone(),
            latest: result.latest.clone(),
            previous: result.previous.clone(),
            download_page: result.model.url.clone(),
            error: result.error.clone(),
        }
    }
}

/// Export document wrapping all reports from one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDocument {
    pub generated_at: DateTime<Utc>,
    pub items: Vec<ReleaseReport>,
}

impl ReportDocument {
    /// Build a document stamped with the current time.
    pub fn new(results: &[ScrapeResult]) -> Self {
        Self {
            generated_at: Utc::now(),
            items: results.iter().map(ReleaseReport::from).collect(),
        }
    }
}
