//! End-to-end extraction: page content → `ScrapeResult`.
//!
//! ```text
//! PageContent → narrow/normalize → candidates → pairs → latest/previous
//! ```
//!
//! Extraction is a pure function of the page: no I/O, no clock, no shared
//! state. Running it twice on the same input yields the same result.

use tracing::{debug, warn};

use super::normalize::TextNormalizer;
use super::pairing::CandidatePairer;
use super::rank::ReleaseRanker;
use crate::error::{ExtractionError, Result};
use crate::types::candidate::{Candidate, ReleasePair};
use crate::types::config::PipelineConfig;
use crate::types::model::{PageContent, TrackedModel};
use crate::types::result::{ExtractionWarning, ScrapeResult};
use crate::vendors::{GenericHeuristic, VendorHeuristic, VendorRegistry};

/// The extraction pipeline.
#[derive(Debug, Clone, Default)]
pub struct ReleasePipeline {
    config: PipelineConfig,
    normalizer: TextNormalizer,
    registry: VendorRegistry,
    generic: GenericHeuristic,
}

impl ReleasePipeline {
    /// Pipeline with the built-in vendor heuristics.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Replace the vendor registry.
    pub fn with_registry(mut self, registry: VendorRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn registry(&self) -> &VendorRegistry {
        &self.registry
    }

    /// Extract latest/previous releases. Failures land in `ScrapeResult.error`.
    pub fn run(&self, model: &TrackedModel, page: &PageContent) -> ScrapeResult {
        match self.extract(model, page) {
            Ok(result) => result,
            Err(e) => {
                warn!(model = %model.identity(), error = %e, "Extraction failed");
                ScrapeResult::failed(model.clone(), e)
            }
        }
    }

    /// Like [`run`](Self::run) but surfaces the failure as an error.
    pub fn extract(&self, model: &TrackedModel, page: &PageContent) -> Result<ScrapeResult> {
        if !page.has_content() {
            return Err(ExtractionError::NoCandidatesFound);
        }

        let mut warnings = Vec::new();
        let found = self
            .board_candidates(model, page)
            .or_else(|| self.vendor_candidates(model, page));
        let candidates = match found {
            Some(candidates) => candidates,
            None => {
                if self.registry.get(&model.vendor).is_some() {
                    debug!(vendor = %model.vendor, "Vendor heuristic found nothing, using generic path");
                    warnings.push(ExtractionWarning::VendorFallback {
                        vendor: model.vendor.clone(),
                    });
                }
                let fragments = self.normalizer.normalize(page);
                self.generic.extract(&fragments, &self.config)
            }
        };

        let pairs = CandidatePairer::from_config(&self.config).pair(&candidates);
        let ranked = ReleaseRanker::new().rank(pairs);
        let Some(latest) = ranked.latest else {
            return Err(ExtractionError::NoCandidatesFound);
        };

        for pair in std::iter::once(&latest).chain(ranked.previous.as_ref()) {
            if let Some(warning) = ambiguity_warning(pair) {
                warnings.push(warning);
            }
        }

        debug!(
            model = %model.identity(),
            latest = %latest.version.normalized_value,
            previous = ?ranked.previous.as_ref().map(|p| p.version.normalized_value.as_str()),
            "Extracted releases"
        );

        Ok(ScrapeResult::found(
            model.clone(),
            latest.to_record(),
            ranked.previous.as_ref().map(ReleasePair::to_record),
        )
        .with_warnings(warnings))
    }

    /// Candidates from the board's own selectors, if any match and hold versions.
    fn board_candidates(&self, model: &TrackedModel, page: &PageContent) -> Option<Vec<Candidate>> {
        if model.selectors.is_empty() {
            return None;
        }
        let selectors: Vec<&str> = model.selectors.iter().map(String::as_str).collect();
        let fragments = self.normalizer.normalize_region(page, &selectors)?;
        debug!(
            model = %model.identity(),
            fragments = fragments.len(),
            "Narrowed to board selectors"
        );

        self.registry
            .get(&model.vendor)
            .and_then(|heuristic| heuristic.try_extract(&fragments, &self.config))
            .or_else(|| self.generic.try_extract(&fragments, &self.config))
    }

    /// Candidates from the vendor override, if one exists and finds versions.
    fn vendor_candidates(&self, model: &TrackedModel, page: &PageContent) -> Option<Vec<Candidate>> {
        let heuristic = self.registry.get(&model.vendor)?;
        let fragments = heuristic.narrow(page, &self.normalizer)?;
        debug!(
            vendor = heuristic.tag(),
            fragments = fragments.len(),
            "Running vendor heuristic"
        );
        heuristic.try_extract(&fragments, &self.config)
    }
}

fn ambiguity_warning(pair: &ReleasePair) -> Option<ExtractionWarning> {
    let date = pair.date.as_ref().filter(|d| d.ambiguous)?;
    Some(ExtractionWarning::AmbiguousDate {
        raw: date.raw_text.clone(),
        assumed: date.as_date()?,
    })
}
