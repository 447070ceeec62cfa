//! Vendor-agnostic heuristic: full page, default vocabulary, any token shape.

use super::VendorHeuristic;
use crate::pipeline::candidates::CandidateExtractor;
use crate::types::candidate::{Candidate, TextFragment};
use crate::types::config::PipelineConfig;

/// Always available; the pipeline's fallback path.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericHeuristic;

impl GenericHeuristic {
    pub const TAG: &'static str = "generic";

    pub fn new() -> Self {
        Self
    }

    /// Extract with the generic rules. May contain zero versions.
    pub fn extract(&self, fragments: &[TextFragment], config: &PipelineConfig) -> Vec<Candidate> {
        CandidateExtractor::new(config.clone())
            .with_vocabulary(self.vocabulary())
            .extract(fragments)
    }
}

impl VendorHeuristic for GenericHeuristic {
    fn tag(&self) -> &str {
        Self::TAG
    }

    fn try_extract(
        &self,
        fragments: &[TextFragment],
        config: &PipelineConfig,
    ) -> Option<Vec<Candidate>> {
        let candidates = self.extract(fragments, config);
        candidates
            .iter()
            .any(Candidate::is_version)
            .then_some(candidates)
    }
}
