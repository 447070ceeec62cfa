//! Gigabyte: BIOS table under `#support-dl-bios`, versions `F10`, `F10a`.

use lazy_static::lazy_static;
use regex::Regex;

use super::{extract_shaped, VendorHeuristic};
use crate::types::candidate::{Candidate, TextFragment};
use crate::types::config::PipelineConfig;

lazy_static! {
    static ref VERSION_PATTERN: Regex = Regex::new(r"^F\d{1,3}[a-z]?$").unwrap();
}

const REGIONS: &[&str] = &["#support-dl-bios", "[id*='support-dl-bios']"];

#[derive(Debug, Clone, Copy, Default)]
pub struct GigabyteHeuristic;

impl GigabyteHeuristic {
    pub fn new() -> Self {
        Self
    }
}

impl VendorHeuristic for GigabyteHeuristic {
    fn tag(&self) -> &str {
        "gigabyte"
    }

    fn content_regions(&self) -> &[&str] {
        REGIONS
    }

    fn try_extract(
        &self,
        fragments: &[TextFragment],
        config: &PipelineConfig,
    ) -> Option<Vec<Candidate>> {
        extract_shaped(fragments, config, self.vocabulary(), &VERSION_PATTERN, false)
    }
}
