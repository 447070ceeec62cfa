//! MSI: BIOS section under `#down-bios`, versions as firmware file names
//! (`E7D75AMS.1P3`) or board tags (`7D75v1P3`).

use lazy_static::lazy_static;
use regex::Regex;

use super::{extract_shaped, VendorHeuristic};
use crate::types::candidate::{Candidate, TextFragment};
use crate::types::config::PipelineConfig;

lazy_static! {
    static ref VERSION_PATTERN: Regex =
        Regex::new(r"^(?:E[0-9A-F]{4}[A-Z]{3}\.[0-9A-Z]{2,4}|[0-9A-F]{4}v[0-9A-Z]{1,4})$").unwrap();
}

const REGIONS: &[&str] = &["#down-bios", "#bios"];

#[derive(Debug, Clone, Copy, Default)]
pub struct MsiHeuristic;

impl MsiHeuristic {
    pub fn new() -> Self {
        Self
    }
}

impl VendorHeuristic for MsiHeuristic {
    fn tag(&self) -> &str {
        "msi"
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
