//! ASUS: plain numeric BIOS versions (`0805`, `3802`).
//!
//! ASUS support pages have no stable BIOS container id, so the whole page is
//! scanned and bare numbers still need a nearby label.

use lazy_static::lazy_static;
use regex::Regex;

use super::{extract_shaped, VendorHeuristic};
use crate::pipeline::vocabulary::LabelVocabulary;
use crate::types::candidate::{Candidate, TextFragment};
use crate::types::config::PipelineConfig;

lazy_static! {
    static ref VERSION_PATTERN: Regex = Regex::new(r"^\d{3,5}$").unwrap();
    static ref VOCABULARY: LabelVocabulary =
        LabelVocabulary::with_version_labels(["bios version", "version", "bios"])
            .expect("static labels are valid");
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AsusHeuristic;

impl AsusHeuristic {
    pub fn new() -> Self {
        Self
    }
}

impl VendorHeuristic for AsusHeuristic {
    fn tag(&self) -> &str {
        "asus"
    }

    fn vocabulary(&self) -> LabelVocabulary {
        VOCABULARY.clone()
    }

    fn try_extract(
        &self,
        fragments: &[TextFragment],
        config: &PipelineConfig,
    ) -> Option<Vec<Candidate>> {
        extract_shaped(fragments, config, self.vocabulary(), &VERSION_PATTERN, true)
    }
}
