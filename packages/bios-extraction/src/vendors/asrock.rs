//! ASRock: BIOS table under `#BIOS`, versions like `P1.90`, `L2.31`, `3.10A`.

use lazy_static::lazy_static;
use regex::Regex;

use super::{extract_shaped, VendorHeuristic};
use crate::types::candidate::{Candidate, TextFragment};
use crate::types::config::PipelineConfig;

lazy_static! {
    static ref VERSION_PATTERN: Regex =
        Regex::new(r"^[A-Z]?\d{1,2}(?:\.\d{1,2}){1,2}[A-Z]?$").unwrap();
}

const REGIONS: &[&str] = &["#BIOS", "[id*='BIOS']"];

#[derive(Debug, Clone, Copy, Default)]
pub struct AsrockHeuristic;

impl AsrockHeuristic {
    pub fn new() -> Self {
        Self
    }
}

impl VendorHeuristic for AsrockHeuristic {
    fn tag(&self) -> &str {
        "asrock"
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern() {
        for ok in ["P1.90", "L2.31", "3.10A", "10.03", "1.2.3"] {
            assert!(VERSION_PATTERN.is_match(ok), "{ok}");
        }
        for bad in ["F10", "3802", "PA1.90", "7D75v1P3"] {
            assert!(!VERSION_PATTERN.is_match(bad), "{bad}");
        }
    }

    #[test]
    fn test_table_rows() {
        let fragments: Vec<TextFragment> = ["Version", "Date", "P2.10", "2024/5/20", "P1.90", "2024/1/8"]
            .iter()
            .enumerate()
            .map(|(i, l)| TextFragment::new(*l, i))
            .collect();
        let found = AsrockHeuristic::new()
            .try_extract(&fragments, &PipelineConfig::default())
            .unwrap();
        let versions: Vec<&str> = found
            .iter()
            .filter(|c| c.is_version())
            .map(|c| c.normalized_value.as_str())
            .collect();
        assert_eq!(versions, vec!["P2.10", "P1.90"]);
    }
}
