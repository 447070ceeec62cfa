//! Per-vendor extraction overrides.
//!
//! A [`VendorHeuristic`] may narrow the page to the vendor's BIOS section and
//! restrict version tokens to the vendor's naming scheme. The pipeline always
//! falls back to the [`GenericHeuristic`] when an override finds nothing, so a
//! registered vendor is never covered worse than an unknown one.

pub mod asrock;
pub mod asus;
pub mod generic;
pub mod gigabyte;
pub mod msi;

use std::collections::HashMap;
use std::sync::Arc;

use regex::Regex;

use crate::pipeline::candidates::{CandidateExtractor, VersionShape};
use crate::pipeline::normalize::TextNormalizer;
use crate::pipeline::vocabulary::LabelVocabulary;
use crate::types::candidate::{Candidate, TextFragment};
use crate::types::config::PipelineConfig;
use crate::types::model::PageContent;

pub use asrock::AsrockHeuristic;
pub use asus::AsusHeuristic;
pub use generic::GenericHeuristic;
pub use gigabyte::GigabyteHeuristic;
pub use msi::MsiHeuristic;

/// Vendor-specific extraction strategy.
pub trait VendorHeuristic: Send + Sync {
    /// Vendor tag this heuristic answers to (lowercase).
    fn tag(&self) -> &str;

    /// CSS selectors for the vendor's BIOS download section, tried in order.
    fn content_regions(&self) -> &[&str] {
        &[]
    }

    /// Label vocabulary used when scoring this vendor's pages.
    fn vocabulary(&self) -> LabelVocabulary {
        LabelVocabulary::default()
    }

    /// Fragments this heuristic should look at.
    ///
    /// Without content regions this is the whole page. With regions it is
    /// the first matching region, or `None` when none match.
    fn narrow(
        &self,
        page: &PageContent,
        normalizer: &TextNormalizer,
    ) -> Option<Vec<TextFragment>> {
        let regions = self.content_regions();
        if regions.is_empty() {
            Some(normalizer.normalize(page))
        } else {
            normalizer.normalize_region(page, regions)
        }
    }

    /// Extract candidates, or `None` when no version candidate was found.
    fn try_extract(
        &self,
        fragments: &[TextFragment],
        config: &PipelineConfig,
    ) -> Option<Vec<Candidate>>;
}

/// Shared shape-restricted extraction for the built-in heuristics.
pub(crate) fn extract_shaped(
    fragments: &[TextFragment],
    config: &PipelineConfig,
    vocabulary: LabelVocabulary,
    pattern: &Regex,
    require_anchor: bool,
) -> Option<Vec<Candidate>> {
    let candidates = CandidateExtractor::new(config.clone())
        .with_vocabulary(vocabulary)
        .extract_shaped(
            fragments,
            VersionShape {
                pattern,
                require_anchor,
            },
        );

    if candidates.iter().any(Candidate::is_version) {
        Some(candidates)
    } else {
        None
    }
}

/// Heuristics keyed by case-insensitive vendor tag.
#[derive(Clone)]
pub struct VendorRegistry {
    heuristics: HashMap<String, Arc<dyn VendorHeuristic>>,
}

impl Default for VendorRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for VendorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VendorRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}

impl VendorRegistry {
    /// An empty registry: every vendor uses the generic path.
    pub fn empty() -> Self {
        Self {
            heuristics: HashMap::new(),
        }
    }

    /// Registry with the ASUS, MSI, Gigabyte and ASRock heuristics.
    ///
    /// ROG boards live on ASUS support pages and share the ASUS heuristic.
    pub fn with_builtins() -> Self {
        Self::empty()
            .with_heuristic(Arc::new(AsusHeuristic::new()))
            .with_heuristic(Arc::new(MsiHeuristic::new()))
            .with_heuristic(Arc::new(GigabyteHeuristic::new()))
            .with_heuristic(Arc::new(AsrockHeuristic::new()))
            .with_alias("asusrog", "asus")
    }

    /// Answer to `alias` with the heuristic registered for `tag` (builder pattern).
    pub fn with_alias(mut self, alias: &str, tag: &str) -> Self {
        self.alias(alias, tag);
        self
    }

    /// Register `alias` for the heuristic behind `tag`. Returns false when
    /// `tag` is unknown.
    pub fn alias(&mut self, alias: &str, tag: &str) -> bool {
        match self.get(tag) {
            Some(heuristic) => {
                self.heuristics.insert(alias.trim().to_lowercase(), heuristic);
                true
            }
            None => false,
        }
    }

    /// Add a heuristic (builder pattern).
    pub fn with_heuristic(mut self, heuristic: Arc<dyn VendorHeuristic>) -> Self {
        self.register(heuristic);
        self
    }

    /// Add or replace a heuristic, returning the one it replaced.
    pub fn register(
        &mut self,
        heuristic: Arc<dyn VendorHeuristic>,
    ) -> Option<Arc<dyn VendorHeuristic>> {
        let tag = heuristic.tag().trim().to_lowercase();
        self.heuristics.insert(tag, heuristic)
    }

    /// Look up the heuristic for a vendor tag.
    pub fn get(&self, vendor: &str) -> Option<Arc<dyn VendorHeuristic>> {
        self.heuristics.get(&vendor.trim().to_lowercase()).cloned()
    }

    /// Registered tags, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.heuristics.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}
