//! Tracked models and the page content handed to the pipeline.

use serde::{Deserialize, Serialize};

/// A single hardware board/vendor entry pointing at one support page.
///
/// Created from external configuration and never mutated by the core.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackedModel {
    /// Board name as shown to users (e.g. "B650 AORUS ELITE AX")
    pub name: String,

    /// Vendor tag used to select a heuristic (e.g. "gigabyte")
    pub vendor: String,

    /// Support page URL
    #[serde(alias = "support_url")]
    pub url: String,

    /// CSS selectors for this board's BIOS section, tried before the
    /// vendor's own regions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selectors: Vec<String>,
}

impl TrackedModel {
    /// Create a new tracked model.
    pub fn new(
        name: impl Into<String>,
        vendor: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            vendor: vendor.into(),
            url: url.into(),
            selectors: Vec::new(),
        }
    }

    /// Board-level region selectors (builder pattern).
    pub fn with_selectors<I, S>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selectors = selectors.into_iter().map(Into::into).collect();
        self
    }

    /// Stable key used for persisted state: `<vendor>/<name>`.
    ///
    /// The vendor is case-folded; the name keeps its casing but is trimmed
    /// and whitespace-collapsed so cosmetic config edits don't orphan state.
    pub fn identity(&self) -> String {
        let vendor = self.vendor.trim().to_lowercase();
        let name = self.name.split_whitespace().collect::<Vec<_>>().join(" ");
        format!("{}/{}", vendor, name)
    }
}

/// Already-fetched page content for one model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageContent {
    /// Raw HTML markup; parsed into a DOM view by the normalizer
    Html(String),

    /// Plain text with no markup
    Text(String),
}

impl PageContent {
    /// Guess the content kind from the body: anything with a tag-like
    /// `<html`, `<body` or `<div` prefix is treated as markup.
    pub fn detect(body: impl Into<String>) -> Self {
        let body = body.into();
        let head: String = body.chars().take(2048).collect::<String>().to_lowercase();
        if head.contains("<html")
            || head.contains("<body")
            || head.contains("<div")
            || head.contains("<!doctype")
            || head.contains("<table")
        {
            PageContent::Html(body)
        } else {
            PageContent::Text(body)
        }
    }

    /// The raw body regardless of kind.
    pub fn as_str(&self) -> &str {
        match self {
            PageContent::Html(s) | PageContent::Text(s) => s,
        }
    }

    /// Check if this page has any non-whitespace content.
    pub fn has_content(&self) -> bool {
        !self.as_str().trim().is_empty()
    }
}
