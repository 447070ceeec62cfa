//! Configuration types for the extraction pipeline.

use serde::{Deserialize, Serialize};

/// Day/month order for numeric dates whose components are both ≤ 12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    /// `MM/DD/YYYY`
    #[default]
    MonthFirst,

    /// `DD/MM/YYYY`
    DayFirst,
}

/// Tuning knobs for the extraction pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// How many fragments away a label may sit and still anchor a bare
    /// version token.
    ///
    /// Default: 5.
    pub anchor_window: usize,

    /// How many fragments forward/backward a version looks for its date.
    ///
    /// Default: 3.
    pub pair_window: usize,

    /// Candidates scoring below this are discarded.
    ///
    /// Default: 0.2.
    pub min_confidence: f32,

    /// Order applied to ambiguous numeric dates when the page offers no
    /// evidence either way.
    ///
    /// Default: month-first.
    pub default_date_order: DateOrder,

    /// Longest accepted version token, in characters.
    ///
    /// Default: 24.
    pub max_version_len: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            anchor_window: 5,
            pair_window: 3,
            min_confidence: 0.2,
            default_date_order: DateOrder::MonthFirst,
            max_version_len: 24,
        }
    }
}

impl PipelineConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the label anchor window.
    pub fn with_anchor_window(mut self, fragments: usize) -> Self {
        self.anchor_window = fragments;
        self
    }

    /// Set the version/date pairing window.
    pub fn with_pair_window(mut self, fragments: usize) -> Self {
        self.pair_window = fragments;
        self
    }

    /// Set the minimum candidate confidence.
    pub fn with_min_confidence(mut self, confidence: f32) -> Self {
        self.min_confidence = confidence.clamp(0.0, 1.0);
        self
    }

    /// Set the fallback date order.
    pub fn with_date_order(mut self, order: DateOrder) -> Self {
        self.default_date_order = order;
        self
    }
}
