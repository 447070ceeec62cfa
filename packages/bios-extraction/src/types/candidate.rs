//! Ephemeral extraction types: fragments, candidates and pairs.
//!
//! These live for a single pipeline run and are discarded afterwards.

use chrono::NaiveDate;
use serde::Serialize;

use super::release::ReleaseRecord;

/// A span of normalized text plus its document position.
///
/// `position` is the fragment ordinal in document order; it is the only
/// signal used for proximity pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextFragment {
    /// Whitespace-collapsed text
    pub text: String,

    /// Ordinal in document order
    pub position: usize,

    /// Inside navigation, footer or similar boilerplate
    pub boilerplate: bool,
}

impl TextFragment {
    /// Create a content fragment.
    pub fn new(text: impl Into<String>, position: usize) -> Self {
        Self {
            text: text.into(),
            position,
            boilerplate: false,
        }
    }

    /// Mark this fragment as boilerplate.
    pub fn with_boilerplate(mut self, boilerplate: bool) -> Self {
        self.boilerplate = boilerplate;
        self
    }
}

/// Which token family a candidate belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CandidateKind {
    Version,
    Date,
}

/// An unconfirmed version or date token found during extraction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub kind: CandidateKind,

    /// Token exactly as it appeared in the fragment
    pub raw_text: String,

    /// Display version, or ISO-8601 date for date tokens
    pub normalized_value: String,

    /// Fragment ordinal
    pub position: usize,

    /// Byte offset of the token start within the fragment
    pub offset: usize,

    /// Byte offset one past the token end within the fragment
    pub end: usize,

    /// Score in `[0, 1]`
    pub confidence: f32,

    /// Directly preceded by a vocabulary label
    pub labeled: bool,

    /// Date whose day/month order was assumed, not observed
    pub ambiguous: bool,
}

impl Candidate {
    /// Create a version candidate.
    pub fn version(
        raw_text: impl Into<String>,
        normalized_value: impl Into<String>,
        position: usize,
        span: (usize, usize),
    ) -> Self {
        Self::new(CandidateKind::Version, raw_text, normalized_value, position, span)
    }

    /// Create a date candidate; `date` becomes the ISO-8601 normalized value.
    pub fn date(
        raw_text: impl Into<String>,
        date: NaiveDate,
        position: usize,
        span: (usize, usize),
    ) -> Self {
        Self::new(
            CandidateKind::Date,
            raw_text,
            date.format("%Y-%m-%d").to_string(),
            position,
            span,
        )
    }

    fn new(
        kind: CandidateKind,
        raw_text: impl Into<String>,
        normalized_value: impl Into<String>,
        position: usize,
        (offset, end): (usize, usize),
    ) -> Self {
        Self {
            kind,
            raw_text: raw_text.into(),
            normalized_value: normalized_value.into(),
            position,
            offset,
            end,
            confidence: 0.0,
            labeled: false,
            ambiguous: false,
        }
    }

    /// Set the confidence, clamped to `[0, 1]`.
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    /// Mark as label-anchored.
    pub fn with_label(mut self, labeled: bool) -> Self {
        self.labeled = labeled;
        self
    }

    /// Mark as an ambiguous date.
    pub fn with_ambiguous(mut self, ambiguous: bool) -> Self {
        self.ambiguous = ambiguous;
        self
    }

    pub fn is_version(&self) -> bool {
        self.kind == CandidateKind::Version
    }

    pub fn is_date(&self) -> bool {
        self.kind == CandidateKind::Date
    }

    /// Parsed date for date candidates.
    pub fn as_date(&self) -> Option<NaiveDate> {
        if !self.is_date() {
            return None;
        }
        NaiveDate::parse_from_str(&self.normalized_value, "%Y-%m-%d").ok()
    }

    /// Document-order sort key.
    pub fn order_key(&self) -> (usize, usize) {
        (self.position, self.offset)
    }
}

/// A version candidate associated with at most one date candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReleasePair {
    pub version: Candidate,
    pub date: Option<Candidate>,
}

impl ReleasePair {
    /// Combined confidence: the version dominates, a date adds support.
    pub fn confidence(&self) -> f32 {
        let date = self.date.as_ref().map(|d| d.confidence).unwrap_or(0.0);
        0.7 * self.version.confidence + 0.3 * date
    }

    /// Document position of the version token.
    pub fn order_key(&self) -> (usize, usize) {
        self.version.order_key()
    }

    /// Convert into a release record.
    pub fn to_record(&self) -> ReleaseRecord {
        ReleaseRecord::new(self.version.normalized_value.clone())
            .with_date_opt(self.date.as_ref().and_then(Candidate::as_date))
    }
}
