//! Candidate extraction: version and date tokens with confidence scores.
//!
//! Version tokens come in two flavours:
//! - **labeled**: directly follow a vocabulary label (`BIOS Version 1.20`)
//! - **bare**: the leading token of a fragment that sits near a label or
//!   continues a run of earlier versions (a table column, a list)
//!
//! Dates are scanned independently and scored on shape, label and proximity.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::dates::{find_dates, infer_order, DateShape};
use super::vocabulary::{contains_any_word, LabelVocabulary};
use crate::types::candidate::{Candidate, TextFragment};
use crate::types::config::PipelineConfig;

const LABELED_BASE: f32 = 0.6;
const BARE_BASE: f32 = 0.3;
const DATE_BASE: f32 = 0.5;

/// Large enough to sink any candidate below the default threshold.
const NOISE_PENALTY: f32 = 0.75;
const BOILERPLATE_PENALTY: f32 = 0.75;

const VERSION_NEAR_DATE_BOOST: f32 = 0.15;
const DATE_NEAR_VERSION_BOOST: f32 = 0.1;

const MIN_TOKEN_LEN: usize = 2;

lazy_static! {
    static ref TOKEN_REGEX: Regex =
        Regex::new(r"[A-Za-z0-9]+(?:[._\-][A-Za-z0-9]+)*").unwrap();
    static ref BIOS_WORDS: Vec<String> = vec!["bios".to_string(), "uefi".to_string()];
    static ref BETA_WORDS: Vec<String> = vec!["beta".to_string()];
}

/// Restricts version tokens to a vendor-specific shape.
#[derive(Debug, Clone, Copy)]
pub struct VersionShape<'a> {
    /// Anchored pattern (`^...$`) a token must match in full
    pub pattern: &'a Regex,

    /// Bare tokens still need a nearby label
    pub require_anchor: bool,
}

/// Scans fragments for version and date candidates.
#[derive(Debug, Clone, Default)]
pub struct CandidateExtractor {
    config: PipelineConfig,
    vocabulary: LabelVocabulary,
}

impl CandidateExtractor {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            vocabulary: LabelVocabulary::default(),
        }
    }

    /// Use a custom label vocabulary.
    pub fn with_vocabulary(mut self, vocabulary: LabelVocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Generic extraction. Candidates are returned in document order.
    pub fn extract(&self, fragments: &[TextFragment]) -> Vec<Candidate> {
        self.run(fragments, None)
    }

    /// Extraction where version tokens must match a vendor shape.
    pub fn extract_shaped(
        &self,
        fragments: &[TextFragment],
        shape: VersionShape<'_>,
    ) -> Vec<Candidate> {
        self.run(fragments, Some(shape))
    }

    fn run(&self, fragments: &[TextFragment], shape: Option<VersionShape<'_>>) -> Vec<Candidate> {
        let mut dates = self.scan_dates(fragments);
        let mut versions = self.scan_versions(fragments, &dates, shape);
        self.apply_proximity(&mut versions, &mut dates);

        let min = self.config.min_confidence;
        let (scanned_versions, scanned_dates) = (versions.len(), dates.len());
        let mut candidates: Vec<Candidate> = versions
            .into_iter()
            .chain(dates)
            .filter(|c| c.confidence >= min)
            .collect();
        candidates.sort_by_key(|c| c.order_key());

        debug!(
            versions = scanned_versions,
            dates = scanned_dates,
            kept = candidates.len(),
            "Extracted candidates"
        );
        candidates
    }

    fn scan_dates(&self, fragments: &[TextFragment]) -> Vec<Candidate> {
        let evidence = infer_order(fragments.iter().map(|f| f.text.as_str()));
        let order = evidence.unwrap_or(self.config.default_date_order);

        let mut dates = Vec::new();
        for (i, fragment) in fragments.iter().enumerate() {
            let labeled = self.vocabulary.has_date_label(&fragment.text)
                || i
                    .checked_sub(1)
                    .is_some_and(|p| self.vocabulary.has_date_label(&fragments[p].text));

            for found in find_dates(&fragment.text, order) {
                let ambiguous = found.is_ambiguous() && evidence.is_none();

                let mut score = DATE_BASE;
                score += match found.shape {
                    DateShape::Textual => 0.2,
                    DateShape::Iso => 0.15,
                    DateShape::Numeric | DateShape::AmbiguousNumeric => 0.1,
                };
                if labeled {
                    score += 0.15;
                }
                if ambiguous {
                    score -= 0.15;
                }
                if fragment.boilerplate {
                    score -= BOILERPLATE_PENALTY;
                }

                dates.push(
                    Candidate::date(
                        found.raw,
                        found.date,
                        fragment.position,
                        (found.start, found.end),
                    )
                    .with_confidence(score)
                    .with_label(labeled)
                    .with_ambiguous(ambiguous),
                );
            }
        }
        dates
    }

    fn scan_versions(
        &self,
        fragments: &[TextFragment],
        dates: &[Candidate],
        shape: Option<VersionShape<'_>>,
    ) -> Vec<Candidate> {
        let label_positions: Vec<usize> = fragments
            .iter()
            .filter(|f| !f.boilerplate && self.vocabulary.has_version_label(&f.text))
            .map(|f| f.position)
            .collect();
        let anchor_window = self.config.anchor_window;
        // A run of version cells continues while each sits within two pairing
        // windows of the previous one.
        let run_window = anchor_window.max(self.config.pair_window * 2);
        let require_anchor = shape.map_or(true, |s| s.require_anchor);

        let mut last_accepted: Option<usize> = None;
        let mut versions = Vec::new();

        for fragment in fragments {
            let text = fragment.text.as_str();
            let date_spans: Vec<(usize, usize)> = dates
                .iter()
                .filter(|d| d.position == fragment.position)
                .map(|d| (d.offset, d.end))
                .collect();

            let mut found = Vec::new();
            for caps in self.vocabulary.label_pattern().captures_iter(text) {
                let Some(token) = caps.name("token") else {
                    continue;
                };
                let span = (token.start(), token.end());
                if self.accept_token(text, span, &date_spans, true, shape) {
                    found.push(self.version_candidate(fragment, span, true));
                }
            }

            let anchored = !require_anchor
                || label_positions
                    .iter()
                    .any(|&p| p.abs_diff(fragment.position) <= anchor_window)
                || last_accepted.is_some_and(|p| fragment.position.abs_diff(p) <= run_window);

            if found.is_empty() && anchored && !fragment.boilerplate {
                if let Some(span) = leading_token(text) {
                    // Without a vendor shape, a cell that goes on into prose is
                    // a description, not a version.
                    let standalone = shape.is_some() || stands_alone(text, span.1, &date_spans);
                    if standalone && self.accept_token(text, span, &date_spans, false, shape) {
                        found.push(self.version_candidate(fragment, span, false));
                    }
                }
            }

            if !found.is_empty() && !fragment.boilerplate {
                last_accepted = Some(fragment.position);
            }
            versions.extend(found);
        }
        versions
    }

    fn accept_token(
        &self,
        text: &str,
        (start, end): (usize, usize),
        date_spans: &[(usize, usize)],
        labeled: bool,
        shape: Option<VersionShape<'_>>,
    ) -> bool {
        let token = &text[start..end];
        let len = token.chars().count();
        if len < MIN_TOKEN_LEN || len > self.config.max_version_len {
            return false;
        }
        if !token.chars().any(|c| c.is_ascii_digit()) {
            return false;
        }
        if date_spans.iter().any(|&span| overlaps(span, (start, end))) {
            return false;
        }
        if has_size_unit(token, &text[end..]) {
            return false;
        }

        match shape {
            Some(shape) => shape.pattern.is_match(token) && (labeled || !looks_like_year(token)),
            None => labeled || is_plausible_bare(token),
        }
    }

    fn version_candidate(
        &self,
        fragment: &TextFragment,
        (start, end): (usize, usize),
        labeled: bool,
    ) -> Candidate {
        let text = fragment.text.as_str();
        let token = &text[start..end];

        let mut score = if labeled { LABELED_BASE } else { BARE_BASE };
        if is_distinctive(token) {
            score += 0.1;
        }
        if token.len() >= 4 {
            score += 0.05;
        }
        let mentions_bios = contains_any_word(text, &BIOS_WORDS);
        if mentions_bios {
            score += 0.1;
        } else if self.vocabulary.has_noise(text) {
            score -= NOISE_PENALTY;
        }
        if fragment.boilerplate {
            score -= BOILERPLATE_PENALTY;
        }

        let display = if contains_any_word(text, &BETA_WORDS) {
            format!("{} (Beta)", token)
        } else {
            token.to_string()
        };

        Candidate::version(token, display, fragment.position, (start, end))
            .with_confidence(score)
            .with_label(labeled)
    }

    fn apply_proximity(&self, versions: &mut [Candidate], dates: &mut [Candidate]) {
        let window = self.config.pair_window;
        let version_positions: Vec<usize> = versions.iter().map(|v| v.position).collect();
        let date_positions: Vec<usize> = dates.iter().map(|d| d.position).collect();

        for version in versions.iter_mut() {
            if date_positions
                .iter()
                .any(|&p| p.abs_diff(version.position) <= window)
            {
                version.confidence = (version.confidence + VERSION_NEAR_DATE_BOOST).min(1.0);
            }
        }
        for date in dates.iter_mut() {
            if version_positions
                .iter()
                .any(|&p| p.abs_diff(date.position) <= window)
            {
                date.confidence = (date.confidence + DATE_NEAR_VERSION_BOOST).min(1.0);
            }
        }
    }
}

/// Span of the first token when nothing alphanumeric precedes it.
fn leading_token(text: &str) -> Option<(usize, usize)> {
    let token = TOKEN_REGEX.find(text)?;
    if text[..token.start()].chars().any(char::is_alphanumeric) {
        return None;
    }
    Some((token.start(), token.end()))
}

/// Only dates, sizes or a beta marker follow the token at `end`.
fn stands_alone(text: &str, end: usize, date_spans: &[(usize, usize)]) -> bool {
    const TRAILERS: [&str; 6] = ["kb", "mb", "gb", "beta", "bios", "uefi"];

    TOKEN_REGEX.find_iter(&text[end..]).all(|word| {
        let span = (end + word.start(), end + word.end());
        let word = word.as_str();
        date_spans.iter().any(|&d| overlaps(d, span))
            || word.chars().all(|c| c.is_ascii_digit())
            || TRAILERS.contains(&word.to_ascii_lowercase().as_str())
            || has_size_unit(word, "")
    })
}

fn overlaps(a: (usize, usize), b: (usize, usize)) -> bool {
    a.0 < b.1 && b.0 < a.1
}

fn looks_like_year(token: &str) -> bool {
    token.len() == 4
        && token
            .parse::<u32>()
            .is_ok_and(|year| (1990..=2100).contains(&year))
}

/// `12MB`, or a token followed by ` KB`.
fn has_size_unit(token: &str, rest: &str) -> bool {
    const UNITS: [&str; 3] = ["kb", "mb", "gb"];

    let lower = token.to_ascii_lowercase();
    let suffixed = UNITS.iter().any(|unit| {
        lower
            .strip_suffix(unit)
            .is_some_and(|head| head.ends_with(|c: char| c.is_ascii_digit()))
    });
    if suffixed {
        return true;
    }

    let rest = rest.trim_start();
    match rest.get(..2) {
        Some(unit) if UNITS.contains(&unit.to_ascii_lowercase().as_str()) => {
            !rest[2..].starts_with(|c: char| c.is_alphanumeric())
        }
        _ => false,
    }
}

/// Bare tokens get stricter shape rules than labeled ones.
fn is_plausible_bare(token: &str) -> bool {
    if token.chars().all(|c| c.is_ascii_digit()) {
        return (3..=5).contains(&token.len()) && !looks_like_year(token);
    }

    let leading_letters = token
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .count();
    if leading_letters > 2 {
        return false;
    }
    longest_letter_run(token) <= 3
}

fn longest_letter_run(token: &str) -> usize {
    token
        .split(|c: char| !c.is_ascii_alphabetic())
        .map(str::len)
        .max()
        .unwrap_or(0)
}

fn is_distinctive(token: &str) -> bool {
    let punctuated = token.contains(['.', '-', '_']);
    let has_letter = token.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = token.chars().any(|c| c.is_ascii_digit());
    punctuated || (has_letter && has_digit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::candidate::CandidateKind;

    fn fragments(lines: &[&str]) -> Vec<TextFragment> {
        lines
            .iter()
            .enumerate()
            .map(|(i, line)| TextFragment::new(*line, i))
            .collect()
    }

    fn versions(candidates: &[Candidate]) -> Vec<&str> {
        candidates
            .iter()
            .filter(|c| c.kind == CandidateKind::Version)
            .map(|c| c.normalized_value.as_str())
            .collect()
    }

    fn dates(candidates: &[Candidate]) -> Vec<&str> {
        candidates
            .iter()
            .filter(|c| c.kind == CandidateKind::Date)
            .map(|c| c.normalized_value.as_str())
            .collect()
    }

    #[test]
    fn test_labeled_version_and_date() {
        let extractor = CandidateExtractor::default();
        let found = extractor.extract(&fragments(&["Version 1.20", "2023-04-11"]));

        assert_eq!(versions(&found), vec!["1.20"]);
        assert_eq!(dates(&found), vec!["2023-04-11"]);
        let version = found.iter().find(|c| c.is_version()).unwrap();
        assert!(version.labeled);
        assert!(version.confidence > 0.7);
    }

    #[test]
    fn test_table_column_of_bare_versions() {
        let extractor = CandidateExtractor::default();
        let found = extractor.extract(&fragments(&[
            "Version",
            "Date",
            "Description",
            "1.30",
            "2024/02/01",
            "Improve stability",
            "1.20",
            "2023/11/15",
            "Update AGESA 1.0.0.7",
            "1.10",
            "2023/06/01",
            "First release",
        ]));

        assert_eq!(versions(&found), vec!["1.30", "1.20", "1.10"]);
        assert_eq!(dates(&found).len(), 3);
    }

    #[test]
    fn test_description_cells_are_not_versions() {
        let extractor = CandidateExtractor::default();
        let found = extractor.extract(&fragments(&[
            "Version",
            "Date",
            "Description",
            "1.30",
            "2024/02/01",
            "9800X3D processor support",
            "1.20",
            "2023/11/15",
            "7800X3D processor support",
            "1.10 (Beta) 16 MB",
            "2023/06/01",
            "First release",
        ]));

        assert_eq!(versions(&found), vec!["1.30", "1.20", "1.10 (Beta)"]);
    }

    #[test]
    fn test_bare_tokens_need_an_anchor() {
        let extractor = CandidateExtractor::default();
        let found = extractor.extract(&fragments(&["1.20", "nothing", "else", "here"]));
        assert!(versions(&found).is_empty());
    }

    #[test]
    fn test_rejects_years_sizes_and_spec_sheet_tokens() {
        let extractor = CandidateExtractor::default();
        let found = extractor.extract(&fragments(&[
            "BIOS",
            "2023",
            "16 MB",
            "DDR5 support",
            "B650-PLUS",
            "12MB",
        ]));
        assert!(versions(&found).is_empty(), "{:?}", versions(&found));
    }

    #[test]
    fn test_token_overlapping_date_is_not_a_version() {
        let extractor = CandidateExtractor::default();
        let found = extractor.extract(&fragments(&["Release 2023-04-11"]));
        assert!(versions(&found).is_empty());
        assert_eq!(dates(&found), vec!["2023-04-11"]);
    }

    #[test]
    fn test_noise_fragments_sink() {
        let extractor = CandidateExtractor::default();
        let found = extractor.extract(&fragments(&[
            "Realtek Audio Driver Version 6.0.9",
            "BIOS Version 1.20",
        ]));
        assert_eq!(versions(&found), vec!["1.20"]);
    }

    #[test]
    fn test_boilerplate_fragments_sink() {
        let extractor = CandidateExtractor::default();
        let frags = vec![
            TextFragment::new("BIOS 9.99 promo", 0).with_boilerplate(true),
            TextFragment::new("BIOS Version 1.20", 1),
        ];
        let found = extractor.extract(&frags);
        assert_eq!(versions(&found), vec!["1.20"]);
    }

    #[test]
    fn test_beta_marker() {
        let extractor = CandidateExtractor::default();
        let found = extractor.extract(&fragments(&["BIOS Version 1.30 Beta"]));
        let version = found.iter().find(|c| c.is_version()).unwrap();
        assert_eq!(version.raw_text, "1.30");
        assert_eq!(version.normalized_value, "1.30 (Beta)");
    }

    #[test]
    fn test_ambiguous_date_marked_without_evidence() {
        let extractor = CandidateExtractor::default();
        let found = extractor.extract(&fragments(&["Version 1.20", "03/04/2023"]));
        let date = found.iter().find(|c| c.is_date()).unwrap();
        assert_eq!(date.normalized_value, "2023-03-04");
        assert!(date.ambiguous);
    }

    #[test]
    fn test_page_evidence_resolves_ambiguity() {
        let extractor = CandidateExtractor::default();
        let found = extractor.extract(&fragments(&[
            "Version 1.30",
            "25/12/2023",
            "Version 1.20",
            "03/04/2023",
        ]));
        let dates: Vec<&Candidate> = found.iter().filter(|c| c.is_date()).collect();
        assert_eq!(dates[1].normalized_value, "2023-04-03");
        assert!(!dates[1].ambiguous);
    }

    #[test]
    fn test_min_confidence_filters() {
        let extractor = CandidateExtractor::new(PipelineConfig::new().with_min_confidence(0.95));
        let found = extractor.extract(&fragments(&["Version 1.20"]));
        assert!(found.is_empty());
    }

    #[test]
    fn test_shaped_extraction() {
        let pattern = Regex::new(r"^F\d{1,3}[a-z]?$").unwrap();
        let extractor = CandidateExtractor::default();
        let shape = VersionShape {
            pattern: &pattern,
            require_anchor: false,
        };
        let found = extractor.extract_shaped(
            &fragments(&["F10a", "2024/01/02", "1.20", "F9", "2023/12/01"]),
            shape,
        );
        assert_eq!(versions(&found), vec!["F10a", "F9"]);
    }

    #[test]
    fn test_candidates_in_document_order() {
        let extractor = CandidateExtractor::default();
        let found = extractor.extract(&fragments(&["BIOS 1.20 2023-04-11", "BIOS 1.10 2023-01-02"]));
        let keys: Vec<(usize, usize)> = found.iter().map(Candidate::order_key).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(versions(&found), vec!["1.20", "1.10"]);
    }

    #[test]
    fn test_helpers() {
        assert!(looks_like_year("2023"));
        assert!(!looks_like_year("3802"));
        assert!(has_size_unit("16", " MB total"));
        assert!(!has_size_unit("16", " MBX"));
        assert!(has_size_unit("12MB", ""));
        assert!(is_plausible_bare("7D75v1P3"));
        assert!(is_plausible_bare("3802"));
        assert!(!is_plausible_bare("DDR5"));
        assert_eq!(leading_token("• 1.20 notes"), Some((4, 8)));
        assert_eq!(leading_token("Update 1.20"), Some((0, 6)));
        assert!(stands_alone("1.20 2023-04-11", 4, &[(5, 15)]));
        assert!(stands_alone("1.20 (Beta) 16 MB", 4, &[]));
        assert!(!stands_alone("9800X3D processor support", 7, &[]));
    }
}
