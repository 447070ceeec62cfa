//! Heuristic vocabulary: label words that boost nearby tokens and noise words
//! that sink them.

use lazy_static::lazy_static;
use regex::Regex;

/// Labels that introduce a version token, longest first so multi-word labels
/// win the alternation.
pub const DEFAULT_VERSION_LABELS: &[&str] = &[
    "bios version",
    "uefi version",
    "firmware version",
    "version",
    "ver.",
    "ver",
    "bios",
    "uefi",
    "firmware",
    "release",
];

/// Labels that introduce a date token.
pub const DEFAULT_DATE_LABELS: &[&str] = &[
    "release date",
    "released",
    "date",
    "updated",
    "published",
    "posted",
];

/// Words that mark a fragment as being about something other than BIOS
/// releases (driver tables, utilities, spec sheets).
pub const DEFAULT_NOISE_WORDS: &[&str] = &[
    "driver",
    "drivers",
    "utility",
    "audio",
    "realtek",
    "lan",
    "chipset",
    "graphics",
    "vga",
    "raid",
    "sata",
    "wireless",
    "wifi",
    "bluetooth",
    "intel me",
    "management engine",
    "manual",
    "windows",
];

/// Plain-text lines containing any of these are navigation or legal chrome.
pub const BOILERPLATE_PHRASES: &[&str] = &[
    "cookie",
    "privacy policy",
    "terms of use",
    "all rights reserved",
    "copyright",
    "©",
    "sign in",
    "log in",
    "subscribe",
    "newsletter",
];

lazy_static! {
    static ref DEFAULT_LABEL_PATTERN: Regex = build_label_pattern(DEFAULT_VERSION_LABELS)
        .expect("default version labels are escaped");
}

/// The label vocabulary used by the candidate extractor.
#[derive(Debug, Clone)]
pub struct LabelVocabulary {
    version_labels: Vec<String>,
    date_labels: Vec<String>,
    noise_words: Vec<String>,
    label_pattern: Regex,
}

impl Default for LabelVocabulary {
    fn default() -> Self {
        Self {
            version_labels: to_owned(DEFAULT_VERSION_LABELS),
            date_labels: to_owned(DEFAULT_DATE_LABELS),
            noise_words: to_owned(DEFAULT_NOISE_WORDS),
            label_pattern: DEFAULT_LABEL_PATTERN.clone(),
        }
    }
}

impl LabelVocabulary {
    /// Build a vocabulary with custom version labels and default date/noise words.
    pub fn with_version_labels<I, S>(labels: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut version_labels: Vec<String> = labels
            .into_iter()
            .map(|l| l.into().trim().to_lowercase())
            .filter(|l| !l.is_empty())
            .collect();
        // Longest first so "bios version" beats "bios".
        version_labels.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        version_labels.dedup();

        let refs: Vec<&str> = version_labels.iter().map(String::as_str).collect();
        let label_pattern = build_label_pattern(&refs)?;

        Ok(Self {
            version_labels,
            label_pattern,
            ..Self::default()
        })
    }

    /// Add extra noise words.
    pub fn with_noise_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.noise_words
            .extend(words.into_iter().map(|w| w.into().to_lowercase()));
        self
    }

    /// Regex matching `<label> [:#-] <token>`, with the token in group `token`.
    pub fn label_pattern(&self) -> &Regex {
        &self.label_pattern
    }

    pub fn version_labels(&self) -> &[String] {
        &self.version_labels
    }

    /// Fragment mentions any version label as a whole word.
    pub fn has_version_label(&self, text: &str) -> bool {
        contains_any_word(text, &self.version_labels)
    }

    /// Fragment mentions any date label as a whole word.
    pub fn has_date_label(&self, text: &str) -> bool {
        contains_any_word(text, &self.date_labels)
    }

    /// Fragment mentions a noise word.
    pub fn has_noise(&self, text: &str) -> bool {
        contains_any_word(text, &self.noise_words)
    }
}

/// Case-insensitive whole-word (or whole-phrase) containment.
pub fn contains_any_word(text: &str, words: &[String]) -> bool {
    let haystack = format!(" {} ", normalize_words(text));
    words.iter().any(|w| {
        let needle = normalize_words(w);
        !needle.is_empty() && haystack.contains(&format!(" {} ", needle))
    })
}

/// Plain-text line looks like legal/navigation chrome.
pub fn is_boilerplate_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    BOILERPLATE_PHRASES.iter().any(|p| lower.contains(p))
}

/// Lowercase, replace punctuation (except `.` inside words) with spaces and
/// collapse runs of whitespace.
fn normalize_words(text: &str) -> String {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '.'))
        .map(|w| w.trim_matches('.'))
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn build_label_pattern(labels: &[&str]) -> Result<Regex, regex::Error> {
    let alternation = labels
        .iter()
        .map(|l| {
            l.split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(
        r"(?i)\b(?:{})(?:\s*[:#\-]\s*|\s+)(?P<token>[A-Za-z0-9]+(?:[._\-][A-Za-z0-9]+)*)",
        alternation
    ))
}

fn to_owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token<'a>(vocab: &LabelVocabulary, text: &'a str) -> Option<&'a str> {
        vocab
            .label_pattern()
            .captures(text)
            .and_then(|c| c.name("token"))
            .map(|m| m.as_str())
    }

    #[test]
    fn test_label_pattern_captures_token() {
        let vocab = LabelVocabulary::default();
        assert_eq!(token(&vocab, "BIOS Version 1.20"), Some("1.20"));
        assert_eq!(token(&vocab, "Version: F10a"), Some("F10a"));
        assert_eq!(token(&vocab, "ver. 3.10A released"), Some("3.10A"));
        assert_eq!(token(&vocab, "Firmware - v2.1.0"), Some("v2.1.0"));
        assert_eq!(token(&vocab, "nothing here"), None);
    }

    #[test]
    fn test_label_requires_word_boundary() {
        let vocab = LabelVocabulary::default();
        assert_eq!(token(&vocab, "subversion 12"), None);
    }

    #[test]
    fn test_word_containment() {
        let vocab = LabelVocabulary::default();
        assert!(vocab.has_version_label("Latest BIOS"));
        assert!(!vocab.has_version_label("biosphere"));
        assert!(vocab.has_noise("Realtek Audio Driver"));
        assert!(vocab.has_noise("Intel ME firmware"));
        assert!(!vocab.has_noise("Plan B"));
        assert!(vocab.has_date_label("Release Date"));
    }

    #[test]
    fn test_custom_labels() {
        let vocab = LabelVocabulary::with_version_labels(["Revision", "bios revision"]).unwrap();
        assert_eq!(token(&vocab, "BIOS Revision 0805"), Some("0805"));
        assert_eq!(vocab.version_labels()[0], "bios revision");
    }

    #[test]
    fn test_boilerplate_lines() {
        assert!(is_boilerplate_line("© 2025 Example Corp. All rights reserved."));
        assert!(is_boilerplate_line("We use cookies"));
        assert!(!is_boilerplate_line("Version 1.20"));
    }
}
