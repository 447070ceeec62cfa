//! Latest/previous selection from paired candidates.
//!
//! Vendor pages list newest releases first, so document order is the recency
//! signal. Version strings and dates are never compared for ordering: version
//! schemes differ per vendor and dates are often missing or ambiguous.

use std::collections::HashMap;

use crate::types::candidate::ReleasePair;
use crate::types::release::normalize_version;

/// The top two distinct releases on a page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RankedReleases {
    pub latest: Option<ReleasePair>,
    pub previous: Option<ReleasePair>,
}

/// Picks latest and previous from a pair sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReleaseRanker;

impl ReleaseRanker {
    pub fn new() -> Self {
        Self
    }

    /// Deduplicate by normalized version, then take the first two by
    /// position.
    pub fn rank(&self, pairs: Vec<ReleasePair>) -> RankedReleases {
        let mut distinct = self.dedupe(pairs).into_iter();
        RankedReleases {
            latest: distinct.next(),
            previous: distinct.next(),
        }
    }

    /// One pair per normalized version, in document order.
    ///
    /// Among duplicates the highest-confidence occurrence wins; equal
    /// confidence keeps the earliest.
    pub fn dedupe(&self, pairs: Vec<ReleasePair>) -> Vec<ReleasePair> {
        let mut best: HashMap<String, ReleasePair> = HashMap::new();
        for pair in pairs {
            let key = normalize_version(&pair.version.normalized_value);
            match best.get(&key) {
                Some(kept) if !replaces(&pair, kept) => {}
                _ => {
                    best.insert(key, pair);
                }
            }
        }

        let mut distinct: Vec<ReleasePair> = best.into_values().collect();
        distinct.sort_by_key(ReleasePair::order_key);
        distinct
    }
}

fn replaces(candidate: &ReleasePair, kept: &ReleasePair) -> bool {
    let (new, old) = (candidate.confidence(), kept.confidence());
    new > old || (new == old && candidate.order_key() < kept.order_key())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::candidate::Candidate;
    use chrono::NaiveDate;

    fn pair(version: &str, position: usize, confidence: f32, date: Option<(i32, u32, u32)>) -> ReleasePair {
        ReleasePair {
            version: Candidate::version(version, version, position, (0, version.len()))
                .with_confidence(confidence),
            date: date.map(|(y, m, d)| {
                let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
                Candidate::date(date.to_string(), date, position + 1, (0, 10)).with_confidence(0.7)
            }),
        }
    }

    #[test]
    fn test_first_two_by_position() {
        let ranked = ReleaseRanker::new().rank(vec![
            pair("v3", 0, 0.5, None),
            pair("v2", 2, 0.9, None),
            pair("v1", 4, 0.9, None),
        ]);
        assert_eq!(ranked.latest.unwrap().version.normalized_value, "v3");
        assert_eq!(ranked.previous.unwrap().version.normalized_value, "v2");
    }

    #[test]
    fn test_never_sorts_by_date_or_version() {
        let ranked = ReleaseRanker::new().rank(vec![
            pair("1.10", 0, 0.8, Some((2020, 1, 1))),
            pair("2.00", 2, 0.8, Some((2024, 1, 1))),
        ]);
        assert_eq!(ranked.latest.unwrap().version.normalized_value, "1.10");
    }

    #[test]
    fn test_duplicates_keep_strongest_occurrence() {
        let ranked = ReleaseRanker::new().rank(vec![
            pair("F10", 0, 0.4, None),
            pair("F9", 3, 0.8, Some((2023, 12, 1))),
            pair("f10", 6, 0.9, Some((2024, 1, 2))),
        ]);
        let latest = ranked.latest.unwrap();
        let previous = ranked.previous.unwrap();

        // The stronger F10 sits after F9, so it moves behind it.
        assert_eq!(latest.version.normalized_value, "F9");
        assert_eq!(previous.version.normalized_value, "f10");
        assert!(previous.date.is_some());
    }

    #[test]
    fn test_equal_confidence_keeps_earliest() {
        let distinct = ReleaseRanker::new().dedupe(vec![
            pair("1.20", 0, 0.8, None),
            pair("v1.20", 5, 0.8, None),
        ]);
        assert_eq!(distinct.len(), 1);
        assert_eq!(distinct[0].version.position, 0);
    }

    #[test]
    fn test_fewer_than_two() {
        let ranked = ReleaseRanker::new().rank(vec![pair("1.20", 0, 0.8, None)]);
        assert!(ranked.latest.is_some());
        assert!(ranked.previous.is_none());

        assert_eq!(ReleaseRanker::new().rank(Vec::new()), RankedReleases::default());
    }
}
