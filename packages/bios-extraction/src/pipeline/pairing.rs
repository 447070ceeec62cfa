//! Greedy proximity pairing of version and date candidates.

use tracing::debug;

use crate::types::candidate::{Candidate, ReleasePair};
use crate::types::config::PipelineConfig;

/// Associates each version candidate with at most one date candidate.
///
/// Versions are visited strongest first (ties in document order). Each takes
/// the nearest date still unclaimed within the window: fewest fragments away,
/// then fewest characters away within a fragment, then forward before
/// backward. A claimed date is never reused.
#[derive(Debug, Clone)]
pub struct CandidatePairer {
    window: usize,
}

impl Default for CandidatePairer {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

impl CandidatePairer {
    /// Pair within `window` fragments in either direction.
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.pair_window)
    }

    /// Pair candidates; output follows version document order.
    pub fn pair(&self, candidates: &[Candidate]) -> Vec<ReleasePair> {
        let versions: Vec<&Candidate> = candidates.iter().filter(|c| c.is_version()).collect();
        let dates: Vec<&Candidate> = candidates.iter().filter(|c| c.is_date()).collect();

        let mut visit: Vec<usize> = (0..versions.len()).collect();
        visit.sort_by(|&a, &b| {
            versions[b]
                .confidence
                .total_cmp(&versions[a].confidence)
                .then_with(|| versions[a].order_key().cmp(&versions[b].order_key()))
        });

        let mut claimed = vec![false; dates.len()];
        let mut assigned: Vec<Option<usize>> = vec![None; versions.len()];

        for v in visit {
            let version = versions[v];
            let nearest = dates
                .iter()
                .enumerate()
                .filter(|(d, date)| {
                    !claimed[*d] && date.position.abs_diff(version.position) <= self.window
                })
                .min_by_key(|(_, date)| proximity(version, date))
                .map(|(d, _)| d);

            if let Some(d) = nearest {
                claimed[d] = true;
                assigned[v] = Some(d);
            }
        }

        let mut pairs: Vec<ReleasePair> = versions
            .iter()
            .zip(assigned)
            .map(|(version, date)| ReleasePair {
                version: (*version).clone(),
                date: date.map(|d| dates[d].clone()),
            })
            .collect();
        pairs.sort_by_key(ReleasePair::order_key);

        debug!(
            pairs = pairs.len(),
            dated = pairs.iter().filter(|p| p.date.is_some()).count(),
            "Paired candidates"
        );
        pairs
    }
}

/// Sort key for "how near is this date to this version": smaller is nearer.
fn proximity(version: &Candidate, date: &Candidate) -> (usize, usize, u8, usize) {
    let distance = date.position.abs_diff(version.position);
    let forward = date.order_key() > version.order_key();

    if distance == 0 {
        let gap = if forward {
            date.offset.saturating_sub(version.end)
        } else {
            version.offset.saturating_sub(date.end)
        };
        (0, gap, u8::from(!forward), 0)
    } else if forward {
        (distance, 0, 0, date.offset)
    } else {
        // Later in a preceding fragment is nearer.
        (distance, 0, 1, usize::MAX - date.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn version(value: &str, position: usize, offset: usize, confidence: f32) -> Candidate {
        Candidate::version(value, value, position, (offset, offset + value.len()))
            .with_confidence(confidence)
    }

    fn date(y: i32, m: u32, d: u32, position: usize, offset: usize) -> Candidate {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        Candidate::date(date.to_string(), date, position, (offset, offset + 10))
            .with_confidence(0.7)
    }

    fn summary(pairs: &[ReleasePair]) -> Vec<(String, Option<String>)> {
        pairs
            .iter()
            .map(|p| {
                (
                    p.version.normalized_value.clone(),
                    p.date.as_ref().map(|d| d.normalized_value.clone()),
                )
            })
            .collect()
    }

    #[test]
    fn test_pairs_nearest_date() {
        let candidates = vec![
            version("1.30", 0, 0, 0.8),
            date(2024, 2, 1, 1, 0),
            version("1.20", 2, 0, 0.8),
            date(2023, 11, 15, 3, 0),
        ];
        let pairs = CandidatePairer::default().pair(&candidates);
        assert_eq!(
            summary(&pairs),
            vec![
                ("1.30".into(), Some("2024-02-01".into())),
                ("1.20".into(), Some("2023-11-15".into())),
            ]
        );
    }

    #[test]
    fn test_date_never_reused() {
        let candidates = vec![
            version("1.30", 0, 0, 0.9),
            version("1.20", 1, 0, 0.5),
            date(2024, 2, 1, 1, 10),
        ];
        let pairs = CandidatePairer::default().pair(&candidates);
        let dated: Vec<_> = pairs.iter().filter(|p| p.date.is_some()).collect();
        assert_eq!(dated.len(), 1);
        // 1.20 shares the fragment but 1.30 is stronger and claims first.
        assert_eq!(dated[0].version.normalized_value, "1.30");
    }

    #[test]
    fn test_same_fragment_beats_neighbour() {
        let candidates = vec![
            version("1.30", 0, 0, 0.9),
            date(2024, 2, 1, 0, 20),
            date(2024, 1, 1, 1, 0),
        ];
        let pairs = CandidatePairer::default().pair(&candidates);
        assert_eq!(pairs[0].date.as_ref().unwrap().normalized_value, "2024-02-01");
    }

    #[test]
    fn test_forward_preferred_on_tie() {
        let candidates = vec![
            date(2023, 1, 1, 0, 0),
            version("1.30", 1, 0, 0.9),
            date(2024, 1, 1, 2, 0),
        ];
        let pairs = CandidatePairer::default().pair(&candidates);
        assert_eq!(pairs[0].date.as_ref().unwrap().normalized_value, "2024-01-01");
    }

    #[test]
    fn test_window_bounds_search() {
        let candidates = vec![version("1.30", 0, 0, 0.9), date(2024, 1, 1, 4, 0)];
        let pairs = CandidatePairer::new(3).pair(&candidates);
        assert!(pairs[0].date.is_none());

        let pairs = CandidatePairer::new(4).pair(&candidates);
        assert!(pairs[0].date.is_some());
    }

    #[test]
    fn test_output_in_document_order() {
        let candidates = vec![
            version("1.30", 0, 0, 0.3),
            version("1.20", 5, 0, 0.9),
            version("1.10", 9, 0, 0.6),
        ];
        let pairs = CandidatePairer::default().pair(&candidates);
        let order: Vec<&str> = pairs
            .iter()
            .map(|p| p.version.normalized_value.as_str())
            .collect();
        assert_eq!(order, vec!["1.30", "1.20", "1.10"]);
        assert!(pairs.iter().all(|p| p.date.is_none()));
    }

    #[test]
    fn test_pair_confidence() {
        let pair = ReleasePair {
            version: version("1.30", 0, 0, 1.0),
            date: Some(date(2024, 1, 1, 0, 5)),
        };
        assert!((pair.confidence() - (0.7 + 0.3 * 0.7)).abs() < 1e-6);
    }
}
