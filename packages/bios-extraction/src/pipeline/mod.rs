//! Extraction pipeline - turns a support page into release records.
//!
//! Stages:
//! - Normalization (markup → ordered text fragments)
//! - Candidate extraction (version and date tokens with confidence)
//! - Pairing (each version with its nearest date)
//! - Ranking (latest and previous by document order)

pub mod candidates;
pub mod dates;
pub mod extract;
pub mod normalize;
pub mod pairing;
pub mod rank;
pub mod vocabulary;

pub use candidates::{CandidateExtractor, VersionShape};
pub use dates::{find_dates, infer_order, parse_date, DateMatch, DateShape};
pub use extract::ReleasePipeline;
pub use normalize::TextNormalizer;
pub use pairing::CandidatePairer;
pub use rank::{RankedReleases, ReleaseRanker};
pub use vocabulary::LabelVocabulary;
