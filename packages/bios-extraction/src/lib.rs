//! BIOS Release Extraction Library
//!
//! Finds the latest and previous BIOS releases on a motherboard vendor's
//! support page and tracks changes across runs.
//!
//! # Design Philosophy
//!
//! **"Heuristics in, records out"**
//!
//! - Extraction is a pure function of already-fetched page content
//! - Every candidate carries an explicit confidence score
//! - Document order is the recency signal; versions and dates are never sorted
//! - Vendor overrides narrow the search, the generic path is always the floor
//! - Failures are per model and encoded in the result, never raised past it
//!
//! # Usage
//!
//! ```rust,ignore
//! use bios_extraction::{ReleasePipeline, PageContent, TrackedModel};
//! use bios_extraction::{StateStore, JsonFileBackend};
//!
//! let model = TrackedModel::new("B650 AORUS ELITE AX", "gigabyte", url);
//! let result = ReleasePipeline::default().run(&model, &PageContent::detect(html));
//!
//! let store = StateStore::open(JsonFileBackend::new("state.json")).await?;
//! if let Some(event) = store.record(&result).await? {
//!     println!("new BIOS {} for {}", event.new.version, model.name);
//! }
//! ```
//!
//! # Modules
//!
//! - [`types`] - Tracked models, candidates, release records, results
//! - [`pipeline`] - Normalization, candidate extraction, pairing, ranking
//! - [`vendors`] - Per-vendor heuristic overrides and their registry
//! - [`traits`] - `PageSource` and `StateBackend` abstractions
//! - [`stores`] - State backends (memory, JSON file)
//! - [`tracking`] - State store, change detection, batch tracker
//! - [`testing`] - Mock implementations for testing

pub mod error;
pub mod pipeline;
pub mod stores;
pub mod testing;
pub mod tracking;
pub mod traits;
pub mod types;
pub mod vendors;

// Re-export core types at crate root
pub use error::{ExtractionError, FetchError, FetchResult, Result, StoreError, StoreResult};
pub use pipeline::{
    CandidateExtractor, CandidatePairer, LabelVocabulary, RankedReleases, ReleasePipeline,
    ReleaseRanker, TextNormalizer,
};
pub use stores::{write_atomic, JsonFileBackend, MemoryBackend};
pub use tracking::{
    ChangeDetector, ChangeEvent, ChangeNotification, ModelOutcome, StateStore, Tracker,
};
pub use traits::{source::PageSource, store::StateBackend};
pub use types::{
    candidate::{Candidate, CandidateKind, ReleasePair, TextFragment},
    config::{DateOrder, PipelineConfig},
    model::{PageContent, TrackedModel},
    release::{normalize_version, ReleaseRecord},
    result::{ExtractionWarning, ReleaseReport, ReportDocument, ScrapeResult},
    state::StateSnapshot,
};
pub use vendors::{GenericHeuristic, VendorHeuristic, VendorRegistry};
