//! Typed errors for the extraction library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling. None of these ever cross the
//! per-model boundary: the pipeline and tracker fold them into
//! `ScrapeResult.error` or a per-model outcome.

use thiserror::Error;

/// Errors that can occur while turning a page into release records.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The page could not be fetched; treated as "no content".
    #[error("page unavailable: {0}")]
    FetchUnavailable(#[from] FetchError),

    /// Extraction produced zero usable version candidates.
    #[error("no BIOS version candidates found")]
    NoCandidatesFound,

    /// The run was cancelled before this model was processed.
    #[error("run cancelled")]
    Cancelled,
}

/// Errors raised by a `PageSource` implementation.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Server answered with a non-success status
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// Invalid URL format
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// Connection timeout
    #[error("timeout fetching: {url}")]
    Timeout { url: String },

    /// No content registered for this model (test sources)
    #[error("no content for: {url}")]
    NotFound { url: String },
}

/// Errors raised by the state persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed
    #[error("state I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted state could not be encoded or decoded
    #[error("state JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Backend-specific failure
    #[error("state backend error: {0}")]
    Backend(String),

    /// A commit for one model could not be written; other models are unaffected.
    #[error("failed to persist state for {identity}: {reason}")]
    PersistenceWriteConflict { identity: String, reason: String },
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for state operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
