//! Error types for the tracker binary's building blocks.

use std::path::PathBuf;
use thiserror::Error;

/// Errors loading configuration, delivering notifications or writing reports.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid board config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("board config {path} lists no boards")]
    NoBoards { path: PathBuf },

    #[error("webhook delivery failed: {0}")]
    Webhook(#[from] reqwest::Error),

    #[error("failed to write report: {0}")]
    Export(#[from] std::io::Error),

    #[error("failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result type alias for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;
