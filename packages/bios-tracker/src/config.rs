//! Board list configuration (YAML).
//!
//! ```yaml
//! settings:
//!   min_delay_ms: 1000
//!   concurrency: 2
//! boards:
//!   - name: B650 AORUS ELITE AX
//!     vendor: gigabyte
//!     url: https://www.gigabyte.com/Motherboard/B650-AORUS-ELITE-AX-rev-10/support#support-dl-bios
//!     selectors: ["#support-dl-bios"]   # optional, tried before vendor regions
//! ```

use bios_extraction::TrackedModel;
use serde::Deserialize;
use std::path::Path;

use crate::error::{Result, TrackerError};

/// Parsed board config file.
#[derive(Debug, Clone, Deserialize)]
pub struct BoardsFile {
    pub boards: Vec<TrackedModel>,

    #[serde(default)]
    pub settings: Settings,
}

/// Optional run settings. CLI flags take precedence.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Minimum delay between requests to the same host
    pub min_delay_ms: Option<u64>,

    /// Models processed at once
    pub concurrency: Option<usize>,

    /// User-Agent header for page fetches
    pub user_agent: Option<String>,
}

impl BoardsFile {
    /// Read and parse a board config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| TrackerError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file = Self::parse(&raw).map_err(|source| TrackerError::Config {
            path: path.to_path_buf(),
            source,
        })?;

        if file.boards.is_empty() {
            return Err(TrackerError::NoBoards {
                path: path.to_path_buf(),
            });
        }
        Ok(file)
    }

    pub fn parse(raw: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(raw)
    }

    /// Boards for one vendor only (case-insensitive), or all of them.
    pub fn select(&self, vendor: Option<&str>) -> Vec<TrackedModel> {
        match vendor {
            Some(vendor) => {
                let vendor = vendor.trim().to_lowercase();
                self.boards
                    .iter()
                    .filter(|b| b.vendor.trim().to_lowercase() == vendor)
                    .cloned()
                    .collect()
            }
            None => self.boards.clone(),
        }
    }
}
