//! JSON file state backend.
//!
//! The snapshot lives in one pretty-printed JSON object keyed by model
//! identity. Saves write a temp file in the same directory and rename it over
//! the target, so a crash mid-write leaves the previous state intact.

use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::store::StateBackend;
use crate::types::state::StateSnapshot;

/// State stored as a JSON document at `path`.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StateBackend for JsonFileBackend {
    async fn load(&self) -> StoreResult<StateSnapshot> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No state file yet");
                return Ok(StateSnapshot::new());
            }
            Err(e) => return Err(e.into()),
        };

        if raw.trim().is_empty() {
            return Ok(StateSnapshot::new());
        }

        // A corrupt file is an error, not an empty snapshot: treating it as
        // empty would re-announce every model and overwrite the history.
        let snapshot: StateSnapshot = serde_json::from_str(&raw)?;
        debug!(path = %self.path.display(), entries = snapshot.len(), "Loaded state");
        Ok(snapshot)
    }

    async fn save(&self, snapshot: &StateSnapshot) -> StoreResult<()> {
        let json = serde_json::to_vec_pretty(snapshot)?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || write_atomic(&path, &json))
            .await
            .map_err(|e| StoreError::Backend(format!("state writer panicked: {e}")))??;

        debug!(path = %self.path.display(), entries = snapshot.len(), "Saved state");
        Ok(())
    }
}

/// Replace `path` with `contents` through a temp file in the same directory,
/// creating parent directories as needed. Readers see the old file or the new
/// one, never a partial write.
pub fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
