//! In-memory state backend for testing and dry runs.

use async_trait::async_trait;
use std::sync::RwLock;

use crate::error::StoreResult;
use crate::traits::store::StateBackend;
use crate::types::state::StateSnapshot;

/// Keeps the snapshot in memory. Data is lost on drop.
#[derive(Default)]
pub struct MemoryBackend {
    snapshot: RwLock<StateSnapshot>,
    saves: RwLock<usize>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend pre-seeded with state.
    pub fn with_snapshot(snapshot: StateSnapshot) -> Self {
        Self {
            snapshot: RwLock::new(snapshot),
            saves: RwLock::new(0),
        }
    }

    /// What a fresh `load` would return.
    pub fn stored(&self) -> StateSnapshot {
        self.snapshot.read().unwrap().clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        *self.saves.read().unwrap()
    }
}

#[async_trait]
impl StateBackend for MemoryBackend {
    async fn load(&self) -> StoreResult<StateSnapshot> {
        Ok(self.snapshot.read().unwrap().clone())
    }

    async fn save(&self, snapshot: &StateSnapshot) -> StoreResult<()> {
        *self.snapshot.write().unwrap() = snapshot.clone();
        *self.saves.write().unwrap() += 1;
        Ok(())
    }
}
