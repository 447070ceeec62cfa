//! State persistence trait.

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::types::state::StateSnapshot;

/// Durable storage for the tracking snapshot.
///
/// The whole snapshot is read once per run and written back whole on each
/// commit. `save` must either persist the full snapshot or leave the previous
/// one intact.
#[async_trait]
pub trait StateBackend: Send + Sync {
    /// Load the persisted snapshot. Missing state is an empty snapshot.
    async fn load(&self) -> StoreResult<StateSnapshot>;

    /// Replace the persisted snapshot.
    async fn save(&self, snapshot: &StateSnapshot) -> StoreResult<()>;
}
