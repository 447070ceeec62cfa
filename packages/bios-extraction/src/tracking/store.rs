//! Persisted tracking state with per-model commits.

use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::detect::{ChangeDetector, ChangeEvent};
use crate::error::{StoreError, StoreResult};
use crate::traits::store::StateBackend;
use crate::types::model::TrackedModel;
use crate::types::release::ReleaseRecord;
use crate::types::result::ScrapeResult;
use crate::types::state::StateSnapshot;

/// Last known latest release per model, backed by a [`StateBackend`].
///
/// The snapshot is loaded once in [`open`](Self::open). Every commit is a
/// read-modify-write of the whole snapshot under one lock: the in-memory
/// copy only changes after the backend accepted the new snapshot, so a
/// failed write for one model leaves every other model's state untouched.
pub struct StateStore<B: StateBackend> {
    backend: B,
    snapshot: Mutex<StateSnapshot>,
    detector: ChangeDetector,
}

impl<B: StateBackend> StateStore<B> {
    /// Load state from `backend`.
    pub async fn open(backend: B) -> StoreResult<Self> {
        let snapshot = backend.load().await?;
        debug!(entries = snapshot.len(), "Opened state store");
        Ok(Self {
            backend,
            snapshot: Mutex::new(snapshot),
            detector: ChangeDetector::new(),
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> StateSnapshot {
        self.snapshot.lock().await.clone()
    }

    /// Last known latest release for a model.
    pub async fn get(&self, model: &TrackedModel) -> Option<ReleaseRecord> {
        self.snapshot.lock().await.latest(&model.identity()).cloned()
    }

    /// Would committing `new_latest` be a change?
    pub async fn compare(
        &self,
        model: &TrackedModel,
        new_latest: Option<&ReleaseRecord>,
    ) -> Option<ChangeEvent> {
        let snapshot = self.snapshot.lock().await;
        self.detector
            .detect(model, snapshot.latest(&model.identity()), new_latest)
    }

    /// Persist `new_latest` as the model's latest release.
    ///
    /// `None` records the model as tracked without touching a release that
    /// was stored earlier.
    pub async fn commit(
        &self,
        model: &TrackedModel,
        new_latest: Option<ReleaseRecord>,
    ) -> StoreResult<()> {
        let mut snapshot = self.snapshot.lock().await;
        self.commit_locked(&mut snapshot, model, new_latest).await
    }

    /// Compare and commit one extraction result.
    ///
    /// Results carrying an error are skipped so a failed scrape never erases
    /// known state. Returns the change event, if any, once it is persisted.
    pub async fn record(&self, result: &ScrapeResult) -> StoreResult<Option<ChangeEvent>> {
        if let Some(error) = result.error() {
            debug!(model = %result.model().identity(), error, "Skipping commit for failed result");
            return Ok(None);
        }

        let model = result.model();
        let mut snapshot = self.snapshot.lock().await;
        let event = self
            .detector
            .detect(model, snapshot.latest(&model.identity()), result.latest());

        self.commit_locked(&mut snapshot, model, result.latest().cloned())
            .await?;
        Ok(event)
    }

    async fn commit_locked(
        &self,
        snapshot: &mut StateSnapshot,
        model: &TrackedModel,
        new_latest: Option<ReleaseRecord>,
    ) -> StoreResult<()> {
        let identity = model.identity();
        let mut next = snapshot.clone();
        match new_latest {
            Some(record) => {
                next.insert(identity.clone(), Some(record));
            }
            None if !next.contains(&identity) => {
                next.insert(identity.clone(), None);
            }
            None => return Ok(()),
        }

        if let Err(e) = self.backend.save(&next).await {
            warn!(model = %identity, error = %e, "Failed to persist state");
            return Err(StoreError::PersistenceWriteConflict {
                identity,
                reason: e.to_string(),
            });
        }

        *snapshot = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::MemoryBackend;
    use crate::testing::FailingBackend;

    fn model(name: &str) -> TrackedModel {
        TrackedModel::new(name, "msi", format!("https://msi.example/{name}"))
    }

    #[tokio::test]
    async fn test_record_first_seen_then_unchanged() {
        let store = StateStore::open(MemoryBackend::new()).await.unwrap();
        let result = ScrapeResult::found(model("B650"), ReleaseRecord::new("7D75v1P3"), None);

        let first = store.record(&result).await.unwrap();
        assert!(first.unwrap().is_first_seen());

        let second = store.record(&result).await.unwrap();
        assert!(second.is_none());
        assert_eq!(store.backend().save_count(), 2);
    }

    #[tokio::test]
    async fn test_errored_result_leaves_state() {
        let store = StateStore::open(MemoryBackend::new()).await.unwrap();
        store
            .commit(&model("B650"), Some(ReleaseRecord::new("7D75v1P2")))
            .await
            .unwrap();
        let before = store.snapshot().await;

        let failed = ScrapeResult::failed(model("B650"), "HTTP 503");
        assert!(store.record(&failed).await.unwrap().is_none());
        assert_eq!(store.snapshot().await, before);
        assert_eq!(store.backend().save_count(), 1);
    }

    #[tokio::test]
    async fn test_commit_none_keeps_known_release() {
        let store = StateStore::open(MemoryBackend::new()).await.unwrap();
        store
            .commit(&model("B650"), Some(ReleaseRecord::new("7D75v1P2")))
            .await
            .unwrap();
        store.commit(&model("B650"), None).await.unwrap();
        assert_eq!(
            store.get(&model("B650")).await,
            Some(ReleaseRecord::new("7D75v1P2"))
        );

        store.commit(&model("X670"), None).await.unwrap();
        assert!(store.snapshot().await.contains("msi/X670"));
    }

    #[tokio::test]
    async fn test_failed_save_leaves_memory_unchanged() {
        let store = StateStore::open(FailingBackend::new()).await.unwrap();
        let err = store
            .commit(&model("B650"), Some(ReleaseRecord::new("7D75v1P3")))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            StoreError::PersistenceWriteConflict { ref identity, .. } if identity == "msi/B650"
        ));
        assert!(store.snapshot().await.is_empty());
        assert!(store
            .compare(&model("B650"), Some(&ReleaseRecord::new("7D75v1P3")))
            .await
            .is_some());
    }

    #[tokio::test]
    async fn test_compare_does_not_write() {
        let store = StateStore::open(MemoryBackend::new()).await.unwrap();
        let record = ReleaseRecord::new("1.0");
        assert!(store.compare(&model("B650"), Some(&record)).await.is_some());
        assert!(store.snapshot().await.is_empty());
        assert_eq!(store.backend().save_count(), 0);
    }
}
