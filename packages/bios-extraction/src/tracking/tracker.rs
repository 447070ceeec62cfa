//! Batch runs over tracked models.

use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::detect::ChangeEvent;
use super::store::StateStore;
use crate::error::{ExtractionError, StoreError};
use crate::pipeline::ReleasePipeline;
use crate::traits::source::PageSource;
use crate::traits::store::StateBackend;
use crate::types::model::TrackedModel;
use crate::types::result::ScrapeResult;

/// What happened to one model during a run.
#[derive(Debug)]
pub struct ModelOutcome {
    pub result: ScrapeResult,

    /// Set when the model's latest release changed (or was seen first) and
    /// the new state was persisted.
    pub event: Option<ChangeEvent>,

    /// Set when the state write for this model failed.
    pub commit_error: Option<StoreError>,
}

impl ModelOutcome {
    fn new(result: ScrapeResult) -> Self {
        Self {
            result,
            event: None,
            commit_error: None,
        }
    }

    fn cancelled(model: &TrackedModel) -> Self {
        Self::new(ScrapeResult::failed(model.clone(), ExtractionError::Cancelled))
    }
}

/// Runs fetch → extract → compare → commit for each model.
///
/// Models are independent: a fetch, extraction or persistence failure for one
/// never affects another, and every model yields exactly one outcome, in
/// input order.
#[derive(Debug, Clone)]
pub struct Tracker {
    pipeline: ReleasePipeline,
    concurrency: usize,
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new(ReleasePipeline::default())
    }
}

impl Tracker {
    pub fn new(pipeline: ReleasePipeline) -> Self {
        Self {
            pipeline,
            concurrency: 1,
        }
    }

    /// Process up to `n` models at once. Default: 1 (sequential).
    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    pub fn pipeline(&self) -> &ReleasePipeline {
        &self.pipeline
    }

    /// Process every model.
    ///
    /// Cancellation is checked before each model and while fetching; models
    /// not processed get a "run cancelled" result and no commit.
    pub async fn run<S, B>(
        &self,
        models: &[TrackedModel],
        source: &S,
        store: &StateStore<B>,
        cancel: &CancellationToken,
    ) -> Vec<ModelOutcome>
    where
        S: PageSource + ?Sized,
        B: StateBackend,
    {
        info!(
            models = models.len(),
            concurrency = self.concurrency,
            "Starting tracking run"
        );

        let outcomes: Vec<ModelOutcome> = if self.concurrency <= 1 {
            let mut outcomes = Vec::with_capacity(models.len());
            for model in models {
                outcomes.push(self.process(model, source, store, cancel).await);
            }
            outcomes
        } else {
            stream::iter(models)
                .map(|model| self.process(model, source, store, cancel))
                .buffered(self.concurrency)
                .collect()
                .await
        };

        let failed = outcomes.iter().filter(|o| !o.result.is_ok()).count();
        let changed = outcomes.iter().filter(|o| o.event.is_some()).count();
        info!(
            models = outcomes.len(),
            failed,
            changed,
            cancelled = cancel.is_cancelled(),
            "Tracking run finished"
        );
        outcomes
    }

    async fn process<S, B>(
        &self,
        model: &TrackedModel,
        source: &S,
        store: &StateStore<B>,
        cancel: &CancellationToken,
    ) -> ModelOutcome
    where
        S: PageSource + ?Sized,
        B: StateBackend,
    {
        if cancel.is_cancelled() {
            return ModelOutcome::cancelled(model);
        }

        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => return ModelOutcome::cancelled(model),
            fetched = source.fetch(model) => fetched,
        };

        let result = match fetched {
            Ok(page) => self.pipeline.run(model, &page),
            Err(e) => {
                warn!(model = %model.identity(), error = %e, "Fetch failed");
                ScrapeResult::failed(model.clone(), ExtractionError::FetchUnavailable(e))
            }
        };

        let mut outcome = ModelOutcome::new(result);
        match store.record(&outcome.result).await {
            Ok(event) => {
                if let Some(event) = &event {
                    debug!(
                        model = %model.identity(),
                        version = %event.new.version,
                        first_seen = event.is_first_seen(),
                        "Release change"
                    );
                }
                outcome.event = event;
            }
            Err(e) => outcome.commit_error = Some(e),
        }
        outcome
    }
}
