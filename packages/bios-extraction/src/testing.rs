//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the extraction library
//! without network access or a writable disk.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::error::{FetchError, FetchResult, StoreError, StoreResult};
use crate::stores::MemoryBackend;
use crate::traits::source::PageSource;
use crate::traits::store::StateBackend;
use crate::types::model::{PageContent, TrackedModel};
use crate::types::state::StateSnapshot;

/// A page source serving canned content by URL.
///
/// Unknown URLs fail with [`FetchError::NotFound`]; URLs registered with
/// [`fail_url`](Self::fail_url) fail with a 503.
#[derive(Default, Clone)]
pub struct StaticPageSource {
    /// Canned pages indexed by URL
    pages: Arc<RwLock<HashMap<String, PageContent>>>,

    /// URLs that always fail
    failing: Arc<RwLock<HashSet<String>>>,

    /// Requested URLs in call order
    calls: Arc<RwLock<Vec<String>>>,
}

impl StaticPageSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `content` for `url` (builder pattern).
    pub fn with_page(self, url: impl Into<String>, content: PageContent) -> Self {
        self.pages.write().unwrap().insert(url.into(), content);
        self
    }

    /// Serve HTML for `url`.
    pub fn with_html(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.with_page(url, PageContent::Html(html.into()))
    }

    /// Serve plain text for `url`.
    pub fn with_text(self, url: impl Into<String>, text: impl Into<String>) -> Self {
        self.with_page(url, PageContent::Text(text.into()))
    }

    /// Make `url` fail.
    pub fn fail_url(self, url: impl Into<String>) -> Self {
        self.failing.write().unwrap().insert(url.into());
        self
    }

    /// URLs requested so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl PageSource for StaticPageSource {
    async fn fetch(&self, model: &TrackedModel) -> FetchResult<PageContent> {
        self.calls.write().unwrap().push(model.url.clone());

        if self.failing.read().unwrap().contains(&model.url) {
            return Err(FetchError::Status {
                url: model.url.clone(),
                status: 503,
            });
        }

        self.pages
            .read()
            .unwrap()
            .get(&model.url)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                url: model.url.clone(),
            })
    }
}

/// A state backend whose saves fail.
///
/// By default every save fails. With [`fail_for`](Self::fail_for) only
/// snapshots containing one of the given identities are rejected, which
/// simulates a write conflict for specific models.
#[derive(Default)]
pub struct FailingBackend {
    inner: MemoryBackend,
    fail_for: HashSet<String>,
}

impl FailingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing state.
    pub fn with_snapshot(snapshot: StateSnapshot) -> Self {
        Self {
            inner: MemoryBackend::with_snapshot(snapshot),
            fail_for: HashSet::new(),
        }
    }

    /// Only reject snapshots that contain `identity`.
    pub fn fail_for(mut self, identity: impl Into<String>) -> Self {
        self.fail_for.insert(identity.into());
        self
    }

    /// What a fresh `load` would return.
    pub fn stored(&self) -> StateSnapshot {
        self.inner.stored()
    }
}

#[async_trait]
impl StateBackend for FailingBackend {
    async fn load(&self) -> StoreResult<StateSnapshot> {
        self.inner.load().await
    }

    async fn save(&self, snapshot: &StateSnapshot) -> StoreResult<()> {
        let rejected = self.fail_for.is_empty()
            || self.fail_for.iter().any(|id| snapshot.contains(id));
        if rejected {
            return Err(StoreError::Backend("simulated write failure".into()));
        }
        self.inner.save(snapshot).await
    }
}
