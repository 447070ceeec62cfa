//! Page source trait: the input boundary of the tracker.

use async_trait::async_trait;

use crate::error::FetchResult;
use crate::types::model::{PageContent, TrackedModel};

/// Fetches support page content for a tracked model.
///
/// Implementations own transport concerns (HTTP, rate limiting, caching).
/// Extraction never sees a `PageSource`, only the content it returned.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the page for one model.
    async fn fetch(&self, model: &TrackedModel) -> FetchResult<PageContent>;
}
