//! HTTP page source with per-host throttling.

use async_trait::async_trait;
use bios_extraction::{FetchError, FetchResult, PageContent, PageSource, TrackedModel};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; bios-tracker/0.1)";

/// Fetches support pages over HTTP.
///
/// Requests to the same host are spaced at least `min_delay` apart; different
/// hosts do not wait on each other.
///
/// # Example
///
/// ```rust,ignore
/// let source = HttpPageSource::new(Duration::from_millis(800))?
///     .with_user_agent("my-tracker/1.0")?;
/// let page = source.fetch(&model).await?;
/// ```
pub struct HttpPageSource {
    client: reqwest::Client,
    timeout: Duration,
    limiter: Option<Arc<DefaultKeyedRateLimiter<String>>>,
}

impl HttpPageSource {
    /// Create a source with the default user agent and a 45 second timeout.
    ///
    /// A zero `min_delay` disables throttling.
    pub fn new(min_delay: Duration) -> FetchResult<Self> {
        let timeout = Duration::from_secs(45);
        Ok(Self {
            client: build_client(DEFAULT_USER_AGENT, timeout)?,
            timeout,
            limiter: Quota::with_period(min_delay).map(|q| Arc::new(RateLimiter::keyed(q))),
        })
    }

    /// Rebuild the client with a custom user agent.
    pub fn with_user_agent(mut self, user_agent: &str) -> FetchResult<Self> {
        self.client = build_client(user_agent, self.timeout)?;
        Ok(self)
    }

    async fn throttle(&self, host: &str) {
        if let Some(limiter) = &self.limiter {
            limiter.until_key_ready(&host.to_string()).await;
        }
    }
}

fn build_client(user_agent: &str, timeout: Duration) -> FetchResult<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
        .map_err(|e| FetchError::Http(Box::new(e)))
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch(&self, model: &TrackedModel) -> FetchResult<PageContent> {
        let url = Url::parse(&model.url).map_err(|_| FetchError::InvalidUrl {
            url: model.url.clone(),
        })?;
        let host = url.host_str().ok_or_else(|| FetchError::InvalidUrl {
            url: model.url.clone(),
        })?;

        self.throttle(host).await;
        debug!(model = %model.identity(), url = %url, "Fetching support page");

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "HTTP request failed");
            classify(&model.url, e)
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: model.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| classify(&model.url, e))?;
        debug!(model = %model.identity(), bytes = body.len(), "Fetched support page");
        Ok(PageContent::detect(body))
    }
}

fn classify(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Http(Box::new(error))
    }
}
