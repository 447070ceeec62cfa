//! Change notifications.

use async_trait::async_trait;
use bios_extraction::{ChangeEvent, ScrapeResult};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{info, warn};

use crate::error::Result;

/// Delivers a formatted message somewhere.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &str) -> Result<()>;
}

/// Message announcing a new latest release.
pub fn format_change(event: &ChangeEvent) -> String {
    let mut msg = format!(
        "🧪 BIOS update detected for **{}** ({})\n- Version: `{}`",
        event.model.name, event.model.vendor, event.new.version
    );
    if let Some(old) = &event.old {
        msg.push_str(&format!(" (prev `{}`)", old.version));
    }
    if let Some(date) = event.new.date_string() {
        msg.push_str(&format!("\n- Release date: {date}"));
    }
    msg.push_str(&format!("\n- Page: {}", event.model.url));
    msg
}

/// Message reporting a model that could not be scraped.
pub fn format_error(result: &ScrapeResult) -> Option<String> {
    let error = result.error()?;
    let model = result.model();
    Some(format!("[ERROR] {} ({}): {}", model.name, model.vendor, error))
}

/// Writes messages to the log. Used when no webhook is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, message: &str) -> Result<()> {
        info!(%message, "Notification (no webhook configured)");
        Ok(())
    }
}

/// Posts `{"content": message}` to a chat webhook.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(20))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, message: &str) -> Result<()> {
        self.client
            .post(&self.url)
            .json(&serde_json::json!({ "content": message }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Collects messages in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: &str) -> Result<()> {
        self.sent.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

/// Send every message; a failed delivery is logged and does not stop the rest.
///
/// Returns how many were delivered.
pub async fn deliver_all(notifier: &dyn Notifier, messages: &[String]) -> usize {
    let mut delivered = 0;
    for message in messages {
        match notifier.send(message).await {
            Ok(()) => delivered += 1,
            Err(e) => warn!(error = %e, "Failed to deliver notification"),
        }
    }
    delivered
}
