//! One tracking run: load boards, scrape, record changes, notify, export.

use anyhow::{Context, Result};
use bios_extraction::{
    DateOrder, JsonFileBackend, MemoryBackend, ModelOutcome, PageSource, PipelineConfig,
    ReleasePipeline, StateBackend, StateStore, Tracker,
};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cli::Args;
use crate::config::BoardsFile;
use crate::export::write_report;
use crate::fetch::HttpPageSource;
use crate::notify::{deliver_all, format_change, format_error, LogNotifier, Notifier, WebhookNotifier};

pub const DEFAULT_MIN_DELAY_MS: u64 = 800;

/// Result of a run, for the summary printout.
#[derive(Debug)]
pub struct RunSummary {
    pub outcomes: Vec<ModelOutcome>,
    pub notifications: usize,
    pub dry_run: bool,
}

impl RunSummary {
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.result.is_ok()).count()
    }

    pub fn changed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.event.is_some()).count()
    }

    pub fn commit_failures(&self) -> usize {
        self.outcomes.iter().filter(|o| o.commit_error.is_some()).count()
    }
}

/// Run the tracker as configured by `args`.
pub async fn run(args: &Args, cancel: CancellationToken) -> Result<RunSummary> {
    let boards = BoardsFile::load(&args.config)?;
    let models = boards.select(args.only.as_deref());
    if models.is_empty() {
        warn!(vendor = ?args.only, "No boards match the vendor filter");
    }

    let min_delay = args
        .min_delay_ms
        .or(boards.settings.min_delay_ms)
        .unwrap_or(DEFAULT_MIN_DELAY_MS);
    let concurrency = args.concurrency.or(boards.settings.concurrency).unwrap_or(1);

    let mut source = HttpPageSource::new(Duration::from_millis(min_delay))
        .context("Failed to create HTTP client")?;
    if let Some(user_agent) = &boards.settings.user_agent {
        source = source
            .with_user_agent(user_agent)
            .context("Failed to apply user agent")?;
    }

    let order = if args.day_first {
        DateOrder::DayFirst
    } else {
        DateOrder::MonthFirst
    };
    let tracker = Tracker::new(ReleasePipeline::new(
        PipelineConfig::default().with_date_order(order),
    ))
    .with_concurrency(concurrency);

    let notifier: Box<dyn Notifier> = match (&args.webhook_url, args.dry_run) {
        (Some(url), false) => {
            Box::new(WebhookNotifier::new(url.clone()).context("Failed to create webhook client")?)
        }
        _ => Box::new(LogNotifier),
    };

    info!(
        boards = models.len(),
        state = %args.state.display(),
        dry_run = args.dry_run,
        "Starting run"
    );

    let file = JsonFileBackend::new(&args.state);
    let outcomes = if args.dry_run {
        let snapshot = file
            .load()
            .await
            .with_context(|| format!("Failed to read state {}", args.state.display()))?;
        track(&tracker, &models, &source, MemoryBackend::with_snapshot(snapshot), &cancel).await?
    } else {
        track(&tracker, &models, &source, file, &cancel).await?
    };

    let mut messages: Vec<String> = outcomes
        .iter()
        .filter_map(|o| o.event.as_ref().map(format_change))
        .collect();
    if args.notify_errors {
        messages.extend(outcomes.iter().filter_map(|o| format_error(&o.result)));
    }
    let notifications = deliver_all(notifier.as_ref(), &messages).await;

    if let Some(output) = &args.output {
        let results: Vec<_> = outcomes.iter().map(|o| o.result.clone()).collect();
        write_report(output, &results)
            .with_context(|| format!("Failed to write report {}", output.display()))?;
    }

    Ok(RunSummary {
        outcomes,
        notifications,
        dry_run: args.dry_run,
    })
}

async fn track<B: StateBackend>(
    tracker: &Tracker,
    models: &[bios_extraction::TrackedModel],
    source: &dyn PageSource,
    backend: B,
    cancel: &CancellationToken,
) -> Result<Vec<ModelOutcome>> {
    let store = StateStore::open(backend)
        .await
        .context("Failed to open state store")?;
    Ok(tracker.run(models, source, &store, cancel).await)
}
