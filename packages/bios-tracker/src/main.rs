use anyhow::Result;
use bios_tracker::{Args, RunSummary};
use chrono::Utc;
use clap::Parser;
use colored::Colorize;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const FRESH_DAYS: i64 = 7;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,bios_extraction=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    let args = Args::parse();

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, finishing current boards");
            on_signal.cancel();
        }
    });

    let summary = bios_tracker::run(&args, cancel).await?;
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    let today = Utc::now().date_naive();

    println!();
    for outcome in &summary.outcomes {
        let model = outcome.result.model();
        let label = format!("{} ({})", model.name, model.vendor);

        match (outcome.result.error(), outcome.result.latest()) {
            (Some(error), _) => println!("{} {}: {}", "✗".red(), label, error.red()),
            (None, Some(latest)) => {
                let date = latest.date_string().unwrap_or_else(|| "unknown date".into());
                let mut line = format!("{} {}: {} ({})", "✓".green(), label, latest.version.bold(), date);
                if latest.is_fresh(today, FRESH_DAYS) {
                    line.push_str(&format!(" {}", "NEW".yellow().bold()));
                }
                if outcome.event.is_some() {
                    line.push_str(&format!(" {}", "changed".cyan()));
                }
                println!("{}", line);
            }
            (None, None) => println!("{} {}: no release", "?".yellow(), label),
        }

        if let Some(e) = &outcome.commit_error {
            println!("  {} {}", "state not saved:".red(), e);
        }
    }

    println!();
    println!(
        "{} boards, {} changed, {} failed, {} notifications{}",
        summary.outcomes.len(),
        summary.changed().to_string().cyan(),
        summary.failed().to_string().red(),
        summary.notifications,
        if summary.dry_run { " (dry run)" } else { "" }
    );
    if summary.commit_failures() > 0 {
        println!(
            "{}",
            format!("{} state writes failed", summary.commit_failures()).red()
        );
    }
}
