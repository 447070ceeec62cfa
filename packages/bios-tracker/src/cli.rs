//! Command-line arguments.

use clap::Parser;
use std::path::PathBuf;

/// Check motherboard vendor support pages for new BIOS releases.
#[derive(Parser, Debug, Clone)]
#[command(name = "bios-tracker")]
#[command(about = "Check vendor support pages for new BIOS releases", long_about = None)]
pub struct Args {
    /// Board list (YAML)
    #[arg(short, long, default_value = "boards.yaml")]
    pub config: PathBuf,

    /// State file with the last known release per board
    #[arg(short, long, env = "STATE_PATH", default_value = "state.json")]
    pub state: PathBuf,

    /// Write a JSON report of this run here
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Boards checked at once
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Minimum delay between requests to the same host
    #[arg(long)]
    pub min_delay_ms: Option<u64>,

    /// Chat webhook receiving change notifications
    #[arg(long, env = "WEBHOOK_URL")]
    pub webhook_url: Option<String>,

    /// Also notify boards that failed to scrape
    #[arg(long)]
    pub notify_errors: bool,

    /// Read day-first numeric dates (03/04/2023 = 3 April) when a page gives no hint
    #[arg(long)]
    pub day_first: bool,

    /// Do not write state or send webhooks
    #[arg(long)]
    pub dry_run: bool,

    /// Only check boards of this vendor
    #[arg(long, value_name = "VENDOR")]
    pub only: Option<String>,
}
