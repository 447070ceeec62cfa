//! BIOS Tracker
//!
//! The runnable shell around `bios_extraction`: board config, HTTP fetching
//! with per-host throttling, webhook notifications and JSON reports.
//!
//! # Modules
//!
//! - [`cli`] - Command-line arguments
//! - [`config`] - Board list YAML
//! - [`fetch`] - HTTP page source
//! - [`notify`] - Change notification formatting and delivery
//! - [`export`] - JSON report writer
//! - [`app`] - One complete tracking run

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod fetch;
pub mod notify;

pub use app::{run, RunSummary};
pub use cli::Args;
pub use config::{BoardsFile, Settings};
pub use error::{Result, TrackerError};
pub use fetch::HttpPageSource;
pub use notify::{LogNotifier, Notifier, RecordingNotifier, WebhookNotifier};
