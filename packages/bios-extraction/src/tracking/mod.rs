//! Change tracking across runs.
//!
//! - [`StateStore`]: load-once snapshot with serialized per-model commits
//! - [`ChangeDetector`]: decides whether a new latest release is news
//! - [`Tracker`]: fetch → extract → compare → commit for a batch of models

pub mod detect;
pub mod store;
pub mod tracker;

pub use detect::{ChangeDetector, ChangeEvent, ChangeNotification};
pub use store::StateStore;
pub use tracker::{ModelOutcome, Tracker};
