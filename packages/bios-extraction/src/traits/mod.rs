//! Core trait abstractions.
//!
//! Applications implement these to plug in page fetching and state storage.

pub mod source;
pub mod store;
