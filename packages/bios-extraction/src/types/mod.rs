//! Domain types for extraction and change tracking.

pub mod candidate;
pub mod config;
pub mod model;
pub mod release;
pub mod result;
pub mod state;
