//! State backend implementations.
//!
//! - `MemoryBackend`: in-process, for tests and dry runs
//! - `JsonFileBackend`: a single JSON document on disk, replaced atomically

pub mod json_file;
pub mod memory;

pub use json_file::{write_atomic, JsonFileBackend};
pub use memory::MemoryBackend;
