//! Collector output ingest.
//!
//! Submodules:
//! - `snapshot` — lenient parsing of the gauge and weather snapshot files.
//! - `fixtures` (test only) — representative snapshot payloads.

pub mod fixtures;
pub mod snapshot;

pub use snapshot::{load_snapshot, ReadingSnapshot};
