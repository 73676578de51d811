//! Alert deduplication and state tracking.
//!
//! Submodules:
//! - `signature` — (station, risk level) sets compared across cycles.
//! - `state`     — day-scoped persistence of the last notified signatures.
//! - `change`    — decides whether the current cycle warrants a notification.

pub mod change;
pub mod signature;
pub mod state;

pub use change::{ChangeDetector, HazardDiff, SignatureDiff};
pub use signature::Signature;
pub use state::{AlertState, AlertStateStore};
