//! Reading preparation ahead of scoring.
//!
//! Submodules:
//! - `groupings` — indexes weather by station and splits readings per hazard.
//! - `rate`      — derives rate of rise from recent level samples.

pub mod groupings;
pub mod rate;
