//! hazmon_service: flood and landslide hazard monitoring with change-gated alerts.
//!
//! # Module structure
//!
//! ```text
//! hazmon_service
//! ├── model       — shared data types (readings, warning zones, RiskLevel)
//! ├── error       — error types for state, config, ingest and the cycle
//! ├── logging     — leveled, component-tagged console + file logger
//! ├── config      — service configuration and station registry (monitor.toml)
//! ├── daemon      — one monitoring cycle: score, compare, notify on change
//! ├── engine
//! │   ├── flood      — gauge stage / rate-of-rise / rainfall risk scoring
//! │   └── landslide  — rainfall / humidity / wind / cloud risk scoring
//! ├── alert
//! │   ├── signature  — order-independent (station, level) set of at-risk zones
//! │   ├── state      — per-day persisted alert state (atomic JSON file)
//! │   └── change     — change detection gating notifications
//! ├── ingest
//! │   ├── snapshot   — lenient parsing of collector snapshot files
//! │   └── fixtures (test only) — representative snapshot payloads
//! └── analysis
//!     ├── rate       — rate of rise from timestamped level samples
//!     └── groupings  — weather join index and registry filtering
//! ```

pub mod alert;
pub mod analysis;
pub mod config;
pub mod daemon;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod model;
