//! Error types for the hazard monitoring service.
//!
//! Only failures that the caller must act on live here. Malformed readings,
//! missing thresholds and corrupt alert state are handled in place by
//! degrading to the least alarming outcome and never reach these enums.

use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Alert state persistence
// ---------------------------------------------------------------------------

/// Failure to persist a new alert state baseline.
///
/// Surfaced rather than swallowed: if the detector reported a change but the
/// baseline was not written, the next cycle would notify again.
#[derive(Error, Debug)]
pub enum StateError {
    #[error("failed to write alert state {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize alert state: {0}")]
    Serialize(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

// ---------------------------------------------------------------------------
// Snapshot ingest
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("failed to read snapshot {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot {path} is not a JSON array of readings: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// Monitoring cycle
// ---------------------------------------------------------------------------

/// Anything that can abort a monitoring cycle.
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("alert delivery failed: {0}")]
    Delivery(String),
}
