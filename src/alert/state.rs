//! Persisted alert state: what was last notified, and on which day.
//!
//! The state file is a single JSON document:
//!
//! ```json
//! {
//!   "date": "2026-10-15",
//!   "flood": [["Hanwella", "WARNING"]],
//!   "landslide": [["Badulla", "CRITICAL"], ["Kegalle", "WATCH"]]
//! }
//! ```
//!
//! # Fail-open reads
//! A missing, unreadable or unparsable file, or one dated any day other than
//! today, loads as "no prior history". A corrupt state file must never block
//! alerting; the worst case is one extra notification.
//!
//! # Atomic writes
//! Saves write a sibling temp file and rename it over the target, so a reader
//! sees either the old document or the new one, never a partial write.
//!
//! # Clock injection
//! The store reads "today" from a date source fixed at construction. Callers
//! never supply the date being saved; tests supply a fixed clock instead.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::alert::signature::Signature;
use crate::error::StateError;
use crate::logging::{Component, Logger};

// ---------------------------------------------------------------------------
// State document
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertState {
    pub date: NaiveDate,
    #[serde(default)]
    pub flood: Signature,
    #[serde(default)]
    pub landslide: Signature,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

type DateSource = Box<dyn Fn() -> NaiveDate + Send + Sync>;

/// Sole owner of the alert state file.
pub struct AlertStateStore {
    path: PathBuf,
    today: DateSource,
    log: Logger,
}

impl std::fmt::Debug for AlertStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertStateStore")
            .field("path", &self.path)
            .finish()
    }
}

impl AlertStateStore {
    /// Store at `path` using the local calendar date.
    pub fn new(path: impl Into<PathBuf>, log: Logger) -> Self {
        Self::with_clock(path, log, || Local::now().date_naive())
    }

    /// Store with an explicit date source. Use in tests to pin "today".
    pub fn with_clock(
        path: impl Into<PathBuf>,
        log: Logger,
        today: impl Fn() -> NaiveDate + Send + Sync + 'static,
    ) -> Self {
        Self {
            path: path.into(),
            today: Box::new(today),
            log,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn today(&self) -> NaiveDate {
        (self.today)()
    }

    /// Loads today's state. Returns `None` for every kind of absent or
    /// unusable state; see the module docs.
    pub fn load(&self) -> Option<AlertState> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                self.log.warn(
                    Component::State,
                    None,
                    &format!(
                        "Failed to read alert state {}: {} - starting fresh",
                        self.path.display(),
                        e
                    ),
                );
                return None;
            }
        };

        let state: AlertState = match serde_json::from_str(&contents) {
            Ok(state) => state,
            Err(e) => {
                self.log.warn(
                    Component::State,
                    None,
                    &format!(
                        "Failed to parse alert state {}: {} - starting fresh",
                        self.path.display(),
                        e
                    ),
                );
                return None;
            }
        };

        let today = self.today();
        if state.date != today {
            self.log.info(
                Component::State,
                None,
                &format!("New day detected - clearing previous alert state ({})", state.date),
            );
            return None;
        }

        Some(state)
    }

    /// Replaces the state file with the given signatures, stamped with today.
    pub fn save(&self, flood: Signature, landslide: Signature) -> Result<AlertState, StateError> {
        let state = AlertState {
            date: self.today(),
            flood,
            landslide,
        };

        let body = serde_json::to_vec_pretty(&state)?;
        write_atomic(&self.path, &body).map_err(|source| StateError::Io {
            path: self.path.clone(),
            source,
        })?;

        self.log.info(
            Component::State,
            None,
            &format!(
                "Alert state saved - {} flood, {} landslide zones",
                state.flood.len(),
                state.landslide.len()
            ),
        );

        Ok(state)
    }
}

/// Write to `<path>.tmp`, flush to disk, then rename over `path`.
fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp = tmp_path(path);
    let result = write_and_rename(&tmp, path, bytes);
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    PathBuf::from(tmp_name)
}

fn write_and_rename(tmp: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(tmp)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);

    fs::rename(tmp, path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
