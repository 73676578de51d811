//! Alert deduplication.
//!
//! A notification is due only when the set of (station, risk level) pairs for
//! either hazard differs from what was last notified today. Scores and
//! ordering play no part, so a station stuck at WARNING notifies once per day
//! while every band transition notifies again.

use crate::alert::signature::Signature;
use crate::alert::state::AlertStateStore;
use crate::error::StateError;
use crate::logging::{Component, Logger};
use crate::model::{FloodWarningZone, Hazard, LandslideWarningZone, RiskLevel};

// ---------------------------------------------------------------------------
// Diff
// ---------------------------------------------------------------------------

/// How one hazard's signature moved since the last notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HazardDiff {
    /// New stations, or stations now in a different band.
    pub added: Vec<(String, RiskLevel)>,
    /// Entries no longer present in the current cycle.
    pub cleared: Vec<(String, RiskLevel)>,
}

impl HazardDiff {
    pub fn between(current: &Signature, previous: &Signature) -> Self {
        Self {
            added: current.added_since(previous),
            cleared: previous.added_since(current),
        }
    }

    pub fn is_changed(&self) -> bool {
        !self.added.is_empty() || !self.cleared.is_empty()
    }
}

/// Comparison of the current cycle against stored state, for both hazards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureDiff {
    pub flood: HazardDiff,
    pub landslide: HazardDiff,
}

impl SignatureDiff {
    pub fn is_changed(&self) -> bool {
        self.flood.is_changed() || self.landslide.is_changed()
    }
}

// ---------------------------------------------------------------------------
// Detector
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ChangeDetector {
    store: AlertStateStore,
    log: Logger,
}

impl ChangeDetector {
    pub fn new(store: AlertStateStore, log: Logger) -> Self {
        Self { store, log }
    }

    pub fn store(&self) -> &AlertStateStore {
        &self.store
    }

    /// Compares the current zones against stored state without writing.
    pub fn preview(
        &self,
        flood_zones: &[FloodWarningZone],
        landslide_zones: &[LandslideWarningZone],
    ) -> SignatureDiff {
        let previous = self.store.load();
        let (prev_flood, prev_landslide) = previous
            .map(|s| (s.flood, s.landslide))
            .unwrap_or_default();

        SignatureDiff {
            flood: HazardDiff::between(&Signature::of(flood_zones), &prev_flood),
            landslide: HazardDiff::between(&Signature::of(landslide_zones), &prev_landslide),
        }
    }

    /// Compares and, on a change, persists both current signatures as the new
    /// baseline. Returns the diff; unchanged state is never rewritten.
    pub fn evaluate(
        &self,
        flood_zones: &[FloodWarningZone],
        landslide_zones: &[LandslideWarningZone],
    ) -> Result<SignatureDiff, StateError> {
        let diff = self.preview(flood_zones, landslide_zones);

        self.log_hazard_diff(Hazard::Flood, &diff.flood);
        self.log_hazard_diff(Hazard::Landslide, &diff.landslide);

        if diff.is_changed() {
            self.store
                .save(Signature::of(flood_zones), Signature::of(landslide_zones))?;
        } else {
            self.log
                .info(Component::State, None, "No alert state change - skipping notification");
        }

        Ok(diff)
    }

    /// `true` when a new notification is due. See `evaluate`.
    pub fn has_changed(
        &self,
        flood_zones: &[FloodWarningZone],
        landslide_zones: &[LandslideWarningZone],
    ) -> Result<bool, StateError> {
        Ok(self.evaluate(flood_zones, landslide_zones)?.is_changed())
    }

    fn log_hazard_diff(&self, hazard: Hazard, diff: &HazardDiff) {
        if !diff.added.is_empty() {
            self.log.info(
                Component::State,
                None,
                &format!("{} state CHANGED - new/updated: {}", hazard, describe(&diff.added)),
            );
        }
        if !diff.cleared.is_empty() {
            self.log.info(
                Component::State,
                None,
                &format!("{} state CHANGED - cleared: {}", hazard, describe(&diff.cleared)),
            );
        }
    }
}

fn describe(entries: &[(String, RiskLevel)]) -> String {
    entries
        .iter()
        .map(|(station, level)| format!("{} ({})", station, level))
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;
    use chrono::NaiveDate;
    use std::fs;

    fn flood_zone(station: &str, score: u8) -> FloodWarningZone {
        FloodWarningZone {
            station: station.to_string(),
            river_basin: "Kalu Ganga".to_string(),
            level_m: 4.2,
            alert_level: 3.0,
            minor_level: Some(4.0),
            major_level: Some(5.0),
            rate_of_rise: Some(0.2),
            rain_1h_mm: 8.0,
            rain_3h_mm: 12.0,
            risk_score: score,
            risk_level: RiskLevel::from_score(score),
            measured_at: "2026-10-15 07:45:00".to_string(),
        }
    }

    fn slide_zone(station: &str, score: u8) -> LandslideWarningZone {
        LandslideWarningZone {
            station: station.to_string(),
            rain_1h_mm: 32.0,
            rain_3h_mm: 0.0,
            humidity: 96.0,
            wind_speed_ms: 3.0,
            wind_gust_ms: 8.5,
            cloud_cover: 0.0,
            risk_score: score,
            risk_level: RiskLevel::from_score(score),
            lat: None,
            lon: None,
        }
    }

    fn detector(dir: &tempfile::TempDir, log: Logger) -> ChangeDetector {
        let store = AlertStateStore::with_clock(
            dir.path().join("alert_state.json"),
            log.clone(),
            || NaiveDate::from_ymd_opt(2026, 10, 15).unwrap(),
        );
        ChangeDetector::new(store, log)
    }

    #[test]
    fn test_identical_cycles_are_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let detector = detector(&dir, Logger::disabled());
        let flood = vec![flood_zone("Ratnapura", 60)];
        let slides = vec![slide_zone("Badulla", 75)];

        assert!(detector.has_changed(&flood, &slides).unwrap(), "first sighting notifies");
        assert!(!detector.has_changed(&flood, &slides).unwrap());
        assert!(!detector.has_changed(&flood, &slides).unwrap());
    }

    #[test]
    fn test_score_change_within_band_is_not_a_change() {
        let dir = tempfile::tempdir().unwrap();
        let detector = detector(&dir, Logger::disabled());

        assert!(detector.has_changed(&[flood_zone("Ratnapura", 46)], &[]).unwrap());
        assert!(
            !detector.has_changed(&[flood_zone("Ratnapura", 50)], &[]).unwrap(),
            "46 → 50 stays WARNING and must not re-notify"
        );
    }

    #[test]
    fn test_band_flapping_notifies_on_every_transition() {
        let dir = tempfile::tempdir().unwrap();
        let detector = detector(&dir, Logger::disabled());

        let results: Vec<bool> = [50, 72, 55, 55]
            .iter()
            .map(|score| detector.has_changed(&[flood_zone("Ratnapura", *score)], &[]).unwrap())
            .collect();
        assert_eq!(results, vec![true, true, true, false]);
    }

    #[test]
    fn test_order_of_zones_is_irrelevant() {
        let dir = tempfile::tempdir().unwrap();
        let detector = detector(&dir, Logger::disabled());

        let a = vec![slide_zone("Badulla", 60), slide_zone("Kegalle", 25)];
        let b = vec![slide_zone("Kegalle", 30), slide_zone("Badulla", 65)];
        assert!(detector.has_changed(&[], &a).unwrap());
        assert!(!detector.has_changed(&[], &b).unwrap());
    }

    #[test]
    fn test_change_in_one_hazard_persists_both() {
        let dir = tempfile::tempdir().unwrap();
        let detector = detector(&dir, Logger::disabled());
        let flood = vec![flood_zone("Ratnapura", 60)];

        detector.has_changed(&flood, &[]).unwrap();
        let slides = vec![slide_zone("Badulla", 75)];
        assert!(detector.has_changed(&flood, &slides).unwrap());

        let state = detector.store().load().unwrap();
        assert!(state.flood.contains("Ratnapura", RiskLevel::Warning));
        assert!(state.landslide.contains("Badulla", RiskLevel::Critical));
    }

    #[test]
    fn test_zones_clearing_is_a_change() {
        let dir = tempfile::tempdir().unwrap();
        let detector = detector(&dir, Logger::disabled());

        detector.has_changed(&[flood_zone("Ratnapura", 60)], &[]).unwrap();
        let diff = detector.evaluate(&[], &[]).unwrap();
        assert!(diff.is_changed());
        assert_eq!(diff.flood.cleared, vec![("Ratnapura".to_string(), RiskLevel::Warning)]);
        assert!(diff.flood.added.is_empty());

        // And once cleared, staying clear is quiet.
        assert!(!detector.has_changed(&[], &[]).unwrap());
    }

    #[test]
    fn test_empty_cycles_never_write() {
        let dir = tempfile::tempdir().unwrap();
        let detector = detector(&dir, Logger::disabled());

        assert!(!detector.has_changed(&[], &[]).unwrap());
        assert!(!detector.has_changed(&[], &[]).unwrap());
        assert!(!detector.store().path().exists(), "no state file should have been written");
    }

    #[test]
    fn test_unchanged_cycle_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let detector = detector(&dir, Logger::disabled());
        let flood = vec![flood_zone("Ratnapura", 60)];
        detector.has_changed(&flood, &[]).unwrap();

        // Rewrite the same state in a different layout; a save would restore pretty JSON.
        let compact = r#"{"date":"2026-10-15","flood":[["Ratnapura","WARNING"]],"landslide":[]}"#;
        fs::write(detector.store().path(), compact).unwrap();

        assert!(!detector.has_changed(&flood, &[]).unwrap());
        assert_eq!(fs::read_to_string(detector.store().path()).unwrap(), compact);
    }

    #[test]
    fn test_preview_does_not_persist() {
        let dir = tempfile::tempdir().unwrap();
        let detector = detector(&dir, Logger::disabled());

        let diff = detector.preview(&[flood_zone("Ratnapura", 60)], &[]);
        assert!(diff.is_changed());
        assert!(!detector.store().path().exists());
    }

    #[test]
    fn test_changes_are_logged() {
        let dir = tempfile::tempdir().unwrap();
        let log = Logger::capturing(LogLevel::Info);
        let detector = detector(&dir, log.clone());

        detector.has_changed(&[flood_zone("Ratnapura", 72)], &[]).unwrap();
        detector.has_changed(&[], &[]).unwrap();

        let lines = log.captured();
        assert!(
            lines
                .iter()
                .any(|l| l.contains("Flood state CHANGED - new/updated: Ratnapura (CRITICAL)"))
        );
        assert!(
            lines
                .iter()
                .any(|l| l.contains("Flood state CHANGED - cleared: Ratnapura (CRITICAL)"))
        );
    }
}
