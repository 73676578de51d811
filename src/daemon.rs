//! Monitoring cycle orchestration.
//!
//! One cycle:
//! 1. Splits the collector snapshot into per-hazard inputs via the registry
//! 2. Scores flood stations and landslide zones
//! 3. Asks the change detector whether the at-risk set moved since the last
//!    notification today (persisting the new baseline if so)
//! 4. Only on a change, composes an alert and hands it to the notifier
//!
//! Scheduling is external: the binary runs a single cycle per invocation.
//! Composition and delivery sit behind the `AlertComposer` and
//! `AlertNotifier` traits so the text generator and messaging channel can be
//! swapped without touching the decision logic.

use chrono::Local;
use std::collections::HashSet;

use crate::alert::{AlertStateStore, ChangeDetector, SignatureDiff};
use crate::analysis::groupings::{index_by_station, select_flood_inputs, select_landslide_inputs};
use crate::config::{InputConfig, MonitorConfig, StationConfig};
use crate::engine::{FloodRiskEngine, LandslideRiskEngine};
use crate::error::MonitorError;
use crate::ingest::{load_snapshot, ReadingSnapshot};
use crate::logging::{Component, Logger};
use crate::model::{FloodWarningZone, LandslideWarningZone};

// ---------------------------------------------------------------------------
// External collaborators
// ---------------------------------------------------------------------------

/// Turns the current warning zones into alert text.
pub trait AlertComposer {
    /// `None` means nothing could be composed this cycle.
    fn compose(
        &self,
        flood_zones: &[FloodWarningZone],
        landslide_zones: &[LandslideWarningZone],
    ) -> Option<String>;
}

/// Delivers finished alert text to its audience.
pub trait AlertNotifier {
    fn send(&self, message: &str) -> Result<(), MonitorError>;
}

/// Plain-text summary listing every at-risk station, most severe first.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryComposer;

impl AlertComposer for SummaryComposer {
    fn compose(
        &self,
        flood_zones: &[FloodWarningZone],
        landslide_zones: &[LandslideWarningZone],
    ) -> Option<String> {
        if flood_zones.is_empty() && landslide_zones.is_empty() {
            return Some("✅ All clear - no stations currently at risk.".to_string());
        }

        let mut sections = Vec::new();

        if !flood_zones.is_empty() {
            let mut lines = vec![format!("🌊 FLOOD WARNINGS ({})", flood_zones.len())];
            for z in flood_zones {
                lines.push(format!(
                    "[{}] {} ({}) - score {}, level {:.2}m (alert {:.2}m), {}, rain {:.1} mm/h",
                    z.risk_level,
                    z.station,
                    z.river_basin,
                    z.risk_score,
                    z.level_m,
                    z.alert_level,
                    describe_rate(z.rate_of_rise),
                    z.rain_1h_mm
                ));
            }
            sections.push(lines.join("\n"));
        }

        if !landslide_zones.is_empty() {
            let mut lines = vec![format!("⛰ LANDSLIDE WARNINGS ({})", landslide_zones.len())];
            for z in landslide_zones {
                lines.push(format!(
                    "[{}] {} - score {}, rain {:.1} mm/h, humidity {:.0}%, wind {:.1} m/s",
                    z.risk_level,
                    z.station,
                    z.risk_score,
                    z.rain_1h_mm,
                    z.humidity,
                    z.peak_wind_ms()
                ));
            }
            sections.push(lines.join("\n"));
        }

        Some(sections.join("\n\n"))
    }
}

fn describe_rate(rate: Option<f64>) -> String {
    match rate {
        Some(r) if r < 0.0 => format!("falling {:.3} m/h", -r),
        Some(r) => format!("rising {:.3} m/h", r),
        None => "rate n/a".to_string(),
    }
}

/// Prints alerts to stdout between rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl AlertNotifier for ConsoleNotifier {
    fn send(&self, message: &str) -> Result<(), MonitorError> {
        let rule = "=".repeat(60);
        println!("\n{}\n{}\n{}\n", rule, message, rule);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Cycle outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Alert composed and delivered.
    Sent,
    /// At-risk set unchanged since the last notification today.
    Suppressed,
    /// Changed, but the composer produced nothing.
    NothingComposed,
    /// Compared only; nothing persisted or delivered.
    DryRun,
}

#[derive(Debug, Clone)]
pub struct CycleOutcome {
    pub flood_zones: Vec<FloodWarningZone>,
    pub landslide_zones: Vec<LandslideWarningZone>,
    pub diff: SignatureDiff,
    pub delivery: Delivery,
}

impl CycleOutcome {
    pub fn notified(&self) -> bool {
        self.delivery == Delivery::Sent
    }
}

// ---------------------------------------------------------------------------
// Daemon
// ---------------------------------------------------------------------------

pub struct Daemon {
    flood_engine: FloodRiskEngine,
    landslide_engine: LandslideRiskEngine,
    detector: ChangeDetector,
    flood_stations: Vec<StationConfig>,
    landslide_zones: Vec<StationConfig>,
    log: Logger,
}

impl Daemon {
    /// Builds a daemon whose alert state lives at `config.state.path`.
    pub fn new(config: &MonitorConfig, log: Logger) -> Self {
        let store = AlertStateStore::new(&config.state.path, log.clone());
        Self::with_store(config, store, log)
    }

    /// Builds a daemon around an existing store (e.g. one with a pinned clock).
    pub fn with_store(config: &MonitorConfig, store: AlertStateStore, log: Logger) -> Self {
        log.info(
            Component::System,
            None,
            &format!(
                "Daemon ready - {} flood stations, {} landslide zones, state at {}",
                config.flood_stations.len(),
                config.landslide_zones.len(),
                store.path().display()
            ),
        );

        Self {
            flood_engine: FloodRiskEngine::new(log.clone()),
            landslide_engine: LandslideRiskEngine::new(log.clone()),
            detector: ChangeDetector::new(store, log.clone()),
            flood_stations: config.flood_stations.clone(),
            landslide_zones: config.landslide_zones.clone(),
            log,
        }
    }

    pub fn detector(&self) -> &ChangeDetector {
        &self.detector
    }

    /// Reads both collector snapshot files for this cycle.
    pub fn load_inputs(&self, input: &InputConfig) -> Result<ReadingSnapshot, MonitorError> {
        let snapshot = load_snapshot(input).inspect_err(|e| {
            self.log.error(Component::System, None, &e.to_string());
        })?;

        self.log.info(
            Component::System,
            None,
            &format!(
                "Snapshot loaded - {} gauge readings, {} weather readings",
                snapshot.flood.len(),
                snapshot.weather.len()
            ),
        );
        Ok(snapshot)
    }

    /// Scores both hazards for one snapshot. No state is read or written.
    pub fn score(
        &self,
        snapshot: &ReadingSnapshot,
    ) -> (Vec<FloodWarningZone>, Vec<LandslideWarningZone>) {
        let gauges = select_flood_inputs(snapshot.flood.clone(), &self.flood_stations, &self.log);
        let weather_by_station = index_by_station(&snapshot.weather);
        let flood_zones = self.flood_engine.evaluate(&gauges, &weather_by_station);

        let mut flood_names: HashSet<&str> = gauges.iter().map(|g| g.station.as_str()).collect();
        flood_names.extend(self.flood_stations.iter().map(|s| s.name.as_str()));
        let slopes =
            select_landslide_inputs(&snapshot.weather, &self.landslide_zones, &flood_names);
        let landslide_zones = self.landslide_engine.evaluate(&slopes);

        (flood_zones, landslide_zones)
    }

    /// Runs one full cycle: score, compare, and notify when changed.
    ///
    /// A failure to persist the new baseline aborts the cycle before
    /// anything is delivered. A delivery failure is returned after the
    /// baseline has been saved.
    pub fn run_cycle(
        &self,
        snapshot: &ReadingSnapshot,
        composer: &dyn AlertComposer,
        notifier: &dyn AlertNotifier,
    ) -> Result<CycleOutcome, MonitorError> {
        self.log.info(Component::Cycle, None, "Starting monitoring cycle...");

        let (flood_zones, landslide_zones) = self.score(snapshot);
        let diff = self.detector.evaluate(&flood_zones, &landslide_zones)?;

        let delivery = if !diff.is_changed() {
            self.log
                .info(Component::Cycle, None, "Alert suppressed - no change since last cycle");
            Delivery::Suppressed
        } else {
            self.log
                .info(Component::Cycle, None, "State changed - generating new alert");
            match composer.compose(&flood_zones, &landslide_zones) {
                Some(alert) => {
                    let timestamp = Local::now().format("🕐 %Y-%m-%d %H:%M:%S");
                    notifier.send(&format!("{}\n\n{}", timestamp, alert))?;
                    self.log.info(Component::Cycle, None, "Alert delivered");
                    Delivery::Sent
                }
                None => {
                    self.log
                        .warn(Component::Cycle, None, "No alert generated this cycle");
                    Delivery::NothingComposed
                }
            }
        };

        Ok(CycleOutcome {
            flood_zones,
            landslide_zones,
            diff,
            delivery,
        })
    }

    /// Scores and compares against stored state without persisting or
    /// delivering anything.
    pub fn dry_run(&self, snapshot: &ReadingSnapshot) -> CycleOutcome {
        let (flood_zones, landslide_zones) = self.score(snapshot);
        let diff = self.detector.preview(&flood_zones, &landslide_zones);
        self.log.info(
            Component::Cycle,
            None,
            &format!(
                "Dry run: {} flood, {} landslide zones; notification {}",
                flood_zones.len(),
                landslide_zones.len(),
                if diff.is_changed() { "would be sent" } else { "would be suppressed" }
            ),
        );

        CycleOutcome {
            flood_zones,
            landslide_zones,
            diff,
            delivery: Delivery::DryRun,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
