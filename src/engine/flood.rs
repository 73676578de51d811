//! Flood risk scoring.
//!
//! Combines the latest gauge level, its rate of rise, and current rainfall at
//! the same station into a 0–100 score:
//!
//! | factor        | points   |
//! |---------------|----------|
//! | water level   | 0 – 40   |
//! | rate of rise  | −5 – 30  |
//! | rainfall      | 0 – 30   |
//!
//! Stations without a configured alert threshold are never scored.

use std::collections::HashMap;

use crate::logging::{Component, Logger};
use crate::model::{
    clamp_score, configured, FloodReading, FloodWarningZone, RiskLevel, WeatherReading,
};

// ---------------------------------------------------------------------------
// Factor scoring
// ---------------------------------------------------------------------------

/// Water level against the station's stage thresholds (0–40 points).
///
/// The most severe matching stage wins. Thresholds that are not configured
/// never match.
pub fn level_points(level: f64, alert: f64, minor: Option<f64>, major: Option<f64>) -> i32 {
    let level_ratio = level / alert;

    if configured(major).is_some_and(|m| level >= m) {
        40
    } else if configured(minor).is_some_and(|m| level >= m) {
        30
    } else if level >= alert {
        20
    } else if level_ratio >= 0.8 {
        10
    } else {
        0
    }
}

/// Rate of rise in m/h (−5–30 points). Receding water lowers the score.
pub fn rate_points(rate: Option<f64>) -> i32 {
    let Some(rate) = rate else {
        return 0;
    };

    if rate >= 0.5 {
        30 // rapid rise
    } else if rate >= 0.2 {
        20
    } else if rate >= 0.1 {
        10
    } else if rate < 0.0 {
        -5
    } else {
        0
    }
}

/// Rainfall at the station (0–30 points).
///
/// The 3-hour total only counts when the 1-hour rate earned nothing; the two
/// are not additive.
pub fn rainfall_points(rain_1h: f64, rain_3h: f64) -> i32 {
    if rain_1h >= 50.0 {
        30
    } else if rain_1h >= 20.0 {
        20
    } else if rain_1h >= 7.0 {
        10
    } else if rain_3h >= 15.0 {
        10 // sustained rain over 3h
    } else {
        0
    }
}

/// Scores a single gauge reading.
///
/// Returns `None` when the station has no alert threshold or classifies as
/// NORMAL.
pub fn score_station(
    reading: &FloodReading,
    weather: Option<&WeatherReading>,
) -> Option<FloodWarningZone> {
    let alert = reading.alert_threshold()?;

    let rain_1h = weather.map(|w| w.rain_1h_mm).unwrap_or(0.0);
    let rain_3h = weather.map(|w| w.rain_3h_mm).unwrap_or(0.0);

    let points = level_points(reading.level_m, alert, reading.minor_level, reading.major_level)
        + rate_points(reading.rate_of_rise)
        + rainfall_points(rain_1h, rain_3h);

    let risk_score = clamp_score(points);
    let risk_level = RiskLevel::from_score(risk_score);
    if !risk_level.is_at_risk() {
        return None;
    }

    Some(FloodWarningZone {
        station: reading.station.clone(),
        river_basin: reading.river_basin.clone(),
        level_m: reading.level_m,
        alert_level: alert,
        minor_level: configured(reading.minor_level),
        major_level: configured(reading.major_level),
        rate_of_rise: reading.rate_of_rise,
        rain_1h_mm: rain_1h,
        rain_3h_mm: rain_3h,
        risk_score,
        risk_level,
        measured_at: reading.measured_at.clone(),
    })
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Flood risk engine. Holds nothing but its log handle; every evaluation
/// works only on the readings it is given.
#[derive(Debug, Clone)]
pub struct FloodRiskEngine {
    log: Logger,
}

impl FloodRiskEngine {
    pub fn new(log: Logger) -> Self {
        Self { log }
    }

    /// Scores every gauge reading and returns the at-risk stations, most
    /// dangerous first. Equal scores keep their input order.
    pub fn evaluate(
        &self,
        gauge_readings: &[FloodReading],
        weather_by_station: &HashMap<String, WeatherReading>,
    ) -> Vec<FloodWarningZone> {
        let mut zones = Vec::new();

        for reading in gauge_readings {
            if reading.alert_threshold().is_none() {
                self.log.debug(
                    Component::Flood,
                    Some(&reading.station),
                    "Skipping - no alert threshold configured",
                );
                continue;
            }

            let weather = weather_by_station.get(&reading.station);
            if let Some(zone) = score_station(reading, weather) {
                let rate = zone
                    .rate_of_rise
                    .map(|r| format!("{:.3}m/h", r))
                    .unwrap_or_else(|| "n/a".to_string());
                self.log.warn(
                    Component::Flood,
                    Some(&zone.station),
                    &format!(
                        "{} - score={}, level={:.2}m, rate={}, rain_1h={:.1}mm",
                        zone.risk_level, zone.risk_score, zone.level_m, rate, zone.rain_1h_mm
                    ),
                );
                zones.push(zone);
            }
        }

        // stable: ties keep input order
        zones.sort_by(|a, b| b.risk_score.cmp(&a.risk_score));

        self.log.info(
            Component::Flood,
            None,
            &format!(
                "Flood analysis complete: {} warning zones out of {} stations",
                zones.len(),
                gauge_readings.len()
            ),
        );

        zones
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
