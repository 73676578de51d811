//! Core data types for the hazard monitoring service.
//!
//! This module defines the shared domain model imported by all other modules:
//! normalized station readings coming in from the collectors, warning zones
//! produced by the risk engines, and the risk level buckets that drive alert
//! deduplication. It contains no I/O.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Risk classification
// ---------------------------------------------------------------------------

/// Score at or above which a station is CRITICAL.
pub const CRITICAL_SCORE: u8 = 70;
/// Score at or above which a station is WARNING.
pub const WARNING_SCORE: u8 = 45;
/// Score at or above which a station is WATCH.
pub const WATCH_SCORE: u8 = 20;

/// Discrete risk bucket derived from a 0–100 risk score.
///
/// Ordered by severity so `Normal < Watch < Warning < Critical`.
/// `Normal` exists for classification only; no warning zone is ever built
/// with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Normal,
    Watch,
    Warning,
    Critical,
}

impl RiskLevel {
    /// Buckets a clamped score. Each band is closed on its low end:
    /// exactly 70 is CRITICAL, exactly 45 WARNING, exactly 20 WATCH.
    pub fn from_score(score: u8) -> Self {
        if score >= CRITICAL_SCORE {
            RiskLevel::Critical
        } else if score >= WARNING_SCORE {
            RiskLevel::Warning
        } else if score >= WATCH_SCORE {
            RiskLevel::Watch
        } else {
            RiskLevel::Normal
        }
    }

    pub fn is_at_risk(self) -> bool {
        self != RiskLevel::Normal
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Normal => "NORMAL",
            RiskLevel::Watch => "WATCH",
            RiskLevel::Warning => "WARNING",
            RiskLevel::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sums signed factor points and clamps the total into the 0–100 score range.
pub fn clamp_score(points: i32) -> u8 {
    points.clamp(0, 100) as u8
}

// ---------------------------------------------------------------------------
// Reading types
// ---------------------------------------------------------------------------

/// Latest river gauge observation for one flood-monitoring station.
///
/// Thresholds are in meters. `None` or a non-positive value means the
/// station has no configured threshold at that stage.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FloodReading {
    pub station: String,
    pub river_basin: String,
    pub level_m: f64,
    /// Meters per hour; absent when fewer than two historical samples exist.
    pub rate_of_rise: Option<f64>,
    pub alert_level: Option<f64>,
    pub minor_level: Option<f64>,
    pub major_level: Option<f64>,
    pub measured_at: String, // "YYYY-MM-DD HH:MM:SS", local to the gauge network
}

impl FloodReading {
    /// The alert threshold, if one is actually configured.
    pub fn alert_threshold(&self) -> Option<f64> {
        configured(self.alert_level)
    }
}

/// Current weather conditions at a flood station or landslide zone.
///
/// Collectors default missing fields to zero, so every numeric here already
/// holds its least alarming value when the upstream source omitted it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeatherReading {
    pub station: String,
    pub rain_1h_mm: f64,
    pub rain_3h_mm: f64,
    /// Relative humidity, percent.
    pub humidity: f64,
    pub wind_speed_ms: f64,
    pub wind_gust_ms: f64,
    /// Cloud cover, percent.
    pub cloud_cover: f64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// Treats absent, zero, negative and NaN thresholds as "not configured".
pub fn configured(threshold: Option<f64>) -> Option<f64> {
    threshold.filter(|t| *t > 0.0)
}

// ---------------------------------------------------------------------------
// Warning zones
// ---------------------------------------------------------------------------

/// A flood station scored above NORMAL in the current cycle.
///
/// Carries every raw input used for scoring so the composer can describe
/// the situation without going back to the readings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloodWarningZone {
    pub station: String,
    pub river_basin: String,
    pub level_m: f64,
    pub alert_level: f64,
    pub minor_level: Option<f64>,
    pub major_level: Option<f64>,
    pub rate_of_rise: Option<f64>,
    pub rain_1h_mm: f64,
    pub rain_3h_mm: f64,
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    pub measured_at: String,
}

/// A landslide-prone zone scored above NORMAL in the current cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandslideWarningZone {
    pub station: String,
    pub rain_1h_mm: f64,
    pub rain_3h_mm: f64,
    pub humidity: f64,
    pub wind_speed_ms: f64,
    pub wind_gust_ms: f64,
    pub cloud_cover: f64,
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl LandslideWarningZone {
    /// The stronger of sustained wind and gust, as used for scoring.
    pub fn peak_wind_ms(&self) -> f64 {
        self.wind_speed_ms.max(self.wind_gust_ms)
    }
}

/// The identity of a warning zone for alert deduplication purposes.
///
/// Only the station name and classified level matter; the raw score is
/// deliberately not part of it.
pub trait AtRisk {
    fn station(&self) -> &str;
    fn risk_level(&self) -> RiskLevel;
}

impl AtRisk for FloodWarningZone {
    fn station(&self) -> &str {
        &self.station
    }

    fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }
}

impl AtRisk for LandslideWarningZone {
    fn station(&self) -> &str {
        &self.station
    }

    fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }
}

/// Which hazard a zone or signature belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hazard {
    Flood,
    Landslide,
}

impl fmt::Display for Hazard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hazard::Flood => write!(f, "Flood"),
            Hazard::Landslide => write!(f, "Landslide"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
