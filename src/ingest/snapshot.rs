//! Snapshot ingest: normalized collector output read from JSON files.
//!
//! The collectors that talk to the gauge network and the weather API run
//! outside this service and drop their results as two JSON arrays. Parsing is
//! deliberately lenient at the field level:
//!
//! - numbers may arrive as JSON numbers or numeric strings
//! - null, missing or malformed numerics become absent, and absent weather
//!   values read as 0
//! - a record without a station name is dropped
//!
//! Only a file that cannot be read, or is not a JSON array at all, is an
//! error.

use chrono::NaiveDateTime;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use crate::analysis::groupings::UNKNOWN_BASIN;
use crate::analysis::rate::{latest_with_rate, LevelSample};
use crate::config::InputConfig;
use crate::error::IngestError;
use crate::model::{FloodReading, WeatherReading};

const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Display format for measurement timestamps.
const MEASURED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Both reading lists for one monitoring cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadingSnapshot {
    pub flood: Vec<FloodReading>,
    pub weather: Vec<WeatherReading>,
}

// ---------------------------------------------------------------------------
// File loading
// ---------------------------------------------------------------------------

pub fn load_snapshot(input: &InputConfig) -> Result<ReadingSnapshot, IngestError> {
    Ok(ReadingSnapshot {
        flood: load_flood_readings(&input.flood_readings)?,
        weather: load_weather_readings(&input.weather_readings)?,
    })
}

pub fn load_flood_readings(path: &Path) -> Result<Vec<FloodReading>, IngestError> {
    let contents = read(path)?;
    parse_flood_readings(&contents).map_err(|source| IngestError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_weather_readings(path: &Path) -> Result<Vec<WeatherReading>, IngestError> {
    let contents = read(path)?;
    parse_weather_readings(&contents).map_err(|source| IngestError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn read(path: &Path) -> Result<String, IngestError> {
    fs::read_to_string(path).map_err(|source| IngestError::Read {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parses a gauge snapshot.
///
/// When a record has `samples` (`[[timestamp, level], ...]`) and no explicit
/// `rate_of_rise`, level, rate and timestamp are derived from the samples.
pub fn parse_flood_readings(json: &str) -> Result<Vec<FloodReading>, serde_json::Error> {
    let records: Vec<Value> = serde_json::from_str(json)?;
    Ok(records
        .iter()
        .filter_map(Value::as_object)
        .filter_map(flood_reading)
        .collect())
}

pub fn parse_weather_readings(json: &str) -> Result<Vec<WeatherReading>, serde_json::Error> {
    let records: Vec<Value> = serde_json::from_str(json)?;
    Ok(records
        .iter()
        .filter_map(Value::as_object)
        .filter_map(weather_reading)
        .collect())
}

fn flood_reading(record: &Map<String, Value>) -> Option<FloodReading> {
    let station = text(record, "station")?;

    let mut reading = FloodReading {
        station,
        river_basin: text(record, "river_basin").unwrap_or_else(|| UNKNOWN_BASIN.to_string()),
        level_m: number(record, "level_m").unwrap_or(0.0),
        rate_of_rise: number(record, "rate_of_rise"),
        alert_level: number(record, "alert_level"),
        minor_level: number(record, "minor_level"),
        major_level: number(record, "major_level"),
        measured_at: text(record, "measured_at").unwrap_or_default(),
    };

    if reading.rate_of_rise.is_none() {
        if let Some(latest) = latest_with_rate(&samples(record)) {
            reading.level_m = latest.level_m;
            reading.rate_of_rise = latest.rate_of_rise;
            reading.measured_at = latest.at.format(MEASURED_AT_FORMAT).to_string();
        }
    }

    Some(reading)
}

fn weather_reading(record: &Map<String, Value>) -> Option<WeatherReading> {
    Some(WeatherReading {
        station: text(record, "station")?,
        rain_1h_mm: number(record, "rain_1h_mm").unwrap_or(0.0),
        rain_3h_mm: number(record, "rain_3h_mm").unwrap_or(0.0),
        humidity: number(record, "humidity").unwrap_or(0.0),
        wind_speed_ms: number(record, "wind_speed_ms").unwrap_or(0.0),
        wind_gust_ms: number(record, "wind_gust_ms").unwrap_or(0.0),
        cloud_cover: number(record, "cloud_cover").unwrap_or(0.0),
        lat: number(record, "lat"),
        lon: number(record, "lon"),
    })
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

/// Finite number from a JSON number or numeric string.
fn number(record: &Map<String, Value>, key: &str) -> Option<f64> {
    let value = match record.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    value.is_finite().then_some(value)
}

/// Non-empty trimmed string; numbers are accepted as their text.
fn text(record: &Map<String, Value>, key: &str) -> Option<String> {
    let text = match record.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn samples(record: &Map<String, Value>) -> Vec<LevelSample> {
    let Some(Value::Array(entries)) = record.get("samples") else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let pair = entry.as_array()?;
            let at = parse_timestamp(pair.first()?.as_str()?)?;
            let level_m = match pair.get(1)? {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            }?;
            Some(LevelSample { at, level_m })
        })
        .collect()
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s.trim(), fmt).ok())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
