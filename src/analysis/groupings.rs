//! Station grouping and registry filtering.
//!
//! The collectors hand over flat lists. These helpers index weather by
//! station name for the flood engine's join, and split readings into the
//! per-hazard inputs the engines expect using the configured registry.

use std::collections::{HashMap, HashSet};

use crate::config::StationConfig;
use crate::logging::{Component, Logger};
use crate::model::{FloodReading, WeatherReading};

// ---------------------------------------------------------------------------
// Indexing
// ---------------------------------------------------------------------------

/// Indexes weather readings by station name. If a station appears twice the
/// last reading wins.
pub fn index_by_station(readings: &[WeatherReading]) -> HashMap<String, WeatherReading> {
    let mut indexed = HashMap::new();
    for reading in readings {
        indexed.insert(reading.station.clone(), reading.clone());
    }
    indexed
}

// ---------------------------------------------------------------------------
// Registry filtering
// ---------------------------------------------------------------------------

/// Keeps the gauge readings for registered flood stations and fills in a
/// missing basin from the registry. An empty registry keeps everything.
pub fn select_flood_inputs(
    readings: Vec<FloodReading>,
    registry: &[StationConfig],
    log: &Logger,
) -> Vec<FloodReading> {
    if registry.is_empty() {
        return readings;
    }

    readings
        .into_iter()
        .filter_map(|mut reading| {
            let Some(station) = registry.iter().find(|s| s.name == reading.station) else {
                log.debug(
                    Component::Flood,
                    Some(&reading.station),
                    "Not a registered flood station - ignoring reading",
                );
                return None;
            };
            if reading.river_basin.is_empty() || reading.river_basin == UNKNOWN_BASIN {
                if let Some(basin) = &station.river_basin {
                    reading.river_basin = basin.clone();
                }
            }
            Some(reading)
        })
        .collect()
}

/// Basin name used when neither the feed nor the registry provides one.
pub const UNKNOWN_BASIN: &str = "Unknown";

/// Picks the weather readings that belong to landslide zones, one per zone.
///
/// With a landslide registry, only registered zones are kept and missing
/// coordinates come from the registry. Without one, every reading not taken
/// by a flood station is treated as a landslide zone.
pub fn select_landslide_inputs(
    weather: &[WeatherReading],
    registry: &[StationConfig],
    flood_stations: &HashSet<&str>,
) -> Vec<WeatherReading> {
    let latest = latest_per_station(weather);

    if registry.is_empty() {
        return latest
            .into_iter()
            .filter(|w| !flood_stations.contains(w.station.as_str()))
            .cloned()
            .collect();
    }

    latest
        .into_iter()
        .filter_map(|w| {
            let zone = registry.iter().find(|z| z.name == w.station)?;
            let mut reading = w.clone();
            reading.lat = reading.lat.or(Some(zone.lat));
            reading.lon = reading.lon.or(Some(zone.lon));
            Some(reading)
        })
        .collect()
}

/// One reading per station. The last reading wins but keeps the position
/// where the station first appeared.
fn latest_per_station(readings: &[WeatherReading]) -> Vec<&WeatherReading> {
    let mut latest: Vec<&WeatherReading> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();
    for reading in readings {
        match slots.get(reading.station.as_str()) {
            Some(&slot) => latest[slot] = reading,
            None => {
                slots.insert(reading.station.as_str(), latest.len());
                latest.push(reading);
            }
        }
    }
    latest
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::fixtures::{fixture_flood_readings_json, fixture_weather_readings_json};
    use crate::ingest::snapshot::{parse_flood_readings, parse_weather_readings};

    fn station(name: &str, basin: Option<&str>) -> StationConfig {
        StationConfig {
            name: name.to_string(),
            lat: 7.0,
            lon: 80.5,
            river_basin: basin.map(String::from),
        }
    }

    fn weather(name: &str, rain_1h: f64) -> WeatherReading {
        WeatherReading {
            station: name.to_string(),
            rain_1h_mm: rain_1h,
            ..Default::default()
        }
    }

    #[test]
    fn test_index_by_station_last_reading_wins() {
        let readings = vec![
            weather("Hanwella", 5.0),
            weather("Badulla", 1.0),
            weather("Hanwella", 9.0),
        ];
        let indexed = index_by_station(&readings);
        assert_eq!(indexed.len(), 2);
        assert_eq!(indexed["Hanwella"].rain_1h_mm, 9.0);
    }

    #[test]
    fn test_flood_inputs_filtered_to_registry_and_basin_filled() {
        let readings = vec![
            FloodReading {
                station: "Hanwella".to_string(),
                river_basin: UNKNOWN_BASIN.to_string(),
                ..Default::default()
            },
            FloodReading {
                station: "Not Registered".to_string(),
                ..Default::default()
            },
        ];
        let registry = vec![station("Hanwella", Some("Kelani Ganga"))];

        let selected = select_flood_inputs(readings, &registry, &Logger::disabled());
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].river_basin, "Kelani Ganga");
    }

    #[test]
    fn test_flood_inputs_kept_when_registry_empty() {
        let readings = vec![FloodReading {
            station: "Anywhere".to_string(),
            ..Default::default()
        }];
        assert_eq!(select_flood_inputs(readings, &[], &Logger::disabled()).len(), 1);
    }

    #[test]
    fn test_landslide_inputs_fill_coordinates_from_registry() {
        let mut with_coords = weather("Kegalle", 3.0);
        with_coords.lat = Some(7.2513);
        let readings = vec![weather("Badulla", 12.0), with_coords, weather("Hanwella", 40.0)];
        let registry = vec![station("Badulla", None), station("Kegalle", None)];

        let selected = select_landslide_inputs(&readings, &registry, &HashSet::new());
        let names: Vec<&str> = selected.iter().map(|w| w.station.as_str()).collect();
        assert_eq!(names, vec!["Badulla", "Kegalle"]);
        assert_eq!(selected[0].lat, Some(7.0));
        assert_eq!(selected[1].lat, Some(7.2513), "feed coordinates take precedence");
        assert_eq!(selected[1].lon, Some(80.5));
    }

    #[test]
    fn test_landslide_inputs_without_registry_exclude_flood_stations() {
        let readings = vec![weather("Badulla", 12.0), weather("Hanwella", 40.0)];
        let flood: HashSet<&str> = ["Hanwella"].into_iter().collect();

        let selected = select_landslide_inputs(&readings, &[], &flood);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].station, "Badulla");
    }

    #[test]
    fn test_duplicate_zone_readings_collapse_to_latest() {
        let readings = vec![
            weather("Kegalle", 3.0),
            weather("Badulla", 12.0),
            weather("Kegalle", 52.0),
        ];

        let registry = vec![station("Kegalle", None), station("Badulla", None)];
        let registered = select_landslide_inputs(&readings, &registry, &HashSet::new());
        let summary: Vec<(&str, f64)> = registered
            .iter()
            .map(|w| (w.station.as_str(), w.rain_1h_mm))
            .collect();
        assert_eq!(
            summary,
            vec![("Kegalle", 52.0), ("Badulla", 12.0)],
            "later reading replaces the earlier one in first-seen position"
        );

        let unregistered = select_landslide_inputs(&readings, &[], &HashSet::new());
        assert_eq!(unregistered.len(), 2);
        assert_eq!(unregistered[0].rain_1h_mm, 52.0);
    }

    #[test]
    fn test_fixture_snapshots_group_end_to_end() {
        let flood =
            parse_flood_readings(fixture_flood_readings_json()).expect("fixture should parse");
        let weather =
            parse_weather_readings(fixture_weather_readings_json()).expect("fixture should parse");

        let indexed = index_by_station(&weather);
        let joined: Vec<&str> = flood
            .iter()
            .filter(|r| indexed.contains_key(&r.station))
            .map(|r| r.station.as_str())
            .collect();
        assert_eq!(joined, vec!["Hanwella", "Ratnapura"], "gauges with same-named weather");
    }
}
