//! Test fixtures: representative collector snapshots.
//!
//! Shaped like the files the gauge and weather collectors write. They mix
//! well-formed records with the quirks seen from the upstream feeds: numeric
//! strings, null thresholds, missing fields and a record with no station.
//!
//! Expected scores under the default registry:
//! - Ratnapura: minor stage (30) + rapid rise (30) + extreme rain (30) = 90, CRITICAL
//! - Hanwella:  minor stage (30) + moderate rise (20) + moderate rain (10) = 60, WARNING
//! - Glencourse: no alert threshold, never scored
//! - Baddegama: well below alert, NORMAL
//! - Badulla (landslide): 30 + 25 + 5 = 60, WARNING
//! - Kegalle (landslide): humidity only, NORMAL

#[cfg(test)]
pub(crate) fn fixture_flood_readings_json() -> &'static str {
    r#"[
      {
        "station": "Hanwella",
        "river_basin": "Kelani Ganga",
        "level_m": 4.5,
        "rate_of_rise": 0.35,
        "alert_level": 3.0,
        "minor_level": 4.0,
        "major_level": 5.0,
        "measured_at": "2026-10-15 08:00:00"
      },
      {
        "station": "Glencourse",
        "level_m": "2.75",
        "rate_of_rise": null,
        "alert_level": null,
        "minor_level": "n/a",
        "major_level": 0,
        "measured_at": "2026-10-15 08:00:00"
      },
      {
        "station": "Ratnapura",
        "river_basin": "Kalu Ganga",
        "alert_level": 4.0,
        "minor_level": 5.0,
        "major_level": 7.0,
        "samples": [
          ["2026-10-15 06:00:00", 4.0],
          ["2026-10-15 08:00:00", 5.1],
          ["2026-10-15 07:00:00", 4.5]
        ]
      },
      {
        "station": "Baddegama",
        "river_basin": "Gin Ganga",
        "level_m": 1.0,
        "alert_level": 3.0,
        "minor_level": 4.0,
        "major_level": 5.0,
        "measured_at": "2026-10-15 07:45:00"
      },
      {
        "river_basin": "Kelani Ganga",
        "level_m": 9.9,
        "alert_level": 1.0
      }
    ]"#
}

#[cfg(test)]
pub(crate) fn fixture_weather_readings_json() -> &'static str {
    r#"[
      { "station": "Hanwella", "rain_1h_mm": 18.0, "rain_3h_mm": 22.0, "humidity": 88 },
      { "station": "Ratnapura", "rain_1h_mm": "55", "humidity": 97, "cloud_cover": 100 },
      {
        "station": "Badulla",
        "rain_1h_mm": 32.0,
        "rain_3h_mm": 0,
        "humidity": 96,
        "wind_speed_ms": 4.0,
        "wind_gust_ms": 8.5,
        "cloud_cover": 0,
        "lat": 6.9934,
        "lon": 81.055
      },
      { "station": "Kegalle", "humidity": 81, "wind_speed_ms": 2.1, "cloud_cover": 40 }
    ]"#
}
