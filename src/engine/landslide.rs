//! Landslide risk scoring.
//!
//! Rainfall is the primary trigger; humidity stands in for soil saturation,
//! and wind and storm cloud add smaller contributions:
//!
//! | factor              | points  |
//! |---------------------|---------|
//! | 1h rainfall         | 0 – 40  |
//! | 3h sustained rain   | 0 – 10  |
//! | humidity            | 0 – 25  |
//! | wind / gust         | 0 – 15  |
//! | storm cloud cover   | 0 – 10  |

use crate::logging::{Component, Logger};
use crate::model::{clamp_score, LandslideWarningZone, RiskLevel, WeatherReading};

// ---------------------------------------------------------------------------
// Factor scoring
// ---------------------------------------------------------------------------

pub fn rainfall_points(rain_1h: f64) -> i32 {
    if rain_1h >= 50.0 {
        40
    } else if rain_1h >= 30.0 {
        30
    } else if rain_1h >= 15.0 {
        20
    } else if rain_1h >= 5.0 {
        10
    } else {
        0
    }
}

/// Additive on top of `rainfall_points`.
pub fn sustained_rain_points(rain_3h: f64) -> i32 {
    if rain_3h >= 40.0 {
        10
    } else if rain_3h >= 20.0 {
        5
    } else {
        0
    }
}

pub fn humidity_points(humidity: f64) -> i32 {
    if humidity >= 95.0 {
        25
    } else if humidity >= 85.0 {
        15
    } else if humidity >= 75.0 {
        10
    } else if humidity >= 60.0 {
        5
    } else {
        0
    }
}

/// Scores the stronger of sustained wind and gust.
pub fn wind_points(wind_speed: f64, wind_gust: f64) -> i32 {
    let gust = wind_speed.max(wind_gust);
    if gust >= 20.0 {
        15 // storm force
    } else if gust >= 12.0 {
        10
    } else if gust >= 7.0 {
        5
    } else {
        0
    }
}

/// Overcast and raining counts double an overcast sky alone.
pub fn storm_cover_points(cloud_cover: f64, rain_1h: f64) -> i32 {
    if cloud_cover >= 90.0 && rain_1h >= 5.0 {
        10
    } else if cloud_cover >= 80.0 {
        5
    } else {
        0
    }
}

/// Scores one zone's weather. `None` when the zone classifies as NORMAL.
pub fn score_zone(reading: &WeatherReading) -> Option<LandslideWarningZone> {
    let points = rainfall_points(reading.rain_1h_mm)
        + sustained_rain_points(reading.rain_3h_mm)
        + humidity_points(reading.humidity)
        + wind_points(reading.wind_speed_ms, reading.wind_gust_ms)
        + storm_cover_points(reading.cloud_cover, reading.rain_1h_mm);

    let risk_score = clamp_score(points);
    let risk_level = RiskLevel::from_score(risk_score);
    if !risk_level.is_at_risk() {
        return None;
    }

    Some(LandslideWarningZone {
        station: reading.station.clone(),
        rain_1h_mm: reading.rain_1h_mm,
        rain_3h_mm: reading.rain_3h_mm,
        humidity: reading.humidity,
        wind_speed_ms: reading.wind_speed_ms,
        wind_gust_ms: reading.wind_gust_ms,
        cloud_cover: reading.cloud_cover,
        risk_score,
        risk_level,
        lat: reading.lat,
        lon: reading.lon,
    })
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LandslideRiskEngine {
    log: Logger,
}

impl LandslideRiskEngine {
    pub fn new(log: Logger) -> Self {
        Self { log }
    }

    /// Scores every monitored zone and returns those at risk, most dangerous
    /// first. Equal scores keep their input order.
    pub fn evaluate(&self, weather_readings: &[WeatherReading]) -> Vec<LandslideWarningZone> {
        let mut zones: Vec<LandslideWarningZone> = weather_readings
            .iter()
            .filter_map(score_zone)
            .inspect(|zone| {
                self.log.warn(
                    Component::Landslide,
                    Some(&zone.station),
                    &format!(
                        "{} - score={}, rain={:.1}mm/h, humidity={:.0}%, wind={:.1}m/s",
                        zone.risk_level,
                        zone.risk_score,
                        zone.rain_1h_mm,
                        zone.humidity,
                        zone.peak_wind_ms()
                    ),
                );
            })
            .collect();

        zones.sort_by(|a, b| b.risk_score.cmp(&a.risk_score));

        self.log.info(
            Component::Landslide,
            None,
            &format!(
                "Landslide analysis complete: {} warning zones out of {} monitored areas",
                zones.len(),
                weather_readings.len()
            ),
        );

        zones
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn zone_weather(station: &str) -> WeatherReading {
        WeatherReading {
            station: station.to_string(),
            lat: Some(6.9497),
            lon: Some(80.7891),
            ..Default::default()
        }
    }

    #[test]
    fn test_heavy_rain_saturated_soil_moderate_wind_is_warning() {
        let reading = WeatherReading {
            rain_1h_mm: 32.0,
            rain_3h_mm: 0.0,
            humidity: 96.0,
            wind_speed_ms: 4.0,
            wind_gust_ms: 8.5,
            cloud_cover: 0.0,
            ..zone_weather("Badulla")
        };

        let zone = score_zone(&reading).expect("should be at risk");
        assert_eq!(zone.risk_score, 60, "30 rain + 25 humidity + 5 wind");
        assert_eq!(
            zone.risk_level,
            RiskLevel::Warning,
            "60 is below the CRITICAL band which starts at 70"
        );
        assert_eq!(zone.lat, Some(6.9497));
    }

    #[test]
    fn test_sustained_rain_bonus_is_additive() {
        assert_eq!(rainfall_points(55.0) + sustained_rain_points(45.0), 50);
        assert_eq!(sustained_rain_points(20.0), 5);
        assert_eq!(sustained_rain_points(19.9), 0);
    }

    #[test]
    fn test_humidity_bands() {
        assert_eq!(humidity_points(95.0), 25);
        assert_eq!(humidity_points(85.0), 15);
        assert_eq!(humidity_points(75.0), 10);
        assert_eq!(humidity_points(60.0), 5);
        assert_eq!(humidity_points(59.9), 0);
    }

    #[test]
    fn test_wind_uses_stronger_of_speed_and_gust() {
        assert_eq!(wind_points(21.0, 0.0), 15);
        assert_eq!(wind_points(3.0, 12.0), 10);
        assert_eq!(wind_points(7.0, 2.0), 5);
        assert_eq!(wind_points(6.9, 6.9), 0);
    }

    #[test]
    fn test_storm_cover_needs_rain_for_full_bonus() {
        assert_eq!(storm_cover_points(95.0, 5.0), 10);
        assert_eq!(storm_cover_points(95.0, 4.9), 5);
        assert_eq!(storm_cover_points(80.0, 40.0), 5);
        assert_eq!(storm_cover_points(79.0, 40.0), 0);
    }

    #[test]
    fn test_every_factor_maxed_clamps_at_100() {
        let reading = WeatherReading {
            rain_1h_mm: 120.0,
            rain_3h_mm: 300.0,
            humidity: 100.0,
            wind_speed_ms: 35.0,
            wind_gust_ms: 40.0,
            cloud_cover: 100.0,
            ..zone_weather("Aranayake")
        };
        let zone = score_zone(&reading).unwrap();
        assert_eq!(zone.risk_score, 100);
        assert_eq!(zone.risk_level, RiskLevel::Critical);
    }

    #[test]
    fn test_dry_calm_zone_is_not_materialized() {
        assert!(score_zone(&zone_weather("Haputale")).is_none());
    }

    #[test]
    fn test_score_19_is_normal_and_20_is_watch() {
        // 10 rain + 5 humidity + 5 wind = 20
        let watch = WeatherReading {
            rain_1h_mm: 5.0,
            humidity: 60.0,
            wind_speed_ms: 7.0,
            ..zone_weather("Kegalle")
        };
        assert_eq!(score_zone(&watch).map(|z| z.risk_level), Some(RiskLevel::Watch));

        // 10 rain + 5 humidity + 0 wind = 15
        let normal = WeatherReading {
            wind_speed_ms: 6.0,
            ..watch
        };
        assert!(score_zone(&normal).is_none());
    }

    #[test]
    fn test_nan_fields_never_panic() {
        let reading = WeatherReading {
            rain_1h_mm: f64::NAN,
            humidity: f64::NAN,
            wind_gust_ms: f64::NAN,
            ..zone_weather("Nuwara Eliya")
        };
        assert!(score_zone(&reading).is_none());
    }

    #[test]
    fn test_evaluate_sorts_descending() {
        let readings = vec![
            // 20
            WeatherReading {
                rain_1h_mm: 16.0,
                ..zone_weather("Watch")
            },
            // 65 → WARNING
            WeatherReading {
                rain_1h_mm: 55.0,
                humidity: 96.0,
                ..zone_weather("Critical")
            },
            WeatherReading {
                rain_1h_mm: 1.0,
                ..zone_weather("Dry")
            },
            WeatherReading {
                rain_1h_mm: 55.0,
                rain_3h_mm: 45.0,
                humidity: 96.0,
                ..zone_weather("Worst")
            }, // 75
        ];
        let zones = LandslideRiskEngine::new(Logger::disabled()).evaluate(&readings);
        let names: Vec<&str> = zones.iter().map(|z| z.station.as_str()).collect();
        assert_eq!(names, vec!["Worst", "Critical", "Watch"]);
        assert_eq!(zones[0].risk_level, RiskLevel::Critical);
        assert_eq!(zones[1].risk_level, RiskLevel::Warning);
    }
}
