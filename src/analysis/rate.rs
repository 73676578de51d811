//! Rate-of-rise derivation from a gauge's recent level samples.

use chrono::NaiveDateTime;

/// A single timestamped water level sample, meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelSample {
    pub at: NaiveDateTime,
    pub level_m: f64,
}

/// The latest level of a series plus its rate of rise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatestLevel {
    pub at: NaiveDateTime,
    /// Rounded to centimeters.
    pub level_m: f64,
    /// Meters per hour between the two most recent samples, rounded to
    /// millimeters. `None` with fewer than two samples or when they share a
    /// timestamp.
    pub rate_of_rise: Option<f64>,
}

/// Picks the newest sample and derives the rate from the one before it.
/// Samples may arrive in any order. Returns `None` for an empty series.
pub fn latest_with_rate(samples: &[LevelSample]) -> Option<LatestLevel> {
    let mut sorted: Vec<&LevelSample> = samples.iter().filter(|s| s.level_m.is_finite()).collect();
    sorted.sort_by_key(|s| s.at);

    let latest = *sorted.last()?;
    let rate_of_rise = match sorted.len() {
        0 | 1 => None,
        n => {
            let previous = sorted[n - 2];
            let hours = (latest.at - previous.at).num_seconds() as f64 / 3600.0;
            (hours > 0.0).then(|| round_to((latest.level_m - previous.level_m) / hours, 3))
        }
    };

    Some(LatestLevel {
        at: latest.at,
        level_m: round_to(latest.level_m, 2),
        rate_of_rise,
    })
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
