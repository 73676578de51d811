//! Service configuration loader - parses monitor.toml
//!
//! Separates station registry, file locations and logging preferences from
//! code, so adding a landslide zone or moving the state file does not need a
//! rebuild. A few values can be overridden from the environment (or a
//! `.env` file) for deployments that template their config:
//!
//! | variable            | overrides          |
//! |---------------------|--------------------|
//! | `HAZMON_STATE_FILE` | `[state] path`     |
//! | `HAZMON_LOG_LEVEL`  | `[logging] level`  |
//! | `HAZMON_LOG_FILE`   | `[logging] file`   |

use serde::Deserialize;
use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::logging::{LogLevel, Logger};

pub const DEFAULT_CONFIG_PATH: &str = "monitor.toml";

// ---------------------------------------------------------------------------
// Configuration structures
// ---------------------------------------------------------------------------

/// Root configuration structure for TOML parsing
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    #[serde(default)]
    pub state: StateConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default, rename = "flood_station")]
    pub flood_stations: Vec<StationConfig>,
    #[serde(default, rename = "landslide_zone")]
    pub landslide_zones: Vec<StationConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StateConfig {
    pub path: PathBuf,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/alert_state.json"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub console_timestamps: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
            console_timestamps: false,
        }
    }
}

/// Where the collectors leave their normalized snapshots.
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    pub flood_readings: PathBuf,
    pub weather_readings: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            flood_readings: PathBuf::from("data/flood_readings.json"),
            weather_readings: PathBuf::from("data/weather_readings.json"),
        }
    }
}

/// A named monitoring location: a flood gauge or a landslide-prone zone.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StationConfig {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// Flood stations only; used when the gauge feed omits the basin.
    pub river_basin: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl MonitorConfig {
    /// Parses configuration text without touching the environment.
    pub fn from_toml(contents: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: MonitorConfig = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Builds a `Logger` from the `[logging]` section.
    pub fn logger(&self) -> Logger {
        Logger::new(
            LogLevel::parse(&self.logging.level),
            self.logging.file.as_deref(),
            self.logging.console_timestamps,
        )
    }

    pub fn flood_station(&self, name: &str) -> Option<&StationConfig> {
        self.flood_stations.iter().find(|s| s.name == name)
    }

    pub fn landslide_zone(&self, name: &str) -> Option<&StationConfig> {
        self.landslide_zones.iter().find(|s| s.name == name)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.state.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("[state] path must not be empty".to_string()));
        }
        check_unique("flood_station", &self.flood_stations)?;
        check_unique("landslide_zone", &self.landslide_zones)?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(path) = env::var("HAZMON_STATE_FILE") {
            if !path.trim().is_empty() {
                self.state.path = PathBuf::from(path);
            }
        }
        if let Ok(level) = env::var("HAZMON_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(file) = env::var("HAZMON_LOG_FILE") {
            self.logging.file = Some(PathBuf::from(file)).filter(|p| !p.as_os_str().is_empty());
        }
    }
}

fn check_unique(table: &str, stations: &[StationConfig]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for station in stations {
        if station.name.trim().is_empty() {
            return Err(ConfigError::Invalid(format!("[[{}]] entry with empty name", table)));
        }
        if !seen.insert(station.name.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "duplicate [[{}]] name: {}",
                table, station.name
            )));
        }
    }
    Ok(())
}

/// Loads configuration from `path`, then applies `.env` / environment
/// overrides.
pub fn load_config(path: impl AsRef<Path>) -> Result<MonitorConfig, ConfigError> {
    let path = path.as_ref();
    dotenv::dotenv().ok();

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut config = MonitorConfig::from_toml(&contents, path)?;
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}

/// Loads configuration from the default location (monitor.toml)
pub fn load_config_default() -> Result<MonitorConfig, ConfigError> {
    load_config(DEFAULT_CONFIG_PATH)
}
