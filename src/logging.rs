//! Structured logging for the hazard monitoring service.
//!
//! Provides context-rich logging with component and station identifiers,
//! timestamps, and severity levels. Supports console output and an
//! append-only log file.
//!
//! There is no global logger. A `Logger` is built once at startup and a
//! clone is handed to every component that needs to log; clones share the
//! same sink.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// Parses a config / env value. Unknown values fall back to `Info`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "debug" => LogLevel::Debug,
            "warn" | "warning" => LogLevel::Warning,
            "error" => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

/// The part of the service a log entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Flood,
    Landslide,
    State,
    Cycle,
    System,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Flood => write!(f, "FLOOD"),
            Component::Landslide => write!(f, "SLIDE"),
            Component::State => write!(f, "STATE"),
            Component::Cycle => write!(f, "CYCLE"),
            Component::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger
// ---------------------------------------------------------------------------

struct Sink {
    /// Minimum log level to emit
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<PathBuf>,
    /// Whether console output includes the full timestamped entry
    console_timestamps: bool,
    /// Whether to write to the console at all
    console: bool,
    /// In-memory copy of every emitted entry (tests only)
    captured: Option<Mutex<Vec<String>>>,
}

/// Cheaply cloneable logging handle.
#[derive(Clone)]
pub struct Logger {
    sink: Arc<Sink>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("min_level", &self.sink.min_level)
            .field("log_file", &self.sink.log_file)
            .finish()
    }
}

impl Logger {
    pub fn new(min_level: LogLevel, log_file: Option<&Path>, console_timestamps: bool) -> Self {
        Self {
            sink: Arc::new(Sink {
                min_level,
                log_file: log_file.map(Path::to_path_buf),
                console_timestamps,
                console: true,
                captured: None,
            }),
        }
    }

    /// A logger that drops everything.
    pub fn disabled() -> Self {
        Self {
            sink: Arc::new(Sink {
                min_level: LogLevel::Error,
                log_file: None,
                console_timestamps: false,
                console: false,
                captured: None,
            }),
        }
    }

    /// A console-silent logger that keeps every entry in memory.
    pub fn capturing(min_level: LogLevel) -> Self {
        Self {
            sink: Arc::new(Sink {
                min_level,
                log_file: None,
                console_timestamps: false,
                console: false,
                captured: Some(Mutex::new(Vec::new())),
            }),
        }
    }

    /// Entries recorded by a `capturing` logger, oldest first.
    pub fn captured(&self) -> Vec<String> {
        self.sink
            .captured
            .as_ref()
            .and_then(|lines| lines.lock().ok().map(|l| l.clone()))
            .unwrap_or_default()
    }

    pub fn debug(&self, component: Component, station: Option<&str>, message: &str) {
        self.log(LogLevel::Debug, component, station, message);
    }

    pub fn info(&self, component: Component, station: Option<&str>, message: &str) {
        self.log(LogLevel::Info, component, station, message);
    }

    pub fn warn(&self, component: Component, station: Option<&str>, message: &str) {
        self.log(LogLevel::Warning, component, station, message);
    }

    pub fn error(&self, component: Component, station: Option<&str>, message: &str) {
        self.log(LogLevel::Error, component, station, message);
    }

    fn log(&self, level: LogLevel, component: Component, station: Option<&str>, message: &str) {
        let sink = &self.sink;
        if level < sink.min_level {
            return;
        }

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let station_part = station.map(|s| format!(" [{}]", s)).unwrap_or_default();
        let log_entry = format!(
            "{} {} {}{}: {}",
            timestamp, level, component, station_part, message
        );

        if sink.console {
            if sink.console_timestamps {
                match level {
                    LogLevel::Error | LogLevel::Warning => eprintln!("{}", log_entry),
                    LogLevel::Info | LogLevel::Debug => println!("{}", log_entry),
                }
            } else {
                match level {
                    LogLevel::Error => {
                        eprintln!("   ✗ {}{}: {}", component, station_part, message)
                    }
                    LogLevel::Warning => {
                        eprintln!("   ⚠ {}{}: {}", component, station_part, message)
                    }
                    LogLevel::Info => println!("   {}", message),
                    LogLevel::Debug => println!("   [DEBUG] {}", message),
                }
            }
        }

        if let Some(ref path) = sink.log_file {
            if let Err(e) = append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path.display(), e);
            }
        }

        if let Some(ref captured) = sink.captured {
            if let Ok(mut lines) = captured.lock() {
                lines.push(format!("{} {}{}: {}", level, component, station_part, message));
            }
        }
    }
}

fn append_to_file(path: &Path, entry: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", entry)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
    }

    #[test]
    fn test_log_level_parse_falls_back_to_info() {
        assert_eq!(LogLevel::parse("DEBUG"), LogLevel::Debug);
        assert_eq!(LogLevel::parse("warn"), LogLevel::Warning);
        assert_eq!(LogLevel::parse("error "), LogLevel::Error);
        assert_eq!(LogLevel::parse("verbose"), LogLevel::Info);
    }

    #[test]
    fn test_capturing_logger_filters_below_min_level() {
        let log = Logger::capturing(LogLevel::Info);
        log.debug(Component::Flood, None, "hidden");
        log.warn(Component::Flood, Some("Nilwala"), "shown");

        let lines = log.captured();
        assert_eq!(lines, vec!["WARN FLOOD [Nilwala]: shown".to_string()]);
    }

    #[test]
    fn test_clones_share_the_same_sink() {
        let log = Logger::capturing(LogLevel::Debug);
        let clone = log.clone();
        clone.info(Component::State, None, "from clone");
        assert_eq!(log.captured().len(), 1);
    }

    #[test]
    fn test_file_sink_appends_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("hazmon.log");
        let log = Logger::new(LogLevel::Info, Some(&path), true);
        log.info(Component::Cycle, None, "first");
        log.error(Component::Cycle, None, "second");

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("INFO CYCLE: first"), "got {}", lines[0]);
        assert!(lines[1].ends_with("ERROR CYCLE: second"), "got {}", lines[1]);
    }
}
