//! Hazard Monitoring Service - single monitoring cycle
//!
//! Each invocation:
//! 1. Loads the station registry and settings from monitor.toml
//! 2. Reads the latest gauge and weather snapshots left by the collectors
//! 3. Scores flood and landslide risk
//! 4. Sends an alert only if the at-risk set changed since the last alert today
//!
//! Scheduling is left to cron / systemd timers.
//!
//! Usage:
//!   cargo run --release                              # one cycle with monitor.toml
//!   cargo run --release -- --config /etc/hazmon.toml # alternate config
//!   cargo run --release -- --dry-run                 # score and compare only
//!
//! Environment (or .env):
//!   HAZMON_STATE_FILE, HAZMON_LOG_LEVEL, HAZMON_LOG_FILE

use hazmon_service::config::{load_config, load_config_default, DEFAULT_CONFIG_PATH};
use hazmon_service::daemon::{ConsoleNotifier, CycleOutcome, Daemon, Delivery, SummaryComposer};
use hazmon_service::error::MonitorError;
use std::env;

fn main() {
    println!("⚠️  Hazard Monitoring Service");
    println!("============================\n");

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let mut config_path: Option<String> = None;
    let mut dry_run = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                if i + 1 < args.len() {
                    config_path = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("Error: --config requires a file path");
                    std::process::exit(1);
                }
            }
            "--dry-run" => {
                dry_run = true;
                i += 1;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                eprintln!("Usage: {} [--config PATH] [--dry-run]", args[0]);
                std::process::exit(1);
            }
        }
    }

    let outcome = match run(config_path.as_deref(), dry_run) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("\n❌ Monitoring cycle failed: {}\n", e);
            std::process::exit(1);
        }
    };

    println!(
        "🌊 {} flood warning zones, ⛰ {} landslide warning zones",
        outcome.flood_zones.len(),
        outcome.landslide_zones.len()
    );
    match outcome.delivery {
        Delivery::Sent => println!("✓ Alert sent"),
        Delivery::Suppressed => println!("✓ No change since last alert - suppressed"),
        Delivery::NothingComposed => println!("⚠️  State changed but no alert was composed"),
        Delivery::DryRun => {
            if outcome.diff.is_changed() {
                println!("→ An alert would be sent");
            } else {
                println!("→ No alert would be sent");
            }
        }
    }
}

fn run(config_path: Option<&str>, dry_run: bool) -> Result<CycleOutcome, MonitorError> {
    let config = match config_path {
        Some(path) => load_config(path)?,
        None => load_config_default()?,
    };
    println!(
        "✓ Loaded {} flood stations, {} landslide zones from {}",
        config.flood_stations.len(),
        config.landslide_zones.len(),
        config_path.unwrap_or(DEFAULT_CONFIG_PATH)
    );

    let daemon = Daemon::new(&config, config.logger());

    println!("📥 Reading collector snapshots...");
    let snapshot = daemon.load_inputs(&config.input)?;

    if dry_run {
        println!("🔍 Dry run - state will not be updated\n");
        Ok(daemon.dry_run(&snapshot))
    } else {
        daemon.run_cycle(&snapshot, &SummaryComposer, &ConsoleNotifier)
    }
}
