// Read-only status report for the sender host

use std::path::Path;
use std::time::SystemTime;

use pistats_provision::activate::{is_active, is_enabled};
use pistats_provision::output::{info, print_title_bar, success, warning};
use pistats_provision::units::UnitScope;

use crate::config::AgentConfig;
use crate::constants::{ALL_UNITS, FPS_FILE, FPS_STALENESS_SECS, SENDER_SCRIPT};

pub fn run(verbose: bool) {
    println!();
    print_title_bar("🎮 PiStats Sender Host Status");
    println!();

    match AgentConfig::load() {
        Ok(config) => {
            success(&format!("Configured: target {}", config.stats_url()));
            report_sender_script(verbose);
        }
        Err(e) => {
            warning("Not configured (run 'pistats-pc setup')");
            if verbose {
                log::debug!("Config load failed: {e:#}");
            }
        }
    }

    for unit in ALL_UNITS {
        report_unit(unit);
    }

    report_fps_sample();

    println!();
}

fn report_sender_script(verbose: bool) {
    let Ok(data_dir) = AgentConfig::data_dir() else {
        warning("Could not determine data directory");
        return;
    };

    let script = data_dir.join(SENDER_SCRIPT);
    if script.is_file() {
        success(&format!("Sender script present: {}", script.display()));
    } else {
        warning(&format!("Sender script missing: {}", script.display()));
    }

    if verbose {
        log::debug!("Data directory: {}", data_dir.display());
    }
}

fn report_unit(unit: &str) {
    if is_active(UnitScope::User, unit) {
        success(&format!("{unit} is active"));
    } else if is_enabled(UnitScope::User, unit) {
        warning(&format!("{unit} is enabled but not active"));
    } else {
        warning(&format!("{unit} is not enabled"));
    }
}

/// Report the FPS sample file's freshness, mirroring the staleness rule
/// the sender applies when reading it
fn report_fps_sample() {
    let path = Path::new(FPS_FILE);
    let Ok(metadata) = path.metadata() else {
        info(&format!("No FPS sample at {FPS_FILE} (no game running?)"));
        return;
    };

    let fresh = metadata
        .modified()
        .ok()
        .and_then(|mtime| SystemTime::now().duration_since(mtime).ok())
        .is_some_and(|age| age.as_secs() < FPS_STALENESS_SECS);

    if fresh {
        let value = std::fs::read_to_string(path).unwrap_or_default();
        success(&format!("FPS sample fresh: {}", value.trim()));
    } else {
        warning(&format!("FPS sample stale at {FPS_FILE} (logger not running?)"));
    }
}
