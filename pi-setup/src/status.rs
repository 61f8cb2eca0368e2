// Read-only status report for the display host

use colored::Colorize;
use std::path::Path;

use pistats_provision::activate::{is_active, is_enabled};
use pistats_provision::output::{print_title_bar, success, warning};
use pistats_provision::textfile;
use pistats_provision::units::UnitScope;

use crate::bootconfig;
use crate::config::DisplayConfig;
use crate::constants::{BOOT_SETTINGS, DISPLAY_SCRIPT, SERVICE_NAME, SUDOERS_PATH};

pub fn run(verbose: bool) {
    println!();
    print_title_bar("🖥  PiStats Display Host Status");
    println!();

    match DisplayConfig::load() {
        Ok(config) => {
            success(&format!(
                "Configured: orientation={}, user={}",
                config.orientation, config.user
            ));

            let script = config.display_dir.join(DISPLAY_SCRIPT);
            if script.is_file() {
                success(&format!("Display script present: {}", script.display()));
            } else {
                warning(&format!("Display script missing: {}", script.display()));
            }
        }
        Err(e) => {
            warning("Not configured (run 'sudo pistats-pi setup')");
            if verbose {
                log::debug!("Config load failed: {e:#}");
            }
        }
    }

    report_service();
    report_boot_config(verbose);
    report_sudoers();

    println!();
}

fn report_service() {
    if is_active(UnitScope::System, SERVICE_NAME) {
        success(&format!("{SERVICE_NAME} is active"));
    } else if is_enabled(UnitScope::System, SERVICE_NAME) {
        warning(&format!("{SERVICE_NAME} is enabled but not active"));
    } else {
        warning(&format!("{SERVICE_NAME} is not enabled"));
    }
}

fn report_boot_config(verbose: bool) {
    let Some(path) = bootconfig::boot_config_path() else {
        warning("No boot firmware config found");
        return;
    };

    let Ok(content) = std::fs::read_to_string(&path) else {
        warning(&format!("Could not read {}", path.display()));
        return;
    };

    let missing: Vec<&str> = BOOT_SETTINGS
        .iter()
        .filter(|(key, _)| !textfile::has_setting(&content, key))
        .map(|(key, _)| *key)
        .collect();

    if missing.is_empty() {
        success(&format!("Boot config settings present in {}", path.display()));
    } else {
        warning(&format!(
            "Boot config missing: {}",
            missing.join(", ").yellow()
        ));
    }

    if verbose {
        log::debug!("Boot config path: {}", path.display());
    }
}

fn report_sudoers() {
    if Path::new(SUDOERS_PATH).exists() {
        success("Sudoers policy installed");
    } else {
        warning("Sudoers policy not installed (settings page reboot disabled)");
    }
}
