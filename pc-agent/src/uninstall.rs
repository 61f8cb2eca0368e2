// Removal of all sender host configuration

use anyhow::Result;
use colored::Colorize;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use pistats_provision::activate;
use pistats_provision::output::{info, print_title_bar, success, warning};
use pistats_provision::units::UnitScope;

use crate::config::AgentConfig;
use crate::constants::{ALL_UNITS, FPS_FILE, SENDER_SCRIPT};
use crate::install;

pub fn run(dry_run: bool) -> Result<()> {
    print_title_bar("🧹 PiStats Sender Uninstall");
    println!();

    if !dry_run {
        print!(
            "{}",
            "Are you sure you want to remove all PiStats sender configuration? (yes/no): "
                .yellow()
        );
        std::io::stdout().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if input.trim().to_lowercase() != "yes" {
            println!("Uninstall cancelled.");
            return Ok(());
        }
        println!();
    }

    info("Stopping services...");
    if !dry_run {
        for unit in ALL_UNITS {
            activate::stop_and_disable(UnitScope::User, unit);
        }
    }

    info("Removing generated files...");
    let files = managed_files()?;
    for file in &files {
        remove_file(file, dry_run);
    }

    if !dry_run {
        let _ = activate::daemon_reload(UnitScope::User);

        info("Verifying removal...");
        verify_uninstall(&files);
    }

    println!();
    success("Uninstall complete.");
    println!();

    Ok(())
}

/// Every file the setup generates, in removal order
fn managed_files() -> Result<Vec<PathBuf>> {
    let unit_dir = UnitScope::User.unit_dir()?;
    let data_dir = AgentConfig::data_dir()?;

    let mut files: Vec<PathBuf> = ALL_UNITS.iter().map(|unit| unit_dir.join(unit)).collect();
    files.push(data_dir.join(SENDER_SCRIPT));
    files.push(AgentConfig::config_path()?);
    files.push(PathBuf::from(FPS_FILE));
    files.push(install::installed_bin_path()?);

    Ok(files)
}

fn remove_file(path: &Path, dry_run: bool) {
    if !path.exists() {
        log::debug!("File {} does not exist, skipping", path.display());
        return;
    }

    if dry_run {
        info(&format!("Would remove {}", path.display()));
        return;
    }

    match std::fs::remove_file(path) {
        Ok(()) => success(&format!("Removed {}", path.display())),
        Err(e) => warning(&format!("Failed to remove {}: {e}", path.display())),
    }
}

fn verify_uninstall(files: &[PathBuf]) {
    let mut all_removed = true;

    for file in files {
        if file.exists() {
            warning(&format!("File still exists: {}", file.display()));
            all_removed = false;
        }
    }

    if all_removed {
        success("All generated files successfully removed");
    }
}
