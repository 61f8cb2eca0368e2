// Removal of all display host configuration

use anyhow::Result;
use colored::Colorize;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use pistats_provision::activate;
use pistats_provision::output::{info, print_title_bar, success, warning};
use pistats_provision::units::UnitScope;

use crate::config::{DisplayConfig, detect_install_user};
use crate::constants::{
    AUTOLOGIN_DROPIN_PATH, BIN_INSTALL_PATH, CONFIG_PATH, KIOSK_DESKTOP_RELPATH, SERVICE_NAME,
    SUDOERS_PATH,
};

pub fn run(dry_run: bool) -> Result<()> {
    print_title_bar("🧹 PiStats Cleanup");
    println!();

    if !dry_run {
        if !nix::unistd::Uid::effective().is_root() {
            anyhow::bail!("Cleanup must run as root. Re-run with: sudo pistats-pi cleanup");
        }

        print!(
            "{}",
            "Are you sure you want to remove all PiStats display configuration? (yes/no): "
                .yellow()
        );
        std::io::stdout().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if input.trim().to_lowercase() != "yes" {
            println!("Cleanup cancelled.");
            return Ok(());
        }
        println!();
    }

    let user = DisplayConfig::load()
        .map(|c| c.user)
        .unwrap_or_else(|_| detect_install_user());

    info("Stopping display service...");
    if !dry_run {
        activate::stop_and_disable(UnitScope::System, SERVICE_NAME);
    }

    info("Removing generated files...");
    let files = managed_files(&user);
    for file in &files {
        remove_file(file, dry_run);
    }

    if !dry_run {
        let _ = activate::daemon_reload(UnitScope::System);

        info("Verifying removal...");
        verify_cleanup(&files);
    }

    println!();
    success("Cleanup complete. Boot config entries are left in place (append-only policy).");
    println!();

    Ok(())
}

/// Every file the setup generates, in removal order
fn managed_files(user: &str) -> Vec<PathBuf> {
    vec![
        PathBuf::from(format!("/etc/systemd/system/{SERVICE_NAME}")),
        PathBuf::from(SUDOERS_PATH),
        PathBuf::from(AUTOLOGIN_DROPIN_PATH),
        PathBuf::from(format!("/home/{user}")).join(KIOSK_DESKTOP_RELPATH),
        PathBuf::from(CONFIG_PATH),
        PathBuf::from(BIN_INSTALL_PATH),
    ]
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

fn verify_cleanup(files: &[PathBuf]) {
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
