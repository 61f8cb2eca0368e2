// Boot firmware configuration edits
//
// Each setting is appended only if not already present: the operation is
// idempotent but never corrective - a malformed existing entry is not
// fixed, only left alone. The pre-edit backup directory is created here,
// right before the edit, so a dry run touches nothing.

use anyhow::Result;
use std::path::{Path, PathBuf};

use pistats_provision::{output, textfile};

use crate::backup;
use crate::constants::{BACKUP_BASE_DIR, BOOT_CONFIG_PATHS, BOOT_SETTINGS};

/// Locate the boot firmware config, preferring the newer firmware path
pub fn boot_config_path() -> Option<PathBuf> {
    BOOT_CONFIG_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}

/// Apply the display host's boot settings to whichever config exists
///
/// A host without a recognizable boot config gets a warning, not an
/// abort; everything else in the setup is still useful.
pub fn apply(dry_run: bool) -> Result<()> {
    let Some(path) = boot_config_path() else {
        output::warning("No boot firmware config found (looked for /boot/firmware/config.txt and /boot/config.txt)");
        output::info("Add the hdmi_* and gpu_mem settings manually if HDMI output misbehaves.");
        return Ok(());
    };

    apply_to(&path, Path::new(BACKUP_BASE_DIR), dry_run)
}

fn apply_to(path: &Path, backup_base: &Path, dry_run: bool) -> Result<()> {
    if dry_run {
        log::info!("Would ensure boot settings in {}", path.display());
        return Ok(());
    }

    let backup_dir = backup::create_backup_dir(backup_base)?;
    backup::backup_file_if_exists(path, &backup_dir, "config.txt")?;

    let appended = textfile::apply_settings(path, BOOT_SETTINGS)?;
    log::debug!(
        "Boot config {}: {appended} setting(s) appended",
        path.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dry_run_leaves_filesystem_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.txt");
        std::fs::write(&config, "dtparam=audio=on\n").unwrap();
        let backup_base = dir.path().join("backups");

        apply_to(&config, &backup_base, true).unwrap();

        assert_eq!(
            std::fs::read_to_string(&config).unwrap(),
            "dtparam=audio=on\n"
        );
        assert!(!backup_base.exists());
    }

    #[test]
    fn test_apply_backs_up_then_appends() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.txt");
        std::fs::write(&config, "dtparam=audio=on\n").unwrap();
        let backup_base = dir.path().join("backups");

        apply_to(&config, &backup_base, false).unwrap();

        let updated = std::fs::read_to_string(&config).unwrap();
        assert!(updated.contains("gpu_mem=128\n"));

        // Exactly one timestamped backup dir, holding the pre-edit content
        let backups: Vec<_> = std::fs::read_dir(&backup_base).unwrap().flatten().collect();
        assert_eq!(backups.len(), 1);
        assert_eq!(
            std::fs::read_to_string(backups[0].path().join("config.txt")).unwrap(),
            "dtparam=audio=on\n"
        );
    }
}
