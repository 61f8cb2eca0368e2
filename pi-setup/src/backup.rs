use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Create a timestamped backup directory under the given base
///
/// Setup runs as root, so the base lives in the system location rather
/// than any one user's home. Created lazily, only when a step actually
/// has something to back up.
pub fn create_backup_dir(base: &Path) -> Result<PathBuf> {
    let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");

    let backup_dir = base.join(timestamp.to_string());

    std::fs::create_dir_all(&backup_dir).with_context(|| {
        format!(
            "Failed to create backup directory: {}",
            backup_dir.display()
        )
    })?;

    Ok(backup_dir)
}

/// Backup a file if it exists
pub fn backup_file_if_exists(
    source: &Path,
    backup_dir: &Path,
    filename: &str,
) -> Result<bool> {
    if !source.exists() {
        return Ok(false);
    }

    let backup_path = backup_dir.join(filename);

    std::fs::copy(source, &backup_path).with_context(|| {
        format!(
            "Failed to backup {} to {}",
            source.display(),
            backup_path.display()
        )
    })?;

    log::debug!(
        "Backed up {} to {}",
        source.display(),
        backup_path.display()
    );

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_backup_dir_is_timestamped_under_base() {
        let base = tempfile::tempdir().unwrap();
        let dir = create_backup_dir(base.path()).unwrap();

        assert!(dir.is_dir());
        assert_eq!(dir.parent().unwrap(), base.path());
    }

    #[test]
    fn test_backup_missing_source_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let backed_up = backup_file_if_exists(
            &dir.path().join("missing.txt"),
            dir.path(),
            "missing.txt",
        )
        .unwrap();
        assert!(!backed_up);
    }

    #[test]
    fn test_backup_copies_contents() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("config.txt");
        std::fs::write(&source, "gpu_mem=128\n").unwrap();

        let backed_up = backup_file_if_exists(&source, dir.path(), "config.txt.bak").unwrap();
        assert!(backed_up);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("config.txt.bak")).unwrap(),
            "gpu_mem=128\n"
        );
    }
}
